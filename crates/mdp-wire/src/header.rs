use crate::error::WireError;
use crate::view::ByteView;

/// Width of the SBE message header in bytes.
pub const MESSAGE_HEADER_SIZE: usize = 8;

/// SBE message header: the fixed envelope in front of every message body.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                              │
/// ├────────┼─────────┼──────────────────────────────────────────┤
/// │ 0x00   │ u16 LE  │ blockLength: root block size in bytes    │
/// │ 0x02   │ u16 LE  │ templateId: which message layout follows │
/// │ 0x04   │ u16 LE  │ schemaId: which schema the id belongs to │
/// │ 0x06   │ u16 LE  │ version: schema version of the producer  │
/// └────────┴─────────┴──────────────────────────────────────────┘
/// ```
///
/// The header reader knows nothing about templates. Looking up the field
/// table for `template_id` and deciding whether `schema_id` is acceptable
/// is the caller's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    pub block_length: u16,
    pub template_id: u16,
    pub schema_id: u16,
    pub version: u16,
}

impl MessageHeader {
    /// Fixed width of the header; the message body begins this many bytes
    /// after the header's first byte.
    #[must_use]
    pub const fn size() -> usize {
        MESSAGE_HEADER_SIZE
    }

    /// Decode the header from the first 8 bytes of `view`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedHeader`] if the view is shorter than
    /// [`MESSAGE_HEADER_SIZE`].
    pub fn read_from(view: &ByteView<'_>) -> Result<Self, WireError> {
        if view.len() < MESSAGE_HEADER_SIZE {
            return Err(WireError::MalformedHeader {
                what: "message",
                needed: MESSAGE_HEADER_SIZE,
                available: view.len(),
            });
        }

        Ok(Self {
            block_length: view.u16_at(0)?,
            template_id: view.u16_at(2)?,
            schema_id: view.u16_at(4)?,
            version: view.u16_at(6)?,
        })
    }

    /// Decode the header starting at `offset` in `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedHeader`] if fewer than 8 bytes remain
    /// after `offset`.
    pub fn read_at(buf: &[u8], offset: usize) -> Result<Self, WireError> {
        let available = buf.len().saturating_sub(offset);
        let view = ByteView::window(buf, offset.min(buf.len()), available)?;
        Self::read_from(&view)
    }

    /// Write the 8-byte header into the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedHeader`] if `buf` is shorter than
    /// [`MESSAGE_HEADER_SIZE`].
    pub fn write_to(&self, buf: &mut [u8]) -> Result<(), WireError> {
        if buf.len() < MESSAGE_HEADER_SIZE {
            return Err(WireError::MalformedHeader {
                what: "message",
                needed: MESSAGE_HEADER_SIZE,
                available: buf.len(),
            });
        }

        buf[0..2].copy_from_slice(&self.block_length.to_le_bytes());
        buf[2..4].copy_from_slice(&self.template_id.to_le_bytes());
        buf[4..6].copy_from_slice(&self.schema_id.to_le_bytes());
        buf[6..8].copy_from_slice(&self.version.to_le_bytes());

        Ok(())
    }
}
