use std::io::Write;

use mdp_wire::{MESSAGE_SIZE_LENGTH, PACKET_HEADER_SIZE, PacketHeader};

use crate::error::EncodeError;

/// Frames encoded messages into an MDP 3.0 packet.
///
/// ```text
/// ┌──────────────┬────────────────────────────────────────────┐
/// │ [12 bytes]   │ MsgSeqNum u32 │ SendingTime u64            │
/// │ per message: │ MsgSize u16 (includes itself) + SBE bytes  │
/// └──────────────┴────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default)]
pub struct PacketEncoder {
    header: PacketHeader,
    messages: Vec<Vec<u8>>,
}

impl PacketEncoder {
    #[must_use]
    pub fn new(msg_seq_num: u32, sending_time: u64) -> Self {
        Self {
            header: PacketHeader {
                msg_seq_num,
                sending_time,
            },
            messages: Vec::new(),
        }
    }

    /// Append an encoded SBE message (header included).
    pub fn push(&mut self, message: impl Into<Vec<u8>>) -> &mut Self {
        self.messages.push(message.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Serialize the packet into a new buffer.
    ///
    /// # Errors
    ///
    /// [`EncodeError::MessageTooLarge`] if a message does not fit a
    /// `u16` MsgSize.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(
            PACKET_HEADER_SIZE
                + self
                    .messages
                    .iter()
                    .map(|m| m.len() + MESSAGE_SIZE_LENGTH)
                    .sum::<usize>(),
        );
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Write the packet to `writer`, returning the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::MessageTooLarge`] if a message does not fit a
    ///   `u16` MsgSize. Nothing is written in that case.
    /// - [`EncodeError::Io`] if the writer fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, EncodeError> {
        let sizes = self
            .messages
            .iter()
            .map(|m| {
                let size = m.len() + MESSAGE_SIZE_LENGTH;
                u16::try_from(size).map_err(|_| EncodeError::MessageTooLarge {
                    size,
                    max: usize::from(u16::MAX),
                })
            })
            .collect::<Result<Vec<u16>, _>>()?;

        let mut header = [0u8; PACKET_HEADER_SIZE];
        self.header.write_to(&mut header)?;
        writer.write_all(&header)?;
        let mut written = PACKET_HEADER_SIZE;

        for (message, size) in self.messages.iter().zip(sizes) {
            writer.write_all(&size.to_le_bytes())?;
            writer.write_all(message)?;
            written += usize::from(size);
        }

        Ok(written)
    }
}
