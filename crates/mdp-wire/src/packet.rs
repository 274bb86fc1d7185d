use crate::error::WireError;
use crate::header::MESSAGE_HEADER_SIZE;
use crate::view::ByteView;

/// Width of the MDP packet header in bytes.
pub const PACKET_HEADER_SIZE: usize = 12;

/// Width of the MsgSize prefix in front of every message.
pub const MESSAGE_SIZE_LENGTH: usize = 2;

/// MDP 3.0 packet header, the first 12 bytes of every UDP payload.
///
/// ```text
/// ┌────────┬─────────┬───────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                               │
/// ├────────┼─────────┼───────────────────────────────────────────┤
/// │ 0x00   │ u32 LE  │ MsgSeqNum: packet sequence number         │
/// │ 0x04   │ u64 LE  │ SendingTime: nanoseconds since Unix epoch │
/// └────────┴─────────┴───────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PacketHeader {
    pub msg_seq_num: u32,
    pub sending_time: u64,
}

impl PacketHeader {
    /// Decode the packet header from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedHeader`] if `buf` holds fewer than
    /// [`PACKET_HEADER_SIZE`] bytes.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < PACKET_HEADER_SIZE {
            return Err(WireError::MalformedHeader {
                what: "packet",
                needed: PACKET_HEADER_SIZE,
                available: buf.len(),
            });
        }
        let view = ByteView::new(buf);
        Ok(Self {
            msg_seq_num: view.u32_at(0)?,
            sending_time: view.u64_at(4)?,
        })
    }

    /// Write the packet header into the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedHeader`] if `buf` is too short.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<(), WireError> {
        if buf.len() < PACKET_HEADER_SIZE {
            return Err(WireError::MalformedHeader {
                what: "packet",
                needed: PACKET_HEADER_SIZE,
                available: buf.len(),
            });
        }
        buf[0..4].copy_from_slice(&self.msg_seq_num.to_le_bytes());
        buf[4..12].copy_from_slice(&self.sending_time.to_le_bytes());
        Ok(())
    }
}

/// One message inside a packet, with its MsgSize prefix stripped.
///
/// `bytes` starts at the SBE message header and spans `MsgSize - 2`
/// bytes. `offset` is where the MsgSize prefix sits in the packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageFrame<'a> {
    pub offset: usize,
    pub bytes: &'a [u8],
}

/// A parsed MDP packet: header plus a lazily framed message sequence.
///
/// ```text
/// ┌──────────────┬──────────┬─────────────────┬──────────┬─────────────────┬──
/// │ PacketHeader │ MsgSize  │ SBE message     │ MsgSize  │ SBE message     │ …
/// │ 12 bytes     │ u16 LE   │ MsgSize-2 bytes │ u16 LE   │ MsgSize-2 bytes │
/// └──────────────┴──────────┴─────────────────┴──────────┴─────────────────┴──
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Packet<'a> {
    header: PacketHeader,
    buf: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Parse the packet header; message framing happens in [`frames`](Self::frames).
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MalformedHeader`] if the packet header is cut short.
    pub fn parse(buf: &'a [u8]) -> Result<Self, WireError> {
        let header = PacketHeader::read_from(buf)?;
        Ok(Self { header, buf })
    }

    #[must_use]
    pub fn header(&self) -> PacketHeader {
        self.header
    }

    #[must_use]
    pub fn msg_seq_num(&self) -> u32 {
        self.header.msg_seq_num
    }

    #[must_use]
    pub fn sending_time(&self) -> u64 {
        self.header.sending_time
    }

    /// Total packet length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.len() <= PACKET_HEADER_SIZE
    }

    /// Iterate the message frames that follow the packet header.
    #[must_use]
    pub fn frames(&self) -> Frames<'a> {
        Frames {
            buf: self.buf,
            pos: PACKET_HEADER_SIZE,
        }
    }
}

/// Iterator over the message frames of a [`Packet`].
///
/// Yields an error once for a bad MsgSize and then stops; frames after
/// a corrupt size prefix cannot be located.
pub struct Frames<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Result<MessageFrame<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.buf.len() {
            return None;
        }

        let offset = self.pos;
        let remaining = self.buf.len() - offset;
        let result = self.frame_at(offset, remaining);
        self.pos = match &result {
            Ok(frame) => offset + MESSAGE_SIZE_LENGTH + frame.bytes.len(),
            Err(_) => self.buf.len(),
        };
        Some(result)
    }
}

impl<'a> Frames<'a> {
    fn frame_at(&self, offset: usize, remaining: usize) -> Result<MessageFrame<'a>, WireError> {
        if remaining < MESSAGE_SIZE_LENGTH {
            return Err(WireError::MalformedHeader {
                what: "message size",
                needed: MESSAGE_SIZE_LENGTH,
                available: remaining,
            });
        }
        let size = usize::from(ByteView::new(self.buf).u16_at(offset)?);
        if size < MESSAGE_SIZE_LENGTH + MESSAGE_HEADER_SIZE || size > remaining {
            return Err(WireError::InvalidMessageSize {
                size,
                offset,
                remaining,
            });
        }

        let start = offset + MESSAGE_SIZE_LENGTH;
        let bytes = ByteView::window(self.buf, start, size - MESSAGE_SIZE_LENGTH)?.as_slice();
        Ok(MessageFrame { offset, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet_with(messages: &[&[u8]]) -> Vec<u8> {
        let mut buf = vec![0u8; PACKET_HEADER_SIZE];
        PacketHeader {
            msg_seq_num: 703_398,
            sending_time: 1_633_099_253_939_247_451,
        }
        .write_to(&mut buf)
        .unwrap();
        for msg in messages {
            let size = u16::try_from(msg.len() + MESSAGE_SIZE_LENGTH).unwrap();
            buf.extend_from_slice(&size.to_le_bytes());
            buf.extend_from_slice(msg);
        }
        buf
    }

    #[test]
    fn header_fields() {
        let buf = packet_with(&[]);
        let packet = Packet::parse(&buf).unwrap();
        assert_eq!(packet.msg_seq_num(), 703_398);
        assert_eq!(packet.sending_time(), 1_633_099_253_939_247_451);
        assert!(packet.is_empty());
        assert_eq!(packet.frames().count(), 0);
    }

    #[test]
    fn frames_split_on_size_prefix() {
        let first = [1u8; 10];
        let second = [2u8; 14];
        let buf = packet_with(&[&first, &second]);
        let frames: Vec<_> = Packet::parse(&buf)
            .unwrap()
            .frames()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].offset, PACKET_HEADER_SIZE);
        assert_eq!(frames[0].bytes, &first);
        assert_eq!(frames[1].offset, PACKET_HEADER_SIZE + 12);
        assert_eq!(frames[1].bytes, &second);
    }

    #[test]
    fn size_smaller_than_header_rejected() {
        let mut buf = packet_with(&[]);
        buf.extend_from_slice(&[0x04, 0x00, 0, 0]);
        let mut frames = Packet::parse(&buf).unwrap().frames();
        assert!(matches!(
            frames.next(),
            Some(Err(WireError::InvalidMessageSize { size: 4, .. }))
        ));
        assert!(frames.next().is_none());
    }

    #[test]
    fn size_past_end_rejected() {
        let mut buf = packet_with(&[&[0u8; 10]]);
        buf.truncate(buf.len() - 1);
        let result = Packet::parse(&buf).unwrap().frames().next().unwrap();
        assert!(matches!(
            result,
            Err(WireError::InvalidMessageSize {
                size: 12,
                remaining: 11,
                ..
            })
        ));
    }

    #[test]
    fn dangling_byte_is_malformed() {
        let mut buf = packet_with(&[]);
        buf.push(0x38);
        let result = Packet::parse(&buf).unwrap().frames().next().unwrap();
        assert!(matches!(result, Err(WireError::MalformedHeader { .. })));
    }

    #[test]
    fn short_packet_header_rejected() {
        let buf = [0u8; 11];
        assert!(matches!(
            Packet::parse(&buf),
            Err(WireError::MalformedHeader {
                what: "packet",
                ..
            })
        ));
    }
}
