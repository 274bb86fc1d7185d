use mdp_types::TemplateRegistry;
use mdp_wire::{MESSAGE_HEADER_SIZE, MessageHeader, Packet, PacketHeader};

use crate::config::{DecoderConfig, UnknownTemplatePolicy};
use crate::error::DecodeError;
use crate::message::MessageReader;

/// A message located and bound to its template.
///
/// `offset` is where the message starts in the buffer handed to the
/// decoder: the MsgSize prefix for packet decoding, 0 for a bare message.
#[derive(Clone, Copy, Debug)]
pub struct DecodedMessage<'a> {
    pub offset: usize,
    pub header: MessageHeader,
    pub reader: MessageReader<'a>,
}

/// A message passed over under [`UnknownTemplatePolicy::Skip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedMessage {
    pub offset: usize,
    pub header: MessageHeader,
}

/// The result of decoding one MDP packet.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ DecodedPacket                                            │
/// │   header:   PacketHeader          ← MsgSeqNum, SendingTime│
/// │   messages: Vec<DecodedMessage>   ← wire order            │
/// │   skipped:  Vec<SkippedMessage>   ← unknown templates     │
/// └──────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug)]
pub struct DecodedPacket<'a> {
    pub header: PacketHeader,
    pub messages: Vec<DecodedMessage<'a>>,
    pub skipped: Vec<SkippedMessage>,
}

/// Decodes MDP packets and bare SBE messages against a template registry.
///
/// Decoding is lazy at the field level: the decoder only frames messages,
/// reads their headers and resolves templates. Field values are decoded
/// when accessed through each message's [`MessageReader`].
///
/// The decoder holds no per-message state, so one instance can be shared
/// by any number of threads.
///
/// # Example
///
/// ```rust
/// use mdp_decoder::PacketDecoder;
///
/// let decoder = PacketDecoder::mdp3();
/// let err = decoder.decode_message(&[0u8; 4]).unwrap_err();
/// assert!(err.to_string().contains("invalid header"));
/// ```
#[derive(Clone, Debug)]
pub struct PacketDecoder {
    registry: TemplateRegistry,
    config: DecoderConfig,
}

impl PacketDecoder {
    #[must_use]
    pub fn new(registry: TemplateRegistry, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    /// The built-in MDP 3.0 templates with [`DecoderConfig::mdp3`].
    #[must_use]
    pub fn mdp3() -> Self {
        Self::new(TemplateRegistry::mdp3(), DecoderConfig::mdp3())
    }

    #[must_use]
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Decode a bare SBE message starting at the beginning of `buf`.
    ///
    /// Returns `Ok(None)` when the template is unknown and the policy is
    /// [`UnknownTemplatePolicy::Skip`].
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidHeader`] if `buf` is shorter than the header.
    /// - [`DecodeError::SchemaMismatch`] if the schema id is not the
    ///   configured one.
    /// - [`DecodeError::UnknownTemplate`] under [`UnknownTemplatePolicy::Reject`].
    pub fn decode_message<'a>(
        &self,
        buf: &'a [u8],
    ) -> Result<Option<DecodedMessage<'a>>, DecodeError> {
        match self.locate(buf, 0)? {
            Located::Message(message) => Ok(Some(message)),
            Located::Skipped(_) => Ok(None),
        }
    }

    /// Decode an MDP packet: packet header, then every framed message.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidHeader`] if the packet header is cut short.
    /// - [`DecodeError::Wire`] if a MsgSize prefix is inconsistent with
    ///   the packet length.
    /// - Any error from [`decode_message`](Self::decode_message) for the
    ///   framed messages.
    pub fn decode_packet<'a>(&self, buf: &'a [u8]) -> Result<DecodedPacket<'a>, DecodeError> {
        let packet = Packet::parse(buf).map_err(DecodeError::InvalidHeader)?;
        let mut messages = Vec::new();
        let mut skipped = Vec::new();

        for frame in packet.frames() {
            let frame = frame?;
            match self.locate(frame.bytes, frame.offset)? {
                Located::Message(message) => messages.push(message),
                Located::Skipped(skip) => skipped.push(skip),
            }
        }

        Ok(DecodedPacket {
            header: packet.header(),
            messages,
            skipped,
        })
    }

    fn locate<'a>(&self, buf: &'a [u8], offset: usize) -> Result<Located<'a>, DecodeError> {
        let header = MessageHeader::read_at(buf, 0).map_err(DecodeError::InvalidHeader)?;

        if let Some(expected) = self.config.expected_schema_id
            && header.schema_id != expected
        {
            return Err(DecodeError::SchemaMismatch {
                expected,
                found: header.schema_id,
            });
        }

        let Some(template) = self.registry.get(header.template_id) else {
            return match self.config.unknown_templates {
                UnknownTemplatePolicy::Skip => Ok(Located::Skipped(SkippedMessage { offset, header })),
                UnknownTemplatePolicy::Reject => Err(DecodeError::UnknownTemplate {
                    template_id: header.template_id,
                    schema_id: header.schema_id,
                    version: header.version,
                }),
            };
        };

        let reader = MessageReader::wrap_for_decode(
            buf,
            MESSAGE_HEADER_SIZE,
            header.block_length,
            header.version,
            template,
        );
        Ok(Located::Message(DecodedMessage {
            offset,
            header,
            reader,
        }))
    }
}

enum Located<'a> {
    Message(DecodedMessage<'a>),
    Skipped(SkippedMessage),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdp_encoder::{MessageEncoder, PacketEncoder};
    use mdp_types::FieldValue;
    use mdp_types::schema::mdp3::{channel_reset_4, security_status_30};
    use mdp_wire::WireError;

    fn channel_reset(schema_id: u16) -> Vec<u8> {
        let mut encoder = MessageEncoder::new(&channel_reset_4::TEMPLATE, schema_id, 9);
        encoder.set("TransactTime", FieldValue::U64(42));
        encoder.entry("NoMDEntries", |e| {
            e.set("ApplID", FieldValue::I16(310));
        });
        encoder.encode().unwrap()
    }

    fn status() -> Vec<u8> {
        let mut encoder = MessageEncoder::new(&security_status_30::TEMPLATE, 1, 9);
        encoder
            .set("TransactTime", FieldValue::U64(7))
            .set("SecurityGroup", FieldValue::Chars(b"ES"))
            .set("HaltReason", FieldValue::U8(0));
        encoder.encode().unwrap()
    }

    fn unknown_template() -> Vec<u8> {
        let mut msg = status();
        msg[2..4].copy_from_slice(&999u16.to_le_bytes());
        msg
    }

    #[test]
    fn decodes_every_message_in_a_packet() {
        let mut packet = PacketEncoder::new(5, 99);
        packet.push(channel_reset(1)).push(status());
        let buf = packet.encode().unwrap();

        let decoded = PacketDecoder::mdp3().decode_packet(&buf).unwrap();
        assert_eq!(decoded.header.msg_seq_num, 5);
        assert_eq!(decoded.header.sending_time, 99);
        let ids: Vec<u16> = decoded.messages.iter().map(|m| m.header.template_id).collect();
        assert_eq!(ids, vec![4, 30]);
        assert_eq!(decoded.messages[0].offset, 12);
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn skip_policy_records_unknown_templates() {
        let mut packet = PacketEncoder::new(1, 0);
        packet.push(unknown_template()).push(status());
        let buf = packet.encode().unwrap();

        let decoded = PacketDecoder::mdp3().decode_packet(&buf).unwrap();
        assert_eq!(decoded.messages.len(), 1);
        assert_eq!(decoded.skipped.len(), 1);
        assert_eq!(decoded.skipped[0].header.template_id, 999);
    }

    #[test]
    fn reject_policy_fails_on_unknown_templates() {
        let decoder = PacketDecoder::new(TemplateRegistry::mdp3(), DecoderConfig::default());
        let msg = unknown_template();
        assert!(matches!(
            decoder.decode_message(&msg),
            Err(DecodeError::UnknownTemplate {
                template_id: 999,
                ..
            })
        ));
        assert!(PacketDecoder::mdp3().decode_message(&msg).unwrap().is_none());
    }

    #[test]
    fn schema_id_is_checked_when_configured() {
        let msg = channel_reset(2);
        assert_eq!(
            PacketDecoder::mdp3().decode_message(&msg).unwrap_err(),
            DecodeError::SchemaMismatch {
                expected: 1,
                found: 2
            }
        );
        let lenient = PacketDecoder::new(TemplateRegistry::mdp3(), DecoderConfig::default());
        assert!(lenient.decode_message(&msg).unwrap().is_some());
    }

    #[test]
    fn bad_frame_size_is_a_wire_error() {
        let mut packet = PacketEncoder::new(1, 0);
        packet.push(status());
        let mut buf = packet.encode().unwrap();
        buf[12] = 0xFF;
        assert!(matches!(
            PacketDecoder::mdp3().decode_packet(&buf),
            Err(DecodeError::Wire(WireError::InvalidMessageSize { .. }))
        ));
    }

    #[test]
    fn short_packet_is_invalid_header() {
        assert!(matches!(
            PacketDecoder::mdp3().decode_packet(&[0u8; 6]),
            Err(DecodeError::InvalidHeader(WireError::MalformedHeader {
                what: "packet",
                ..
            }))
        ));
    }
}
