use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mdp_decoder::{
    DecodeError, DecodedMessage, DecoderConfig, PacketDecoder, SkippedMessage,
    UnknownTemplatePolicy,
};
use mdp_types::TemplateRegistry;
use mdp_wire::{MessageHeader, PacketHeader};

use crate::InputArgs;

/// Read the capture named by `args`, decoding hex text when asked.
pub fn load(args: &InputArgs) -> Result<Vec<u8>> {
    let bytes = read_bytes(&args.file, args.hex)?;
    tracing::info!(
        path = %args.file.display(),
        bytes = bytes.len(),
        hex = args.hex,
        "loaded input"
    );
    Ok(bytes)
}

fn read_bytes(path: &Path, hex: bool) -> Result<Vec<u8>> {
    let raw = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    if !hex {
        return Ok(raw);
    }
    let text = String::from_utf8(raw)
        .with_context(|| format!("{} is not hex text", path.display()))?;
    let digits: String = text.split_whitespace().collect();
    hex::decode(&digits).with_context(|| format!("{} is not valid hex", path.display()))
}

/// The decoder configured from the command-line flags.
pub fn decoder(args: &InputArgs) -> PacketDecoder {
    let mut config = DecoderConfig::mdp3();
    if args.any_schema {
        config = config.with_expected_schema_id(None);
    }
    if args.strict {
        config = config.with_unknown_templates(UnknownTemplatePolicy::Reject);
    }
    tracing::debug!(?config, "decoder configuration");
    PacketDecoder::new(TemplateRegistry::mdp3(), config)
}

/// Everything found in one capture.
pub struct Decoded<'a> {
    /// `None` for a bare message.
    pub packet: Option<PacketHeader>,
    pub messages: Vec<DecodedMessage<'a>>,
    pub skipped: Vec<SkippedMessage>,
}

/// Decode `bytes` as a packet, or as one bare message when `bare` is set.
pub fn decode<'a>(
    decoder: &PacketDecoder,
    bytes: &'a [u8],
    bare: bool,
) -> Result<Decoded<'a>, DecodeError> {
    let decoded = if bare {
        match decoder.decode_message(bytes)? {
            Some(message) => Decoded {
                packet: None,
                messages: vec![message],
                skipped: Vec::new(),
            },
            None => Decoded {
                packet: None,
                messages: Vec::new(),
                skipped: vec![SkippedMessage {
                    offset: 0,
                    header: MessageHeader::read_at(bytes, 0)?,
                }],
            },
        }
    } else {
        let packet = decoder.decode_packet(bytes)?;
        tracing::debug!(
            msg_seq_num = packet.header.msg_seq_num,
            messages = packet.messages.len(),
            "decoded packet"
        );
        Decoded {
            packet: Some(packet.header),
            messages: packet.messages,
            skipped: packet.skipped,
        }
    };

    for skip in &decoded.skipped {
        tracing::warn!(
            offset = skip.offset,
            template_id = skip.header.template_id,
            schema_id = skip.header.schema_id,
            "skipped message with no field table"
        );
    }
    Ok(decoded)
}
