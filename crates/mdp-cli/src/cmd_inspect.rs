/// Implementation of `mdp inspect`.
///
/// Decodes a capture and prints each message's header and every field,
/// groups included. Fields the producer did not send are shown as
/// absent rather than hidden.
///
/// # Output format
///
/// ```text
/// Packet: MsgSeqNum=703398 SendingTime=1633099253939247451, 1 message
/// Message 0 at offset 12 (schema 1)
/// MDIncrementalRefreshLimitsBanding50 (template 50, version 9, block 11)
///   TransactTime = 1633099253937623627
///   ...
/// ```
///
/// With `--json` the same content is printed as one JSON document.
use anyhow::{Context, Result};
use mdp_decoder::{Absence, BlockReader, FieldRead, MessageReader, TextRenderer};
use mdp_types::FieldValue;
use serde::Serialize;
use serde_json::Value;

use crate::InspectArgs;
use crate::input::{self, Decoded};

/// Run the `mdp inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes = input::load(&args.input)?;
    let decoder = input::decoder(&args.input);
    let decoded = input::decode(&decoder, &bytes, args.input.message)
        .with_context(|| format!("failed to decode {}", args.input.file.display()))?;

    if args.json {
        let report = PacketJson::build(&decoded)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&decoded)?;
    }
    Ok(())
}

fn print_text(decoded: &Decoded<'_>) -> Result<()> {
    if let Some(header) = decoded.packet {
        let count = decoded.messages.len();
        println!(
            "Packet: MsgSeqNum={} SendingTime={}, {count} message{}",
            header.msg_seq_num,
            header.sending_time,
            if count == 1 { "" } else { "s" }
        );
    }

    for (index, message) in decoded.messages.iter().enumerate() {
        println!(
            "Message {index} at offset {} (schema {})",
            message.offset, message.header.schema_id
        );
        print!("{}", TextRenderer::render(&message.reader)?);
    }

    for skip in &decoded.skipped {
        println!(
            "Skipped at offset {}: template {} (schema {}, version {}), no field table",
            skip.offset, skip.header.template_id, skip.header.schema_id, skip.header.version
        );
    }
    Ok(())
}

// ── JSON report ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PacketJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    msg_seq_num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sending_time: Option<u64>,
    messages: Vec<MessageJson>,
    skipped: Vec<SkippedJson>,
}

#[derive(Serialize)]
struct MessageJson {
    offset: usize,
    template_id: u16,
    template: &'static str,
    schema_id: u16,
    version: u16,
    block_length: u16,
    fields: Vec<FieldJson>,
    groups: Vec<GroupJson>,
}

#[derive(Serialize)]
struct GroupJson {
    name: &'static str,
    present: bool,
    block_length: u16,
    entries: Vec<Vec<FieldJson>>,
}

#[derive(Serialize)]
struct FieldJson {
    name: &'static str,
    value: Value,
    /// `not_in_version` or `beyond_block` when the field was not sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    absent: Option<&'static str>,
}

#[derive(Serialize)]
struct SkippedJson {
    offset: usize,
    template_id: u16,
    schema_id: u16,
    version: u16,
}

impl PacketJson {
    fn build(decoded: &Decoded<'_>) -> Result<Self> {
        let messages = decoded
            .messages
            .iter()
            .map(|m| message_json(m.offset, m.header.schema_id, &m.reader))
            .collect::<Result<_>>()?;
        Ok(Self {
            msg_seq_num: decoded.packet.map(|h| h.msg_seq_num),
            sending_time: decoded.packet.map(|h| h.sending_time),
            messages,
            skipped: decoded
                .skipped
                .iter()
                .map(|s| SkippedJson {
                    offset: s.offset,
                    template_id: s.header.template_id,
                    schema_id: s.header.schema_id,
                    version: s.header.version,
                })
                .collect(),
        })
    }
}

fn message_json(offset: usize, schema_id: u16, reader: &MessageReader<'_>) -> Result<MessageJson> {
    let mut groups = Vec::new();
    for group in reader.groups() {
        let group = group?;
        let entries = group
            .iter()
            .map(|entry| block_json(&entry))
            .collect::<Result<_>>()?;
        groups.push(GroupJson {
            name: group.name(),
            present: group.is_present(),
            block_length: group.header().block_length,
            entries,
        });
    }

    let template = reader.template();
    Ok(MessageJson {
        offset,
        template_id: template.id,
        template: template.name,
        schema_id,
        version: reader.acting_version(),
        block_length: u16::try_from(reader.acting_block_length())?,
        fields: block_json(reader.root())?,
        groups,
    })
}

fn block_json(block: &BlockReader<'_>) -> Result<Vec<FieldJson>> {
    block
        .fields()
        .iter()
        .map(|desc| {
            let (value, absent) = match block.read(desc)? {
                FieldRead::Value(v) => (value_json(v), None),
                FieldRead::Null => (Value::Null, None),
                FieldRead::Absent(why) => (
                    desc.absent_value().map_or(Value::Null, value_json),
                    Some(match why {
                        Absence::NotInVersion => "not_in_version",
                        Absence::BeyondBlock => "beyond_block",
                    }),
                ),
            };
            Ok(FieldJson {
                name: desc.name,
                value,
                absent,
            })
        })
        .collect()
}

/// Integers stay numbers; decimals become exact strings so no precision
/// is lost to `f64`.
fn value_json(value: FieldValue<'_>) -> Value {
    match value {
        FieldValue::U8(v) => v.into(),
        FieldValue::U16(v) => v.into(),
        FieldValue::U32(v) => v.into(),
        FieldValue::U64(v) => v.into(),
        FieldValue::I8(v) => v.into(),
        FieldValue::I16(v) => v.into(),
        FieldValue::I32(v) => v.into(),
        FieldValue::I64(v) => v.into(),
        FieldValue::Char(c) => char::from(c).to_string().into(),
        FieldValue::Chars(bytes) => match value.as_str() {
            Some(text) => text.into(),
            None => hex::encode(bytes).into(),
        },
        FieldValue::Decimal(d) => d.to_string().into(),
    }
}
