/// Implementation of `mdp encode`.
///
/// Builds messages from a JSON manifest with the message encoder and
/// frames them into a packet (or writes the single message bare with
/// `--message`).
///
/// # Manifest format
///
/// ```json
/// {
///   "msg_seq_num": 703398,
///   "sending_time": 1633099253939247451,
///   "messages": [
///     {
///       "template": 50,
///       "version": 9,
///       "fields": { "TransactTime": 1633099253937623627, "MatchEventIndicator": 0 },
///       "groups": {
///         "NoMDEntries": [
///           { "HighLimitPrice": null, "LowLimitPrice": "9000",
///             "MaxPriceVariation": "10", "SecurityID": 5620, "RptSeq": 1869 }
///         ]
///       }
///     }
///   ]
/// }
/// ```
///
/// ```text
/// ┌──────────────────┬─────────────────────────────────────────────────┐
/// │ JSON value       │ Accepted for                                    │
/// ├──────────────────┼─────────────────────────────────────────────────┤
/// │ integer          │ integer fields (range checked), decimals        │
/// │ string           │ char arrays, single chars, decimals ("4512.25") │
/// │ null             │ optional fields: writes the null sentinel       │
/// └──────────────────┴─────────────────────────────────────────────────┘
/// ```
///
/// `schema_id` defaults to 1 and `version` to the schema version.
/// `block_length` overrides the root block length written in the header.
use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result, anyhow, bail};
use mdp_encoder::{MessageEncoder, PacketEncoder};
use mdp_types::schema::mdp3;
use mdp_types::{Decimal, FieldDescriptor, FieldKind, FieldValue, TemplateRegistry};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::EncodeArgs;

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    msg_seq_num: u32,
    #[serde(default)]
    sending_time: u64,
    messages: Vec<MessageSpec>,
}

#[derive(Deserialize)]
struct MessageSpec {
    template: u16,
    #[serde(default = "default_schema_id")]
    schema_id: u16,
    #[serde(default = "default_version")]
    version: u16,
    #[serde(default)]
    block_length: Option<u16>,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(default)]
    groups: BTreeMap<String, Vec<Map<String, Value>>>,
}

fn default_schema_id() -> u16 {
    mdp3::SCHEMA_ID
}

fn default_version() -> u16 {
    mdp3::SCHEMA_VERSION
}

/// Run the `mdp encode` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, a value
/// does not fit its field, or the output cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let manifest: Manifest = serde_json::from_str(&text)
        .with_context(|| format!("invalid manifest {}", args.input.display()))?;

    let registry = TemplateRegistry::mdp3();
    let mut messages = Vec::with_capacity(manifest.messages.len());
    for (index, spec) in manifest.messages.iter().enumerate() {
        let bytes =
            encode_message(&registry, spec).with_context(|| format!("message {index}"))?;
        tracing::debug!(index, template = spec.template, bytes = bytes.len(), "encoded message");
        messages.push(bytes);
    }

    let bytes = if args.message {
        let [single] = <[Vec<u8>; 1]>::try_from(messages)
            .map_err(|all| anyhow!("--message needs exactly one message, got {}", all.len()))?;
        single
    } else {
        let mut packet = PacketEncoder::new(manifest.msg_seq_num, manifest.sending_time);
        for message in messages {
            packet.push(message);
        }
        packet.encode()?
    };

    if args.hex {
        fs::write(&args.output, hex::encode(&bytes) + "\n")
    } else {
        fs::write(&args.output, &bytes)
    }
    .with_context(|| format!("cannot write {}", args.output.display()))?;

    tracing::info!(
        path = %args.output.display(),
        bytes = bytes.len(),
        "wrote output"
    );
    println!("Wrote {} bytes to {}", bytes.len(), args.output.display());
    Ok(())
}

fn encode_message(registry: &TemplateRegistry, spec: &MessageSpec) -> Result<Vec<u8>> {
    let template = registry.resolve(spec.template)?;
    let mut encoder = MessageEncoder::new(template, spec.schema_id, spec.version);
    if let Some(block_length) = spec.block_length {
        encoder.with_block_length(block_length);
    }

    for (name, json) in &spec.fields {
        let desc = template
            .field(name)
            .ok_or_else(|| anyhow!("{} has no field {name:?}", template.name))?;
        match setting(desc, json)? {
            Setting::Value(value) => encoder.set(name, value),
            Setting::Null => encoder.set_null(name),
            Setting::Skip => &mut encoder,
        };
    }

    for (group_name, entries) in &spec.groups {
        let group = template
            .group(group_name)
            .ok_or_else(|| anyhow!("{} has no group {group_name:?}", template.name))?;
        for entry in entries {
            let settings = entry
                .iter()
                .map(|(name, json)| {
                    let desc = group
                        .field(name)
                        .ok_or_else(|| anyhow!("{} has no field {name:?}", group.name))?;
                    Ok((name.as_str(), setting(desc, json)?))
                })
                .collect::<Result<Vec<_>>>()?;
            encoder.entry(group_name, |e| {
                for (name, setting) in settings {
                    match setting {
                        Setting::Value(value) => e.set(name, value),
                        Setting::Null => e.set_null(name),
                        Setting::Skip => &mut *e,
                    };
                }
            });
        }
    }

    Ok(encoder.encode()?)
}

enum Setting<'v> {
    Value(FieldValue<'v>),
    Null,
    /// Schema constants are not written.
    Skip,
}

fn setting<'v>(desc: &FieldDescriptor, json: &'v Value) -> Result<Setting<'v>> {
    if json.is_null() {
        return Ok(Setting::Null);
    }
    let value = match desc.kind {
        FieldKind::U8 => FieldValue::U8(integer(desc, json)?),
        FieldKind::U16 => FieldValue::U16(integer(desc, json)?),
        FieldKind::U32 => FieldValue::U32(integer(desc, json)?),
        FieldKind::U64 => FieldValue::U64(integer(desc, json)?),
        FieldKind::I8 => FieldValue::I8(integer(desc, json)?),
        FieldKind::I16 => FieldValue::I16(integer(desc, json)?),
        FieldKind::I32 => FieldValue::I32(integer(desc, json)?),
        FieldKind::I64 => FieldValue::I64(integer(desc, json)?),
        FieldKind::Char => match json {
            Value::String(s) if s.len() == 1 => FieldValue::Char(s.as_bytes()[0]),
            _ => FieldValue::Char(integer(desc, json)?),
        },
        FieldKind::CharArray(_) => match json {
            Value::String(s) => FieldValue::Chars(s.as_bytes()),
            _ => bail!("{}: expected a string, got {json}", desc.name),
        },
        FieldKind::Decimal64 { exponent } | FieldKind::Decimal32 { exponent } => {
            let text = match json {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => bail!("{}: expected a decimal, got {json}", desc.name),
            };
            FieldValue::Decimal(parse_decimal(&text, exponent).ok_or_else(|| {
                anyhow!(
                    "{}: {text:?} is not a decimal representable with exponent {exponent}",
                    desc.name
                )
            })?)
        }
        FieldKind::Constant(_) => {
            tracing::warn!(field = desc.name, "ignoring value for schema constant");
            return Ok(Setting::Skip);
        }
    };
    Ok(Setting::Value(value))
}

fn integer<T: TryFrom<i128>>(desc: &FieldDescriptor, json: &Value) -> Result<T> {
    let n = json
        .as_i64()
        .map(i128::from)
        .or_else(|| json.as_u64().map(i128::from))
        .ok_or_else(|| anyhow!("{}: expected an integer, got {json}", desc.name))?;
    T::try_from(n).map_err(|_| anyhow!("{}: {n} out of range for {}", desc.name, desc.kind.name()))
}

/// Parse `text` into a mantissa at the fixed `exponent`.
///
/// Returns `None` for malformed text, for values that need more
/// fractional digits than the exponent allows, and on overflow.
fn parse_decimal(text: &str, exponent: i8) -> Option<Decimal> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let frac = frac.trim_end_matches('0');
    let places = if exponent < 0 {
        usize::from(exponent.unsigned_abs())
    } else {
        0
    };
    if frac.len() > places {
        return None;
    }

    let mut value: i64 = 0;
    let padding = std::iter::repeat_n(b'0', places - frac.len());
    for b in int.bytes().chain(frac.bytes()).chain(padding) {
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }

    if exponent > 0 {
        let scale = 10i64.checked_pow(u32::from(exponent.unsigned_abs()))?;
        if value % scale != 0 {
            return None;
        }
        value /= scale;
    }

    let mantissa = if negative { value.checked_neg()? } else { value };
    Some(Decimal::new(mantissa, exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_price9() {
        assert_eq!(
            parse_decimal("9000", -9),
            Some(Decimal::new(9_000_000_000_000, -9))
        );
        assert_eq!(
            parse_decimal("4512.25", -9),
            Some(Decimal::new(4_512_250_000_000, -9))
        );
        assert_eq!(parse_decimal("-0.5", -2), Some(Decimal::new(-50, -2)));
        assert_eq!(parse_decimal(".5", -1), Some(Decimal::new(5, -1)));
    }

    #[test]
    fn rejects_lossy_or_malformed_decimals() {
        assert_eq!(parse_decimal("1.234", -2), None);
        assert_eq!(parse_decimal("1e5", -9), None);
        assert_eq!(parse_decimal("", -9), None);
        assert_eq!(parse_decimal("99999999999999", -9), None);
        assert_eq!(parse_decimal("4200", 2), Some(Decimal::new(42, 2)));
        assert_eq!(parse_decimal("4250", 2), None);
    }

    #[test]
    fn json_values_follow_field_kind() {
        let template = &mdp3::incremental_refresh_limits_banding_50::TEMPLATE;
        let entry = template.group("NoMDEntries").unwrap();

        let json = Value::from(5620);
        assert!(matches!(
            setting(entry.field("SecurityID").unwrap(), &json).unwrap(),
            Setting::Value(FieldValue::I32(5620))
        ));

        let json = Value::from("10");
        assert!(matches!(
            setting(entry.field("MaxPriceVariation").unwrap(), &json).unwrap(),
            Setting::Value(FieldValue::Decimal(d)) if d == Decimal::new(10_000_000_000, -9)
        ));

        assert!(matches!(
            setting(entry.field("HighLimitPrice").unwrap(), &Value::Null).unwrap(),
            Setting::Null
        ));

        let json = Value::from(-1);
        assert!(setting(entry.field("RptSeq").unwrap(), &json).is_err());
    }

    #[test]
    fn manifest_round_trips_through_encoder() {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "messages": [{
                    "template": 50,
                    "version": 9,
                    "fields": { "TransactTime": 1 },
                    "groups": { "NoMDEntries": [{ "SecurityID": 5620, "RptSeq": 1869 }] }
                }]
            }"#,
        )
        .unwrap();
        let bytes = encode_message(&TemplateRegistry::mdp3(), &manifest.messages[0]).unwrap();
        assert_eq!(bytes.len(), 8 + 11 + 3 + 32);
        assert_eq!(&bytes[2..4], &[50, 0]);
    }
}
