/// Implementation of `mdp validate`.
///
/// Decodes the capture and then reads every field of every message,
/// groups included, so truncation anywhere in a message is caught rather
/// than only in the parts a consumer happens to touch.
///
/// # Success output
///
/// ```text
/// ✓ Framing: packet 703398, 1 message
/// ✓ Templates: 1 decoded, 0 skipped
/// ✓ Fields: 1 root block, 1 group entry read without error
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: template 10 (schema 1, version 9) has no field table
/// ```
use anyhow::{Context, Result, anyhow};
use mdp_decoder::{DecodeError, MessageReader};

use crate::ValidateArgs;
use crate::input;

/// Run the `mdp validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any part of it fails
/// to decode.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let bytes = input::load(&args.input)?;
    let decoder = input::decoder(&args.input);

    let decoded = match input::decode(&decoder, &bytes, args.input.message) {
        Ok(decoded) => decoded,
        Err(e) => return fail(&e),
    };

    let count = decoded.messages.len();
    match decoded.packet {
        Some(header) => println!(
            "✓ Framing: packet {}, {count} message{}",
            header.msg_seq_num,
            if count == 1 { "" } else { "s" }
        ),
        None => println!("✓ Framing: bare message"),
    }
    println!(
        "✓ Templates: {count} decoded, {} skipped",
        decoded.skipped.len()
    );

    let mut entries = 0;
    for message in &decoded.messages {
        match read_everything(&message.reader) {
            Ok(n) => entries += n,
            Err(e) => {
                return fail(&e).with_context(|| format!("message at offset {}", message.offset));
            }
        }
    }
    println!(
        "✓ Fields: {count} root block{}, {entries} group entr{} read without error",
        if count == 1 { "" } else { "s" },
        if entries == 1 { "y" } else { "ies" }
    );
    Ok(())
}

/// Read every field of `reader`, returning the number of group entries.
fn read_everything(reader: &MessageReader<'_>) -> Result<usize, DecodeError> {
    for desc in reader.template().fields {
        reader.read(desc)?;
    }
    let mut entries = 0;
    for group in reader.groups() {
        for entry in group? {
            for desc in entry.fields() {
                entry.read(desc)?;
            }
            entries += 1;
        }
    }
    Ok(entries)
}

fn fail(e: &DecodeError) -> Result<()> {
    println!("✗ Error: {}", diagnostic(e));
    Err(anyhow!("validation failed"))
}

/// A one-line description of a decode failure.
///
/// ```text
/// ┌──────────────────┬─────────────────────────────────────────────┐
/// │ DecodeError      │ Diagnostic                                  │
/// ├──────────────────┼─────────────────────────────────────────────┤
/// │ InvalidHeader    │ "invalid header: <inner error>"             │
/// │ UnknownTemplate  │ "template N (schema S, version V) has no …" │
/// │ SchemaMismatch   │ "schema id F, expected E"                   │
/// │ Wire / others    │ "<error Display>"                           │
/// └──────────────────┴─────────────────────────────────────────────┘
/// ```
fn diagnostic(e: &DecodeError) -> String {
    match e {
        DecodeError::InvalidHeader(inner) => format!("invalid header: {inner}"),
        DecodeError::UnknownTemplate {
            template_id,
            schema_id,
            version,
        } => format!(
            "template {template_id} (schema {schema_id}, version {version}) has no field table"
        ),
        DecodeError::SchemaMismatch { expected, found } => {
            format!("schema id {found}, expected {expected}")
        }
        other => other.to_string(),
    }
}
