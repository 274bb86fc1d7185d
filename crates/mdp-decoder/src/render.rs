use std::fmt::Write as _;

use mdp_types::FieldDescriptor;

use crate::block::{Absence, BlockReader, FieldRead};
use crate::error::DecodeError;
use crate::message::MessageReader;

/// Plain-text dump of a decoded message, one field per line.
///
/// Every declared field is listed, including the ones the producer did
/// not send, so the dump shows exactly what a reader sees:
///
/// ```text
/// MDIncrementalRefreshLimitsBanding50 (template 50, version 9, block 11)
///   TransactTime = 1633099253937623627
///   MatchEventIndicator = 0
///   NoMDEntries: 1 entry, block 32
///     [0]
///       HighLimitPrice = null
///       LowLimitPrice = 9000
///       MaxPriceVariation = 10
///       SecurityID = 5620
///       RptSeq = 1869
///       MDUpdateAction = 0 (constant)
///       MDEntryType = 'g' (constant)
/// ```
///
/// Absent fields print as `<absent: not in version>` or
/// `<absent: beyond block>`.
pub struct TextRenderer;

impl TextRenderer {
    /// Render the message bound to `reader`.
    ///
    /// # Errors
    ///
    /// Bounds errors if the buffer ends inside the acting block of the
    /// root or of a group entry, or a dimension header is missing.
    pub fn render(reader: &MessageReader<'_>) -> Result<String, DecodeError> {
        let template = reader.template();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} (template {}, version {}, block {})",
            template.name,
            template.id,
            reader.acting_version(),
            reader.acting_block_length()
        );
        Self::render_block(&mut out, reader.root(), 1)?;

        for group in reader.groups() {
            let group = group?;
            if !group.is_present() {
                let _ = writeln!(out, "  {}: <absent: not in version>", group.name());
                continue;
            }
            let count = group.len();
            let _ = writeln!(
                out,
                "  {}: {count} {}, block {}",
                group.name(),
                if count == 1 { "entry" } else { "entries" },
                group.header().block_length
            );
            for (index, entry) in group.iter().enumerate() {
                let _ = writeln!(out, "    [{index}]");
                Self::render_block(&mut out, &entry, 3)?;
            }
        }

        Ok(out)
    }

    fn render_block(
        out: &mut String,
        block: &BlockReader<'_>,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let indent = "  ".repeat(depth);
        for desc in block.fields() {
            let shown = Self::render_field(block, desc)?;
            let _ = writeln!(out, "{indent}{} = {shown}", desc.name);
        }
        Ok(())
    }

    fn render_field(block: &BlockReader<'_>, desc: &FieldDescriptor) -> Result<String, DecodeError> {
        Ok(match block.read(desc)? {
            FieldRead::Value(value) if desc.is_constant() => format!("{value} (constant)"),
            FieldRead::Value(value) => value.to_string(),
            FieldRead::Null => "null".to_owned(),
            FieldRead::Absent(Absence::NotInVersion) => "<absent: not in version>".to_owned(),
            FieldRead::Absent(Absence::BeyondBlock) => "<absent: beyond block>".to_owned(),
        })
    }
}
