/// Implementation of `mdp schema`.
///
/// Without arguments, lists the built-in templates. With `--template ID`,
/// prints that template's root block and group layouts.
///
/// ```text
/// MDIncrementalRefreshLimitsBanding50 (id 50, block 11, since 9)
///   offset  width  kind        since  null                  name
///   0       8      u64         0      -                     TransactTime
///   8       1      u8          0      -                     MatchEventIndicator
///   group NoMDEntries (tag 268, GroupSize, entry block 32, since 9)
///     0       8      decimal-9   0      0x7FFFFFFFFFFFFFFF    HighLimitPrice
///     ...
/// ```
use anyhow::{Result, anyhow};
use mdp_types::{FieldDescriptor, FieldKind, Template, TemplateRegistry};

use crate::SchemaArgs;

/// Run the `mdp schema` command.
///
/// # Errors
///
/// Returns an error if `--template` names an id with no field table.
pub fn run(args: &SchemaArgs) -> Result<()> {
    let registry = TemplateRegistry::mdp3();

    let Some(id) = args.template else {
        println!(
            "Schema {} version {}, {} templates",
            registry.schema_id(),
            registry.schema_version(),
            registry.len()
        );
        for template in registry.templates() {
            let groups: Vec<&str> = template.groups.iter().map(|g| g.name).collect();
            println!(
                "  {:>3}  {:<38} block {:>2}  since {:>2}  groups: {}",
                template.id,
                template.name,
                template.block_length,
                template.since_version,
                if groups.is_empty() {
                    "-".to_string()
                } else {
                    groups.join(", ")
                }
            );
        }
        return Ok(());
    };

    let template = registry
        .get(id)
        .ok_or_else(|| anyhow!("no built-in template with id {id}"))?;
    print_template(template);
    Ok(())
}

fn print_template(template: &Template) {
    println!(
        "{} (id {}, block {}, since {})",
        template.name, template.id, template.block_length, template.since_version
    );
    print_fields(template.fields, "  ");
    for group in template.groups {
        println!(
            "  group {} (tag {}, {:?}, entry block {}, since {})",
            group.name, group.id, group.dimension, group.block_length, group.since_version
        );
        print_fields(group.fields, "    ");
    }
}

fn print_fields(fields: &[FieldDescriptor], indent: &str) {
    println!(
        "{indent}{:<7} {:<6} {:<11} {:<6} {:<21} name",
        "offset", "width", "kind", "since", "null"
    );
    for field in fields {
        let kind = match field.kind {
            FieldKind::Constant(value) => format!("const {value}"),
            FieldKind::CharArray(n) => format!("char[{n}]"),
            FieldKind::Decimal64 { exponent } | FieldKind::Decimal32 { exponent } => {
                format!("decimal{exponent}")
            }
            other => other.name().to_string(),
        };
        let offset = if field.is_constant() {
            "-".to_string()
        } else {
            field.offset.to_string()
        };
        let null = field
            .null
            .map_or_else(|| "-".to_string(), |n| format!("{n:#X}"));
        println!(
            "{indent}{offset:<7} {:<6} {kind:<11} {:<6} {null:<21} {}",
            field.width(),
            field.since_version,
            field.name
        );
    }
}
