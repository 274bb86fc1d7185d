use mdp_types::{FieldValue, GroupDescriptor, Template};
use mdp_wire::{GroupHeader, MESSAGE_HEADER_SIZE, MessageHeader, WireError};

use crate::block_writer::BlockWriter;
use crate::error::{EncodeError, FieldError};

/// Builds one SBE message from a compiled [`Template`].
///
/// Fields are set by name and groups are filled one entry at a time.
/// The builder methods chain and never fail on their own: the first bad
/// call is remembered and returned by [`encode`](Self::encode).
///
/// ```rust
/// use mdp_encoder::MessageEncoder;
/// use mdp_types::schema::mdp3::incremental_refresh_limits_banding_50 as limits;
/// use mdp_types::{Decimal, FieldValue};
///
/// let mut encoder = MessageEncoder::new(&limits::TEMPLATE, 1, 9);
/// encoder.set("TransactTime", FieldValue::U64(1_633_099_253_937_623_627));
/// encoder.entry("NoMDEntries", |e| {
///     e.set("LowLimitPrice", FieldValue::Decimal(Decimal::new(9_000_000_000_000, -9)))
///         .set("SecurityID", FieldValue::I32(5620))
///         .set("RptSeq", FieldValue::U32(1869));
/// });
/// let message = encoder.encode().unwrap();
/// assert_eq!(message.len(), 8 + 11 + 3 + 32);
/// ```
///
/// # Output layout
///
/// ```text
/// ┌──────────────┬─────────────────────────────────────────────┐
/// │ [8 bytes]    │ SBE message header                          │
/// │ [blockLength]│ Root block                                  │
/// │ per group:   │ dimension header + numInGroup × entry block │
/// └──────────────┴─────────────────────────────────────────────┘
/// ```
///
/// Groups the encoded version predates are left out entirely.
#[derive(Clone, Debug)]
pub struct MessageEncoder {
    template: &'static Template,
    schema_id: u16,
    version: u16,
    block_length: Option<u16>,
    root: BlockWriter,
    groups: Vec<PendingGroup>,
    error: Option<FieldError>,
}

#[derive(Clone, Debug)]
struct PendingGroup {
    descriptor: &'static GroupDescriptor,
    block_length: Option<u16>,
    entries: Vec<BlockWriter>,
}

impl MessageEncoder {
    /// Start a message for `template`, stamped with `schema_id` and
    /// `version` in its header.
    #[must_use]
    pub fn new(template: &'static Template, schema_id: u16, version: u16) -> Self {
        Self {
            template,
            schema_id,
            version,
            block_length: None,
            root: BlockWriter::new(
                template.name,
                template.fields,
                usize::from(template.block_length),
            ),
            groups: template
                .groups
                .iter()
                .map(|descriptor| PendingGroup {
                    descriptor,
                    block_length: None,
                    entries: Vec::new(),
                })
                .collect(),
            error: None,
        }
    }

    #[must_use]
    pub fn template(&self) -> &'static Template {
        self.template
    }

    #[must_use]
    pub fn version(&self) -> u16 {
        self.version
    }

    fn record(&mut self, error: FieldError) {
        self.error.get_or_insert(error);
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.descriptor.name == name)
    }

    /// Write a root block of `block_length` bytes instead of the
    /// template's, as an older or newer producer would.
    pub fn with_block_length(&mut self, block_length: u16) -> &mut Self {
        self.block_length = Some(block_length);
        self
    }

    /// Write entries of `group` with `block_length` bytes each.
    pub fn with_group_block_length(&mut self, group: &str, block_length: u16) -> &mut Self {
        match self.group_index(group) {
            Some(i) => self.groups[i].block_length = Some(block_length),
            None => self.record(FieldError::UnknownGroup {
                template: self.template.name,
                group: group.to_owned(),
            }),
        }
        self
    }

    /// Set a root block field.
    pub fn set(&mut self, name: &str, value: FieldValue<'_>) -> &mut Self {
        if let Err(e) = self.root.set(name, value) {
            self.record(e);
        }
        self
    }

    /// Set a root block field to null.
    pub fn set_null(&mut self, name: &str) -> &mut Self {
        if let Err(e) = self.root.set_null(name) {
            self.record(e);
        }
        self
    }

    /// Append an entry to `group`, filled in by `fill`.
    pub fn entry(&mut self, group: &str, fill: impl FnOnce(&mut EntryEncoder)) -> &mut Self {
        let Some(index) = self.group_index(group) else {
            self.record(FieldError::UnknownGroup {
                template: self.template.name,
                group: group.to_owned(),
            });
            return self;
        };

        let descriptor = self.groups[index].descriptor;
        let mut entry = EntryEncoder {
            writer: BlockWriter::new(
                descriptor.name,
                descriptor.fields,
                usize::from(descriptor.block_length),
            ),
            error: None,
        };
        fill(&mut entry);
        if let Some(e) = entry.error {
            self.record(e);
        }
        self.groups[index].entries.push(entry.writer);
        self
    }

    /// Serialize the message, header included.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::Field`] for the first bad builder call, a field
    ///   the encoded version or block length cannot carry, or entries in
    ///   a group the version predates.
    /// - [`EncodeError::Wire`] if a group has more entries than its
    ///   dimension encoding can count.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        if let Some(e) = &self.error {
            return Err(e.clone().into());
        }

        let block_length = self.block_length.unwrap_or(self.template.block_length);
        let mut out = vec![0u8; MESSAGE_HEADER_SIZE];
        MessageHeader {
            block_length,
            template_id: self.template.id,
            schema_id: self.schema_id,
            version: self.version,
        }
        .write_to(&mut out)?;
        out.extend(self.root.finish(usize::from(block_length), self.version)?);

        for group in &self.groups {
            let descriptor = group.descriptor;
            if !descriptor.exists_in(self.version) {
                if group.entries.is_empty() {
                    continue;
                }
                return Err(FieldError::GroupNotInVersion {
                    group: descriptor.name,
                    since: descriptor.since_version,
                    version: self.version,
                }
                .into());
            }

            let entry_length = group.block_length.unwrap_or(descriptor.block_length);
            let count = group.entries.len();
            let max = descriptor.dimension.max_count();
            let num_in_group = u16::try_from(count)
                .ok()
                .filter(|&n| usize::from(n) <= max)
                .ok_or(WireError::CountOverflow { count, max })?;

            let start = out.len();
            out.resize(start + descriptor.dimension.encoded_length(), 0);
            GroupHeader {
                block_length: entry_length,
                num_in_group,
            }
            .write_to(&mut out[start..], descriptor.dimension)?;

            for entry in &group.entries {
                out.extend(entry.finish(usize::from(entry_length), self.version)?);
            }
        }

        Ok(out)
    }
}

/// Fills in one repeating-group entry inside [`MessageEncoder::entry`].
#[derive(Debug)]
pub struct EntryEncoder {
    writer: BlockWriter,
    error: Option<FieldError>,
}

impl EntryEncoder {
    pub fn set(&mut self, name: &str, value: FieldValue<'_>) -> &mut Self {
        if let Err(e) = self.writer.set(name, value) {
            self.error.get_or_insert(e);
        }
        self
    }

    pub fn set_null(&mut self, name: &str) -> &mut Self {
        if let Err(e) = self.writer.set_null(name) {
            self.error.get_or_insert(e);
        }
        self
    }
}
