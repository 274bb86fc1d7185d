use mdp_types::{FieldDescriptor, FieldValue};

use crate::error::FieldError;

/// Serializes one fixed-size block: a root block or a group entry.
///
/// The block starts out with every optional field holding its null
/// sentinel and every other byte zeroed, so a field that is never set
/// decodes as "not set" rather than as a misleading zero. Writes land
/// immediately; the checks that depend on the version and block length
/// being encoded run in [`finish`](Self::finish).
#[derive(Clone, Debug)]
pub struct BlockWriter {
    name: &'static str,
    fields: &'static [FieldDescriptor],
    bytes: Vec<u8>,
    written: Vec<&'static FieldDescriptor>,
}

impl BlockWriter {
    /// A fresh block laid out by `fields`, at least `block_length` bytes
    /// long.
    #[must_use]
    pub fn new(
        name: &'static str,
        fields: &'static [FieldDescriptor],
        block_length: usize,
    ) -> Self {
        let size = fields
            .iter()
            .map(FieldDescriptor::end)
            .fold(block_length, usize::max);
        let mut bytes = vec![0u8; size];
        for desc in fields.iter().filter(|d| d.is_nullable()) {
            // Width matches by construction and the field is nullable.
            let _ = desc.encode_null(&mut bytes[desc.offset..desc.end()]);
        }
        Self {
            name,
            fields,
            bytes,
            written: Vec::new(),
        }
    }

    /// The template or group name this block belongs to.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bytes written so far, sized to the full field layout.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn descriptor(&self, name: &str) -> Result<&'static FieldDescriptor, FieldError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FieldError::UnknownField {
                block: self.name,
                field: name.to_owned(),
            })
    }

    fn mark(&mut self, desc: &'static FieldDescriptor) {
        if !self.written.iter().any(|d| d.name == desc.name) {
            self.written.push(desc);
        }
    }

    /// Write `value` into the field called `name`.
    ///
    /// Setting a schema constant to its own value is accepted and writes
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`FieldError::UnknownField`] for a name not in the layout.
    /// - [`FieldError::ConstantMismatch`] for a different constant value.
    /// - [`FieldError::Type`] if the value does not fit the field kind.
    pub fn set(&mut self, name: &str, value: FieldValue<'_>) -> Result<(), FieldError> {
        let desc = self.descriptor(name)?;
        if desc.is_constant() {
            return if desc.kind.zero() == value {
                Ok(())
            } else {
                Err(FieldError::ConstantMismatch { field: desc.name })
            };
        }
        desc.encode(value, &mut self.bytes[desc.offset..desc.end()])?;
        self.mark(desc);
        Ok(())
    }

    /// Write the null sentinel into the field called `name`.
    ///
    /// # Errors
    ///
    /// - [`FieldError::UnknownField`] for a name not in the layout.
    /// - [`FieldError::Type`] if the field is required.
    pub fn set_null(&mut self, name: &str) -> Result<(), FieldError> {
        let desc = self.descriptor(name)?;
        desc.encode_null(&mut self.bytes[desc.offset..desc.end()])?;
        self.mark(desc);
        Ok(())
    }

    /// The block as a producer speaking `version` with a
    /// `block_length`-byte block would write it. The layout is cut or
    /// zero-extended to fit.
    ///
    /// # Errors
    ///
    /// - [`FieldError::NotInVersion`] if a set field postdates `version`.
    /// - [`FieldError::BeyondBlock`] if a set field does not fit.
    pub fn finish(&self, block_length: usize, version: u16) -> Result<Vec<u8>, FieldError> {
        for desc in &self.written {
            if !desc.exists_in(version) {
                return Err(FieldError::NotInVersion {
                    field: desc.name,
                    since: desc.since_version,
                    version,
                });
            }
            if desc.end() > block_length {
                return Err(FieldError::BeyondBlock {
                    field: desc.name,
                    end: desc.end(),
                    block_length,
                });
            }
        }
        let mut out = self.bytes.clone();
        out.resize(block_length, 0);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdp_types::schema::mdp3::{
        incremental_refresh_limits_banding_50 as limits,
        incremental_refresh_trade_summary_48 as trades,
    };
    use mdp_types::{Decimal, TypeError};

    fn limits_entry() -> BlockWriter {
        BlockWriter::new("NoMDEntries", &limits::ENTRY_FIELDS, 32)
    }

    #[test]
    fn optional_fields_start_null() {
        let writer = limits_entry();
        let bytes = writer.as_bytes();
        assert_eq!(&bytes[0..8], &i64::MAX.to_le_bytes());
        assert_eq!(&bytes[16..24], &i64::MAX.to_le_bytes());
        assert_eq!(&bytes[24..32], &[0u8; 8]);
    }

    #[test]
    fn set_writes_little_endian() {
        let mut writer = limits_entry();
        writer.set("SecurityID", FieldValue::I32(5620)).unwrap();
        writer
            .set(
                "LowLimitPrice",
                FieldValue::Decimal(Decimal::new(9_000_000_000_000, -9)),
            )
            .unwrap();
        let bytes = writer.finish(32, 9).unwrap();
        assert_eq!(&bytes[24..28], &[0xF4, 0x15, 0x00, 0x00]);
        assert_eq!(
            &bytes[8..16],
            &[0x00, 0x90, 0xCD, 0x79, 0x2F, 0x08, 0x00, 0x00]
        );
    }

    #[test]
    fn constants_accept_only_their_value() {
        let mut writer = limits_entry();
        assert!(writer.set("MDEntryType", FieldValue::Char(b'g')).is_ok());
        assert_eq!(
            writer.set("MDEntryType", FieldValue::Char(b'J')),
            Err(FieldError::ConstantMismatch {
                field: "MDEntryType"
            })
        );
    }

    #[test]
    fn null_into_required_field() {
        let mut writer = limits_entry();
        assert_eq!(
            writer.set_null("RptSeq"),
            Err(FieldError::Type(TypeError::NotNullable { field: "RptSeq" }))
        );
    }

    #[test]
    fn finish_checks_version_and_length() {
        let mut writer = BlockWriter::new("NoMDEntries", &trades::ENTRY_FIELDS, 32);
        writer.set("MDTradeEntryID", FieldValue::U32(7)).unwrap();
        assert_eq!(
            writer.finish(32, 9),
            Err(FieldError::NotInVersion {
                field: "MDTradeEntryID",
                since: 10,
                version: 9
            })
        );
        assert_eq!(
            writer.finish(28, 13),
            Err(FieldError::BeyondBlock {
                field: "MDTradeEntryID",
                end: 30,
                block_length: 28
            })
        );
        assert_eq!(writer.finish(40, 13).unwrap().len(), 40);
    }

    #[test]
    fn unset_fields_past_block_are_dropped() {
        let writer = limits_entry();
        assert_eq!(writer.finish(16, 9).unwrap().len(), 16);
    }
}
