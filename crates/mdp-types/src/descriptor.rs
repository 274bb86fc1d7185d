use mdp_wire::GroupDimension;

use crate::codec::{FieldKind, FieldValue};
use crate::error::TypeError;

/// One schema-declared field: where it sits in its block, how it is
/// encoded, and from which schema version onwards it exists.
///
/// Descriptors are `const`-constructed and live in `'static` tables that
/// every reader of a template shares. Nothing mutates them at runtime.
///
/// ```rust
/// use mdp_types::codec::{null, FieldKind};
/// use mdp_types::FieldDescriptor;
///
/// const HIGH_LIMIT_PRICE: FieldDescriptor =
///     FieldDescriptor::new("HighLimitPrice", 1149, 0, FieldKind::Decimal64 { exponent: -9 })
///         .nullable(null::PRICE_NULL9);
///
/// assert_eq!(HIGH_LIMIT_PRICE.width(), 8);
/// assert!(HIGH_LIMIT_PRICE.is_nullable());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// FIX tag number of the field.
    pub id: u16,
    /// Byte offset from the start of the block.
    pub offset: usize,
    pub kind: FieldKind,
    /// First schema version in which the field exists.
    pub since_version: u16,
    /// Raw bit pattern meaning "not set", for optional fields.
    pub null: Option<u64>,
}

impl FieldDescriptor {
    /// A required field present since version 0.
    #[must_use]
    pub const fn new(name: &'static str, id: u16, offset: usize, kind: FieldKind) -> Self {
        Self {
            name,
            id,
            offset,
            kind,
            since_version: 0,
            null: None,
        }
    }

    /// A schema constant. It occupies no bytes and is never read.
    #[must_use]
    pub const fn constant(name: &'static str, id: u16, value: FieldValue<'static>) -> Self {
        Self::new(name, id, 0, FieldKind::Constant(value))
    }

    /// Mark the field optional with the given null sentinel.
    #[must_use]
    pub const fn nullable(self, sentinel: u64) -> Self {
        Self {
            null: Some(sentinel),
            ..self
        }
    }

    /// Mark the field as introduced in schema `version`.
    #[must_use]
    pub const fn since(self, version: u16) -> Self {
        Self {
            since_version: version,
            ..self
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    /// One past the last byte of the field, relative to the block start.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.width()
    }

    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self.kind, FieldKind::Constant(_))
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.null.is_some()
    }

    /// Whether a producer speaking `acting_version` could have written this field.
    #[must_use]
    pub const fn exists_in(&self, acting_version: u16) -> bool {
        acting_version >= self.since_version
    }

    /// Decode the field from bytes already sliced to its width.
    ///
    /// Returns `Ok(None)` when the bytes hold the null sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::WidthMismatch`] if `bytes` is not exactly the
    /// field width.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Option<FieldValue<'a>>, TypeError> {
        if let Some(sentinel) = self.null
            && self.kind.is_null(bytes, sentinel)
        {
            return Ok(None);
        }
        self.kind.decode(bytes).map(Some)
    }

    /// The value an accessor reports when the field is not in the buffer
    /// at all: `None` for optional fields, the kind's zero otherwise.
    /// Constants always report their schema value.
    #[must_use]
    pub const fn absent_value(&self) -> Option<FieldValue<'static>> {
        match self.kind {
            FieldKind::Constant(v) => Some(v),
            kind if self.null.is_none() => Some(kind.zero()),
            _ => None,
        }
    }

    /// Encode `value` into `out`, which must be exactly the field width.
    ///
    /// # Errors
    ///
    /// See [`FieldKind::encode`].
    pub fn encode(&self, value: FieldValue<'_>, out: &mut [u8]) -> Result<(), TypeError> {
        self.kind.encode(value, out)
    }

    /// Write the field's null sentinel into `out`.
    ///
    /// # Errors
    ///
    /// - [`TypeError::NotNullable`] if the field has no sentinel.
    /// - [`TypeError::WidthMismatch`] if `out` has the wrong length.
    pub fn encode_null(&self, out: &mut [u8]) -> Result<(), TypeError> {
        let sentinel = self
            .null
            .ok_or(TypeError::NotNullable { field: self.name })?;
        self.kind.encode_null(sentinel, out)
    }
}

/// A repeating group: a dimension header followed by `numInGroup`
/// fixed-size entries, each laid out by `fields`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupDescriptor {
    pub name: &'static str,
    /// FIX tag of the group's count field.
    pub id: u16,
    pub dimension: GroupDimension,
    /// Entry size this schema version writes.
    pub block_length: u16,
    pub since_version: u16,
    pub fields: &'static [FieldDescriptor],
}

impl GroupDescriptor {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub const fn exists_in(&self, acting_version: u16) -> bool {
        acting_version >= self.since_version
    }
}

/// A compiled message template: the root block's field table plus its
/// repeating groups in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Template {
    pub id: u16,
    pub name: &'static str,
    /// Root block size this schema version writes.
    pub block_length: u16,
    pub since_version: u16,
    pub fields: &'static [FieldDescriptor],
    pub groups: &'static [GroupDescriptor],
}

impl Template {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&'static GroupDescriptor> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Check that every field fits inside its block and that group entry
    /// layouts fit their declared entry size.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidTemplate`] describing the first problem.
    pub fn validate(&self) -> Result<(), TypeError> {
        check_fields(self.name, "root block", self.fields, self.block_length)?;
        for group in self.groups {
            check_fields(self.name, group.name, group.fields, group.block_length)?;
            if group.since_version < self.since_version {
                return Err(TypeError::InvalidTemplate {
                    template: self.name,
                    reason: format!(
                        "group {} predates its template (version {} < {})",
                        group.name, group.since_version, self.since_version
                    ),
                });
            }
        }
        Ok(())
    }
}

fn check_fields(
    template: &'static str,
    block: &str,
    fields: &[FieldDescriptor],
    block_length: u16,
) -> Result<(), TypeError> {
    for (i, field) in fields.iter().enumerate() {
        if field.end() > usize::from(block_length) {
            return Err(TypeError::InvalidTemplate {
                template,
                reason: format!(
                    "{block}: field {} ends at byte {} past block length {block_length}",
                    field.name,
                    field.end()
                ),
            });
        }
        if fields[..i].iter().any(|other| other.name == field.name) {
            return Err(TypeError::InvalidTemplate {
                template,
                reason: format!("{block}: duplicate field {}", field.name),
            });
        }
    }
    Ok(())
}
