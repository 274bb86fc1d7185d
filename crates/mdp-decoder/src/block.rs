use mdp_types::{FieldDescriptor, FieldKind, FieldValue, FromFieldValue};
use mdp_wire::ByteView;

use crate::error::DecodeError;

/// Why a declared field is not in the buffer being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Absence {
    /// The producer's schema version predates the field.
    NotInVersion,
    /// The field lies past the acting block length: the producer was
    /// built with a shorter block.
    BeyondBlock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent(Absence),
}

/// The full outcome of reading one field.
///
/// [`BlockReader::get`] folds this into an `Option` using each field's
/// default; callers that need to tell "unset" from "absent" match on
/// this instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRead<'a> {
    Value(FieldValue<'a>),
    /// Present on the wire, holding the null sentinel.
    Null,
    Absent(Absence),
}

impl<'a> FieldRead<'a> {
    /// Apply the default policy: null and absent optional fields become
    /// `None`, absent required fields become their zero value.
    #[must_use]
    pub fn or_default(self, desc: &FieldDescriptor) -> Option<FieldValue<'a>> {
        match self {
            Self::Value(v) => Some(v),
            Self::Null => None,
            Self::Absent(_) => desc.absent_value(),
        }
    }
}

/// Read-only accessor over one fixed-size block: a message's root block
/// or a single repeating-group entry.
///
/// The reader binds a body view to the acting version and acting block
/// length reported by the producer, and applies the same rule to every
/// field it is asked for:
///
/// ```text
///   acting_version < since_version        → Absent(NotInVersion)
///   offset + width > acting_block_length  → Absent(BeyondBlock)
///   otherwise                             → read `width` bytes at `offset`
///                                           (bounds error if the buffer is
///                                            shorter than the block)
/// ```
///
/// The body view is `min(acting_block_length, buf.len() - offset)` long,
/// so bytes after the acting block (trailing groups, newer fields this
/// table does not know) are never visible to a field read.
#[derive(Clone, Copy, Debug)]
pub struct BlockReader<'a> {
    view: ByteView<'a>,
    acting_version: u16,
    acting_block_length: usize,
    name: &'static str,
    fields: &'static [FieldDescriptor],
}

impl<'a> BlockReader<'a> {
    /// Wrap the block starting at `offset` in `buf`.
    ///
    /// `name` identifies the template or group in error messages.
    #[must_use]
    pub fn new(
        buf: &'a [u8],
        offset: usize,
        acting_block_length: usize,
        acting_version: u16,
        name: &'static str,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self {
            view: ByteView::clamped(buf, offset, acting_block_length),
            acting_version,
            acting_block_length,
            name,
            fields,
        }
    }

    #[must_use]
    pub fn acting_version(&self) -> u16 {
        self.acting_version
    }

    #[must_use]
    pub fn acting_block_length(&self) -> usize {
        self.acting_block_length
    }

    /// The template or group name this block belongs to.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// The bytes of the block that are actually in the buffer.
    #[must_use]
    pub fn as_slice(&self) -> &'a [u8] {
        self.view.as_slice()
    }

    /// Whether the producer could have written `desc` into this block.
    #[must_use]
    pub fn presence(&self, desc: &FieldDescriptor) -> Presence {
        if !desc.exists_in(self.acting_version) {
            Presence::Absent(Absence::NotInVersion)
        } else if desc.end() > self.acting_block_length {
            Presence::Absent(Absence::BeyondBlock)
        } else {
            Presence::Present
        }
    }

    /// Read a field, reporting whether it was set, null, or absent.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Wire`] if the field is inside the acting
    /// block but the buffer ends before it.
    pub fn read(&self, desc: &FieldDescriptor) -> Result<FieldRead<'a>, DecodeError> {
        if let Presence::Absent(why) = self.presence(desc) {
            return Ok(FieldRead::Absent(why));
        }
        if let FieldKind::Constant(value) = desc.kind {
            return Ok(FieldRead::Value(value));
        }

        let bytes = self.view.read(desc.offset, desc.width())?;
        Ok(match desc.decode(bytes)? {
            Some(value) => FieldRead::Value(value),
            None => FieldRead::Null,
        })
    }

    /// Read a field under the default policy (see [`FieldRead::or_default`]).
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn get(&self, desc: &FieldDescriptor) -> Result<Option<FieldValue<'a>>, DecodeError> {
        Ok(self.read(desc)?.or_default(desc))
    }

    /// Look up a field descriptor by name.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownField`] if the block has no such field.
    pub fn descriptor(&self, name: &str) -> Result<&'static FieldDescriptor, DecodeError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| DecodeError::UnknownField {
                template: self.name,
                field: name.to_owned(),
            })
    }

    /// Read a field by name under the default policy.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownField`] for an unknown name, otherwise see
    /// [`read`](Self::read).
    pub fn field(&self, name: &str) -> Result<Option<FieldValue<'a>>, DecodeError> {
        let desc = self.descriptor(name)?;
        self.get(desc)
    }

    /// Read a field as a concrete Rust type.
    ///
    /// # Errors
    ///
    /// [`DecodeError::KindMismatch`] if `T` does not match the field's
    /// kind, otherwise see [`read`](Self::read).
    pub fn value<T: FromFieldValue>(&self, desc: &FieldDescriptor) -> Result<Option<T>, DecodeError> {
        match self.get(desc)? {
            None => Ok(None),
            Some(value) => T::from_field_value(value)
                .map(Some)
                .ok_or(DecodeError::KindMismatch {
                    field: desc.name,
                    expected: T::KIND,
                    found: value.kind_name(),
                }),
        }
    }

    /// Read a field that must have a value.
    ///
    /// # Errors
    ///
    /// [`DecodeError::MissingValue`] if the field is null, otherwise see
    /// [`value`](Self::value).
    pub fn required<T: FromFieldValue>(&self, desc: &FieldDescriptor) -> Result<T, DecodeError> {
        self.value(desc)?
            .ok_or(DecodeError::MissingValue { field: desc.name })
    }

    /// Read a one-byte enum field, whether it is encoded as `u8` or `char`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::KindMismatch`] for wider fields, otherwise see
    /// [`read`](Self::read).
    pub fn wire_byte(&self, desc: &FieldDescriptor) -> Result<Option<u8>, DecodeError> {
        match self.get(desc)? {
            None => Ok(None),
            Some(FieldValue::U8(b) | FieldValue::Char(b)) => Ok(Some(b)),
            Some(other) => Err(DecodeError::KindMismatch {
                field: desc.name,
                expected: "u8 or char",
                found: other.kind_name(),
            }),
        }
    }

    /// Read a char array field as text, NUL padding stripped.
    ///
    /// # Errors
    ///
    /// [`DecodeError::KindMismatch`] if the field is not a char array,
    /// otherwise see [`read`](Self::read).
    pub fn text(&self, desc: &FieldDescriptor) -> Result<Option<&'a str>, DecodeError> {
        match self.get(desc)? {
            None => Ok(None),
            Some(value @ FieldValue::Chars(_)) => Ok(value.as_str()),
            Some(other) => Err(DecodeError::KindMismatch {
                field: desc.name,
                expected: "char array",
                found: other.kind_name(),
            }),
        }
    }
}
