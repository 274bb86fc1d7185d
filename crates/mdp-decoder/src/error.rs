use mdp_types::TypeError;
use mdp_wire::WireError;

/// Errors that can occur while decoding MDP packets and SBE messages.
///
/// Version and block-length gaps are not errors: a field that the
/// producer's schema did not carry reads as its default. Only bytes the
/// header promises but the buffer lacks, and ids nobody can interpret,
/// end a decode attempt.
///
/// ```text
///   DecodeError
///   ├── InvalidHeader(WireError)   ← packet or message header cut short
///   ├── UnknownTemplate            ← no field table for the template id
///   ├── TemplateMismatch           ← typed view over another template
///   ├── SchemaMismatch             ← header schema id ≠ configured schema
///   ├── UnknownField               ← name not in the template's field table
///   ├── UnknownGroup               ← name not in the template's groups
///   ├── KindMismatch               ← typed accessor ≠ field kind
///   ├── MissingValue               ← required accessor found null
///   ├── Type(TypeError)            ← from mdp-types (codec, enums)
///   └── Wire(WireError)            ← from mdp-wire (bounds, framing)
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The packet header or an SBE message header is shorter than its
    /// fixed width.
    #[error("invalid header: {0}")]
    InvalidHeader(WireError),

    /// The header names a template with no registered field table.
    ///
    /// Kept apart from bounds errors: the bytes may be perfectly fine,
    /// this decoder just cannot interpret them.
    #[error("unknown template id {template_id} (schema {schema_id}, version {version})")]
    UnknownTemplate {
        template_id: u16,
        schema_id: u16,
        version: u16,
    },

    /// A typed view was asked to wrap a reader bound to another template.
    #[error("expected template {expected}, found template {found}")]
    TemplateMismatch { expected: u16, found: u16 },

    #[error("schema id {found} does not match expected schema {expected}")]
    SchemaMismatch { expected: u16, found: u16 },

    #[error("{template} has no field named {field:?}")]
    UnknownField {
        template: &'static str,
        field: String,
    },

    #[error("{template} has no group named {group:?}")]
    UnknownGroup {
        template: &'static str,
        group: String,
    },

    /// A typed accessor asked for a different kind than the field holds.
    #[error("field {field}: expected {expected}, found {found}")]
    KindMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A required accessor was used on a field that decoded as null.
    #[error("field {field} has no value")]
    MissingValue { field: &'static str },

    #[error(transparent)]
    Type(#[from] TypeError),

    /// Bounds and framing errors: the buffer is shorter than its headers
    /// claim.
    #[error(transparent)]
    Wire(#[from] WireError),
}
