use mdp_wire::WireError;

/// Errors raised by the field codec, the schema tables, and the template
/// registry.
///
/// These sit one level above [`WireError`]: they are about what the bytes
/// *mean* under a given schema, not whether the bytes are there.
///
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                                    │
/// │   ├── UnknownTemplate   ← registry has no table for an id │
/// │   ├── UnknownField      ← name not in a field table       │
/// │   ├── UnknownGroup      ← name not in a template's groups │
/// │   ├── InvalidTemplate   ← table fails layout checks       │
/// │   ├── KindMismatch      ← value variant ≠ field kind      │
/// │   ├── WidthMismatch     ← slice length ≠ field width      │
/// │   ├── ExponentMismatch  ← decimal exponent ≠ schema's     │
/// │   ├── NotNullable       ← null written to required field  │
/// │   ├── InvalidEnumValue  ← wire byte outside an enum       │
/// │   └── wraps WireError                                     │
/// └───────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// No field table is registered for this template id.
    #[error("unknown template id {template_id}")]
    UnknownTemplate { template_id: u16 },

    #[error("template {template} has no field named {field:?}")]
    UnknownField {
        template: &'static str,
        field: String,
    },

    #[error("template {template} has no group named {group:?}")]
    UnknownGroup {
        template: &'static str,
        group: String,
    },

    /// A compiled table is internally inconsistent, e.g. a field ends past
    /// the declared block length.
    #[error("template {template} is invalid: {reason}")]
    InvalidTemplate {
        template: &'static str,
        reason: String,
    },

    /// A value's variant does not match the field's kind.
    #[error("expected a {expected} value, got {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The byte slice handed to the codec is not exactly the field width.
    #[error("field width is {expected} bytes, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    /// A decimal was written with a different exponent than the schema's
    /// constant exponent.
    #[error("decimal exponent {found} does not match schema exponent {expected}")]
    ExponentMismatch { expected: i8, found: i8 },

    /// A null was written to a field that has no null sentinel.
    #[error("field {field} is not nullable")]
    NotNullable { field: &'static str },

    /// An enum field contained a byte outside its defined set.
    #[error("invalid {enum_name} value: {value:#04X}")]
    InvalidEnumValue { enum_name: &'static str, value: u8 },

    #[error(transparent)]
    Wire(#[from] WireError),
}
