use mdp_types::TypeError;
use mdp_wire::WireError;

/// A problem with one `set` or `entry` call.
///
/// The builder methods chain, so they cannot return these directly. The
/// first one is kept and reported by `encode()`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{block} has no field named {field:?}")]
    UnknownField { block: &'static str, field: String },

    #[error("template {template} has no group named {group:?}")]
    UnknownGroup {
        template: &'static str,
        group: String,
    },

    /// The field was introduced after the version being encoded.
    #[error("field {field} exists since version {since}, encoding version {version}")]
    NotInVersion {
        field: &'static str,
        since: u16,
        version: u16,
    },

    #[error("group {group} exists since version {since}, encoding version {version}")]
    GroupNotInVersion {
        group: &'static str,
        since: u16,
        version: u16,
    },

    /// The field does not fit the block length being encoded.
    #[error("field {field} ends at byte {end}, past block length {block_length}")]
    BeyondBlock {
        field: &'static str,
        end: usize,
        block_length: usize,
    },

    /// A schema constant was given a different value.
    #[error("field {field} is a schema constant")]
    ConstantMismatch { field: &'static str },

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Errors that can occur while encoding a message or packet.
///
/// ```text
///   EncodeError
///   ├── Field(FieldError)  ← bad set/entry call, reported at encode()
///   ├── MessageTooLarge    ← message does not fit a u16 MsgSize
///   ├── Wire(WireError)    ← header or group dimension write failed
///   └── Io(std::io::Error) ← from write_to
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("message of {size} bytes exceeds the MsgSize limit of {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
