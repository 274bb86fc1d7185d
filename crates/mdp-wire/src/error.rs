/// Errors raised while reading or writing raw wire structures.
///
/// Every variant carries the offsets involved so a bad capture can be
/// located with a hex dump. None of these are recoverable for the buffer
/// that produced them: the caller drops the message (or packet) and lets
/// the session layer decide whether to request it again.
///
/// ```text
///   WireError
///   ├── OutOfBounds        ← read/write window extends past the view
///   ├── MalformedHeader    ← fixed-size header does not fit in the buffer
///   ├── InvalidMessageSize ← packet MsgSize prefix is too small or too large
///   └── CountOverflow      ← group count does not fit the dimension encoding
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// A read or write of `width` bytes at `offset` would extend past the
    /// `len` bytes the view exposes.
    #[error("read of {width} bytes at offset {offset} exceeds view length {len}")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// A fixed-width header (message, group, or packet) was cut short.
    #[error("malformed {what} header: need {needed} bytes, {available} available")]
    MalformedHeader {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    /// A packet's MsgSize prefix is smaller than a message header or runs
    /// past the end of the packet.
    #[error("invalid message size {size} at packet offset {offset} ({remaining} bytes remain)")]
    InvalidMessageSize {
        size: usize,
        offset: usize,
        remaining: usize,
    },

    /// A repeating-group count exceeds what its dimension encoding can hold.
    #[error("group count {count} exceeds dimension maximum {max}")]
    CountOverflow { count: usize, max: usize },
}
