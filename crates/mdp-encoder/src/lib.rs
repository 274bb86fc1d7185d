#![warn(clippy::pedantic)]

pub mod block_writer;
pub mod encoder;
pub mod error;
pub mod packet;

pub use block_writer::BlockWriter;
pub use encoder::{EntryEncoder, MessageEncoder};
pub use error::{EncodeError, FieldError};
pub use packet::PacketEncoder;
