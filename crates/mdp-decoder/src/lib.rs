#![warn(clippy::pedantic)]

pub mod block;
pub mod config;
pub mod decoder;
pub mod error;
pub mod group;
pub mod message;
pub mod messages;
pub mod render;

pub use block::{Absence, BlockReader, FieldRead, Presence};
pub use config::{DecoderConfig, UnknownTemplatePolicy};
pub use decoder::{DecodedMessage, DecodedPacket, PacketDecoder, SkippedMessage};
pub use error::DecodeError;
pub use group::{GroupEntries, GroupReader, Groups};
pub use message::MessageReader;
pub use messages::Mdp3Message;
pub use render::TextRenderer;
