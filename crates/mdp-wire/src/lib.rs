#![warn(clippy::pedantic)]

pub mod error;
pub mod group;
pub mod header;
pub mod packet;
pub mod view;

pub use error::WireError;
pub use group::{GroupDimension, GroupHeader};
pub use header::{MESSAGE_HEADER_SIZE, MessageHeader};
pub use packet::{Frames, MESSAGE_SIZE_LENGTH, MessageFrame, PACKET_HEADER_SIZE, Packet, PacketHeader};
pub use view::ByteView;
