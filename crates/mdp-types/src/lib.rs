#![warn(clippy::pedantic)]

pub mod codec;
pub mod descriptor;
pub mod enums;
pub mod error;
pub mod registry;
pub mod schema;

pub use codec::{Decimal, FieldKind, FieldValue, FromFieldValue};
pub use descriptor::{FieldDescriptor, GroupDescriptor, Template};
pub use enums::{
    AggressorSide, EntryType, HaltReason, MatchEventIndicator, MdUpdateAction, OrderUpdateAction,
    SecurityTradingEvent, SecurityTradingStatus,
};
pub use error::TypeError;
pub use registry::TemplateRegistry;
