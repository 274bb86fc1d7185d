//! Typed views over the built-in MDP 3.0 templates.
//!
//! Each view wraps a [`MessageReader`] already bound to the right
//! template and exposes named accessors. Optional fields return
//! `Option`, enums are converted from their wire bytes, and repeating
//! groups come back as iterators of typed entries.

/// Bind a view type to the reader after checking the template id.
macro_rules! checked_view {
    ($view:ident, $id:path) => {
        impl<'a> $view<'a> {
            pub const TEMPLATE_ID: u16 = $id;

            /// Wrap `reader` if it is bound to this view's template.
            ///
            /// # Errors
            ///
            /// Returns [`DecodeError::TemplateMismatch`](crate::DecodeError)
            /// when the reader is bound to a different template.
            pub fn new(
                reader: $crate::message::MessageReader<'a>,
            ) -> Result<Self, $crate::error::DecodeError> {
                if reader.template_id() == Self::TEMPLATE_ID {
                    Ok(Self(reader))
                } else {
                    Err($crate::error::DecodeError::TemplateMismatch {
                        expected: Self::TEMPLATE_ID,
                        found: reader.template_id(),
                    })
                }
            }

            #[must_use]
            pub fn reader(&self) -> &$crate::message::MessageReader<'a> {
                &self.0
            }
        }
    };
}

mod book;
mod channel_reset;
mod limits_banding;
mod security_status;
mod trade_summary;

pub use book::{BookEntry, BookOrderEntry, IncrementalRefreshBook46};
pub use channel_reset::{ChannelReset4, ChannelResetEntry};
pub use limits_banding::{IncrementalRefreshLimitsBanding50, LimitsBandingEntry};
pub use security_status::SecurityStatus30;
pub use trade_summary::{IncrementalRefreshTradeSummary48, TradeOrderEntry, TradeSummaryEntry};

use mdp_types::schema::mdp3;
use mdp_types::{FieldDescriptor, MatchEventIndicator, TypeError};

use crate::block::{BlockReader, FieldRead};
use crate::error::DecodeError;
use crate::message::MessageReader;

/// A message dispatched to its typed view by template id.
#[derive(Clone, Copy, Debug)]
pub enum Mdp3Message<'a> {
    ChannelReset(ChannelReset4<'a>),
    SecurityStatus(SecurityStatus30<'a>),
    Book(IncrementalRefreshBook46<'a>),
    TradeSummary(IncrementalRefreshTradeSummary48<'a>),
    LimitsBanding(IncrementalRefreshLimitsBanding50<'a>),
}

impl<'a> Mdp3Message<'a> {
    /// Pick the typed view for the reader's template.
    ///
    /// Returns `None` for templates outside the built-in set.
    #[must_use]
    pub fn from_reader(reader: MessageReader<'a>) -> Option<Self> {
        Some(match reader.template_id() {
            mdp3::channel_reset_4::ID => Self::ChannelReset(ChannelReset4(reader)),
            mdp3::security_status_30::ID => Self::SecurityStatus(SecurityStatus30(reader)),
            mdp3::incremental_refresh_book_46::ID => Self::Book(IncrementalRefreshBook46(reader)),
            mdp3::incremental_refresh_trade_summary_48::ID => {
                Self::TradeSummary(IncrementalRefreshTradeSummary48(reader))
            }
            mdp3::incremental_refresh_limits_banding_50::ID => {
                Self::LimitsBanding(IncrementalRefreshLimitsBanding50(reader))
            }
            _ => return None,
        })
    }

    #[must_use]
    pub fn reader(&self) -> &MessageReader<'a> {
        match self {
            Self::ChannelReset(m) => &m.0,
            Self::SecurityStatus(m) => &m.0,
            Self::Book(m) => &m.0,
            Self::TradeSummary(m) => &m.0,
            Self::LimitsBanding(m) => &m.0,
        }
    }

    #[must_use]
    pub fn template_id(&self) -> u16 {
        self.reader().template_id()
    }

    /// `TransactTime` is in every built-in template.
    ///
    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn transact_time(&self) -> Result<u64, DecodeError> {
        match self {
            Self::ChannelReset(m) => m.transact_time(),
            Self::SecurityStatus(m) => m.transact_time(),
            Self::Book(m) => m.transact_time(),
            Self::TradeSummary(m) => m.transact_time(),
            Self::LimitsBanding(m) => m.transact_time(),
        }
    }
}

// ── Shared accessor helpers ───────────────────────────────────────────

fn match_event_indicator(
    block: &BlockReader<'_>,
    desc: &FieldDescriptor,
) -> Result<MatchEventIndicator, DecodeError> {
    Ok(MatchEventIndicator::from_raw(block.required::<u8>(desc)?))
}

/// Enum fixed by the schema; the value never comes from the wire.
fn constant_enum<E>(
    block: &BlockReader<'_>,
    desc: &FieldDescriptor,
    from_wire: fn(u8) -> Result<E, TypeError>,
) -> Result<E, DecodeError> {
    let byte = block
        .wire_byte(desc)?
        .ok_or(DecodeError::MissingValue { field: desc.name })?;
    Ok(from_wire(byte)?)
}

/// Required enum carried in the block. `None` when the producer's
/// version or block length leaves the field out; the zero fill of an
/// absent field is not a wire value.
fn required_enum<E>(
    block: &BlockReader<'_>,
    desc: &FieldDescriptor,
    from_wire: fn(u8) -> Result<E, TypeError>,
) -> Result<Option<E>, DecodeError> {
    if let FieldRead::Absent(_) = block.read(desc)? {
        return Ok(None);
    }
    optional_enum(block, desc, from_wire)
}

fn optional_enum<E>(
    block: &BlockReader<'_>,
    desc: &FieldDescriptor,
    from_wire: fn(u8) -> Result<E, TypeError>,
) -> Result<Option<E>, DecodeError> {
    match block.wire_byte(desc)? {
        Some(byte) => Ok(Some(from_wire(byte)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdp_encoder::MessageEncoder;
    use mdp_types::schema::mdp3::{channel_reset_4, security_status_30};
    use mdp_types::{FieldValue, TemplateRegistry};

    #[test]
    fn dispatch_by_template_id() {
        let mut encoder = MessageEncoder::new(&channel_reset_4::TEMPLATE, 1, 9);
        encoder.set("TransactTime", FieldValue::U64(11));
        let buf = encoder.encode().unwrap();
        let reader = MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap();

        let message = Mdp3Message::from_reader(reader).unwrap();
        assert!(matches!(message, Mdp3Message::ChannelReset(_)));
        assert_eq!(message.template_id(), 4);
        assert_eq!(message.transact_time().unwrap(), 11);
    }

    #[test]
    fn view_rejects_other_templates() {
        let mut encoder = MessageEncoder::new(&security_status_30::TEMPLATE, 1, 9);
        encoder.set("TransactTime", FieldValue::U64(1));
        let buf = encoder.encode().unwrap();
        let reader = MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap();
        assert_eq!(
            ChannelReset4::new(reader).unwrap_err(),
            DecodeError::TemplateMismatch {
                expected: 4,
                found: 30
            }
        );
        assert!(SecurityStatus30::new(reader).is_ok());
    }
}
