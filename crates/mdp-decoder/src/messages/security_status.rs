use mdp_types::schema::mdp3::security_status_30 as schema;
use mdp_types::{HaltReason, MatchEventIndicator, SecurityTradingEvent, SecurityTradingStatus};

use super::{match_event_indicator, optional_enum, required_enum};
use crate::error::DecodeError;
use crate::message::MessageReader;

/// `SecurityStatus30`: trading state change for an instrument, or for a
/// whole security group / asset when `SecurityID` is null.
#[derive(Clone, Copy, Debug)]
pub struct SecurityStatus30<'a>(pub(super) MessageReader<'a>);

checked_view!(SecurityStatus30, schema::ID);

impl<'a> SecurityStatus30<'a> {
    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn transact_time(&self) -> Result<u64, DecodeError> {
        self.0.required(&schema::TRANSACT_TIME)
    }

    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn security_group(&self) -> Result<Option<&'a str>, DecodeError> {
        self.0.root().text(&schema::SECURITY_GROUP)
    }

    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn asset(&self) -> Result<Option<&'a str>, DecodeError> {
        self.0.root().text(&schema::ASSET)
    }

    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn security_id(&self) -> Result<Option<i32>, DecodeError> {
        self.0.root().value(&schema::SECURITY_ID)
    }

    /// Trade date as days since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn trade_date(&self) -> Result<Option<u16>, DecodeError> {
        self.0.root().value(&schema::TRADE_DATE)
    }

    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn match_event_indicator(&self) -> Result<MatchEventIndicator, DecodeError> {
        match_event_indicator(self.0.root(), &schema::MATCH_EVENT_INDICATOR)
    }

    /// # Errors
    ///
    /// [`DecodeError::Type`] for a status byte outside the enum.
    pub fn security_trading_status(&self) -> Result<Option<SecurityTradingStatus>, DecodeError> {
        optional_enum(
            self.0.root(),
            &schema::SECURITY_TRADING_STATUS,
            SecurityTradingStatus::from_wire_byte,
        )
    }

    /// `None`, like [`security_trading_event`](Self::security_trading_event),
    /// when an older producer's root block ends before the field.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Type`] for a byte outside the enum.
    pub fn halt_reason(&self) -> Result<Option<HaltReason>, DecodeError> {
        required_enum(self.0.root(), &schema::HALT_REASON, HaltReason::from_wire_byte)
    }

    /// # Errors
    ///
    /// [`DecodeError::Type`] for a byte outside the enum.
    pub fn security_trading_event(&self) -> Result<Option<SecurityTradingEvent>, DecodeError> {
        required_enum(
            self.0.root(),
            &schema::SECURITY_TRADING_EVENT,
            SecurityTradingEvent::from_wire_byte,
        )
    }
}
