use mdp_types::schema::mdp3::incremental_refresh_trade_summary_48 as schema;
use mdp_types::{AggressorSide, Decimal, EntryType, MatchEventIndicator, MdUpdateAction};

use super::{constant_enum, match_event_indicator, optional_enum, required_enum};
use crate::block::BlockReader;
use crate::error::DecodeError;
use crate::message::MessageReader;

/// `MDIncrementalRefreshTradeSummary48`: trades, with the orders that
/// filled against each other.
#[derive(Clone, Copy, Debug)]
pub struct IncrementalRefreshTradeSummary48<'a>(pub(super) MessageReader<'a>);

checked_view!(IncrementalRefreshTradeSummary48, schema::ID);

impl<'a> IncrementalRefreshTradeSummary48<'a> {
    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn transact_time(&self) -> Result<u64, DecodeError> {
        self.0.required(&schema::TRANSACT_TIME)
    }

    /// # Errors
    ///
    /// Bounds errors if the root block is truncated.
    pub fn match_event_indicator(&self) -> Result<MatchEventIndicator, DecodeError> {
        match_event_indicator(self.0.root(), &schema::MATCH_EVENT_INDICATOR)
    }

    /// # Errors
    ///
    /// Bounds errors if the group's dimension header is missing.
    pub fn entries(
        &self,
    ) -> Result<impl ExactSizeIterator<Item = TradeSummaryEntry<'a>> + use<'a>, DecodeError> {
        Ok(self.0.group("NoMDEntries")?.iter().map(TradeSummaryEntry))
    }

    /// # Errors
    ///
    /// Bounds errors if this or the preceding dimension header is missing.
    pub fn orders(
        &self,
    ) -> Result<impl ExactSizeIterator<Item = TradeOrderEntry<'a>> + use<'a>, DecodeError> {
        Ok(self.0.group("NoOrderIDEntries")?.iter().map(TradeOrderEntry))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TradeSummaryEntry<'a>(BlockReader<'a>);

impl<'a> TradeSummaryEntry<'a> {
    #[must_use]
    pub fn block(&self) -> &BlockReader<'a> {
        &self.0
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn price(&self) -> Result<Decimal, DecodeError> {
        self.0.required(&schema::MD_ENTRY_PX)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn size(&self) -> Result<i32, DecodeError> {
        self.0.required(&schema::MD_ENTRY_SIZE)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn security_id(&self) -> Result<i32, DecodeError> {
        self.0.required(&schema::SECURITY_ID)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn rpt_seq(&self) -> Result<u32, DecodeError> {
        self.0.required(&schema::RPT_SEQ)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn number_of_orders(&self) -> Result<i32, DecodeError> {
        self.0.required(&schema::NUMBER_OF_ORDERS)
    }

    /// `None` for implied trades, which have no aggressor.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Type`] for a byte outside the enum.
    pub fn aggressor_side(&self) -> Result<Option<AggressorSide>, DecodeError> {
        optional_enum(&self.0, &schema::AGGRESSOR_SIDE, AggressorSide::from_wire_byte)
    }

    /// `None` when the producer's entry block stops short of the field.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Type`] for a byte outside the enum.
    pub fn update_action(&self) -> Result<Option<MdUpdateAction>, DecodeError> {
        required_enum(&self.0, &schema::MD_UPDATE_ACTION, MdUpdateAction::from_wire_byte)
    }

    /// Unique trade id; `None` from producers older than version 10.
    ///
    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn trade_entry_id(&self) -> Result<Option<u32>, DecodeError> {
        self.0.value(&schema::MD_TRADE_ENTRY_ID)
    }

    /// Always [`EntryType::Trade`].
    ///
    /// # Errors
    ///
    /// Never fails for the built-in table.
    pub fn entry_type(&self) -> Result<EntryType, DecodeError> {
        constant_enum(&self.0, &schema::MD_ENTRY_TYPE, EntryType::from_wire_byte)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TradeOrderEntry<'a>(BlockReader<'a>);

impl<'a> TradeOrderEntry<'a> {
    #[must_use]
    pub fn block(&self) -> &BlockReader<'a> {
        &self.0
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn order_id(&self) -> Result<u64, DecodeError> {
        self.0.required(&schema::ORDER_ID)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn last_qty(&self) -> Result<i32, DecodeError> {
        self.0.required(&schema::LAST_QTY)
    }
}
