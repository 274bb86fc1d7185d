use mdp_types::schema::mdp3::incremental_refresh_limits_banding_50 as schema;
use mdp_types::{Decimal, EntryType, MatchEventIndicator, MdUpdateAction};

use super::{constant_enum, match_event_indicator};
use crate::block::BlockReader;
use crate::error::DecodeError;
use crate::message::MessageReader;

/// `MDIncrementalRefreshLimitsBanding50`: price limits and banding for
/// one or more instruments.
#[derive(Clone, Copy, Debug)]
pub struct IncrementalRefreshLimitsBanding50<'a>(pub(super) MessageReader<'a>);

checked_view!(IncrementalRefreshLimitsBanding50, schema::ID);

impl<'a> IncrementalRefreshLimitsBanding50<'a> {
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

    /// The `NoMDEntries` group.
    ///
    /// # Errors
    ///
    /// Bounds errors if the group's dimension header is missing.
    pub fn entries(
        &self,
    ) -> Result<impl ExactSizeIterator<Item = LimitsBandingEntry<'a>> + use<'a>, DecodeError> {
        Ok(self.0.group("NoMDEntries")?.iter().map(LimitsBandingEntry))
    }
}

/// One `NoMDEntries` entry of a limits banding message.
#[derive(Clone, Copy, Debug)]
pub struct LimitsBandingEntry<'a>(BlockReader<'a>);

impl<'a> LimitsBandingEntry<'a> {
    #[must_use]
    pub fn block(&self) -> &BlockReader<'a> {
        &self.0
    }

    /// Upper price limit, `None` when the instrument has none.
    ///
    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn high_limit_price(&self) -> Result<Option<Decimal>, DecodeError> {
        self.0.value(&schema::HIGH_LIMIT_PRICE)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn low_limit_price(&self) -> Result<Option<Decimal>, DecodeError> {
        self.0.value(&schema::LOW_LIMIT_PRICE)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn max_price_variation(&self) -> Result<Option<Decimal>, DecodeError> {
        self.0.value(&schema::MAX_PRICE_VARIATION)
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

    /// Always [`MdUpdateAction::New`]; the schema fixes it.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in table.
    pub fn update_action(&self) -> Result<MdUpdateAction, DecodeError> {
        constant_enum(&self.0, &schema::MD_UPDATE_ACTION, MdUpdateAction::from_wire_byte)
    }

    /// Always [`EntryType::ThresholdLimitsAndPriceBandVariation`].
    ///
    /// # Errors
    ///
    /// Never fails for the built-in table.
    pub fn entry_type(&self) -> Result<EntryType, DecodeError> {
        constant_enum(&self.0, &schema::MD_ENTRY_TYPE, EntryType::from_wire_byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdp_encoder::MessageEncoder;
    use mdp_types::{FieldValue, TemplateRegistry};

    #[test]
    fn typed_entry_accessors() {
        let mut encoder = MessageEncoder::new(&schema::TEMPLATE, 1, 9);
        encoder.set("TransactTime", FieldValue::U64(5));
        encoder.entry("NoMDEntries", |e| {
            e.set_null("HighLimitPrice")
                .set(
                    "LowLimitPrice",
                    FieldValue::Decimal(Decimal::new(9_000_000_000_000, -9)),
                )
                .set("SecurityID", FieldValue::I32(5620))
                .set("RptSeq", FieldValue::U32(1869));
        });
        let buf = encoder.encode().unwrap();

        let reader = MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap();
        let message = IncrementalRefreshLimitsBanding50::new(reader).unwrap();
        assert_eq!(message.transact_time().unwrap(), 5);

        let entries: Vec<_> = message.entries().unwrap().collect();
        assert_eq!(entries.len(), 1);
        let entry = entries[0];
        assert_eq!(entry.high_limit_price().unwrap(), None);
        assert_eq!(entry.low_limit_price().unwrap().unwrap().to_string(), "9000");
        // Unset optional fields are written as null by the encoder.
        assert_eq!(entry.max_price_variation().unwrap(), None);
        assert_eq!(entry.security_id().unwrap(), 5620);
        assert_eq!(entry.rpt_seq().unwrap(), 1869);
        assert_eq!(entry.update_action().unwrap(), MdUpdateAction::New);
        assert_eq!(
            entry.entry_type().unwrap(),
            EntryType::ThresholdLimitsAndPriceBandVariation
        );
    }
}
