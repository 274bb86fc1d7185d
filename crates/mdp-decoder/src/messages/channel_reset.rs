use mdp_types::schema::mdp3::channel_reset_4 as schema;
use mdp_types::{EntryType, MatchEventIndicator, MdUpdateAction};

use super::{constant_enum, match_event_indicator};
use crate::block::BlockReader;
use crate::error::DecodeError;
use crate::message::MessageReader;

/// `ChannelReset4`: every book on the listed channels must be cleared.
#[derive(Clone, Copy, Debug)]
pub struct ChannelReset4<'a>(pub(super) MessageReader<'a>);

checked_view!(ChannelReset4, schema::ID);

impl<'a> ChannelReset4<'a> {
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
    ) -> Result<impl ExactSizeIterator<Item = ChannelResetEntry<'a>> + use<'a>, DecodeError> {
        Ok(self.0.group("NoMDEntries")?.iter().map(ChannelResetEntry))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ChannelResetEntry<'a>(BlockReader<'a>);

impl<'a> ChannelResetEntry<'a> {
    #[must_use]
    pub fn block(&self) -> &BlockReader<'a> {
        &self.0
    }

    /// Channel (application) being reset.
    ///
    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn appl_id(&self) -> Result<i16, DecodeError> {
        self.0.required(&schema::APPL_ID)
    }

    /// # Errors
    ///
    /// Never fails for the built-in table.
    pub fn update_action(&self) -> Result<MdUpdateAction, DecodeError> {
        constant_enum(&self.0, &schema::MD_UPDATE_ACTION, MdUpdateAction::from_wire_byte)
    }

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
    fn reads_reset_channels() {
        let mut encoder = MessageEncoder::new(&schema::TEMPLATE, 1, 9);
        encoder
            .set("TransactTime", FieldValue::U64(100))
            .set("MatchEventIndicator", FieldValue::U8(0x80));
        for appl_id in [310i16, 312] {
            encoder.entry("NoMDEntries", |e| {
                e.set("ApplID", FieldValue::I16(appl_id));
            });
        }
        let buf = encoder.encode().unwrap();

        let reader = MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap();
        let reset = ChannelReset4::new(reader).unwrap();
        assert!(reset.match_event_indicator().unwrap().is_end_of_event());

        let ids: Vec<i16> = reset
            .entries()
            .unwrap()
            .map(|e| e.appl_id().unwrap())
            .collect();
        assert_eq!(ids, vec![310, 312]);

        let first = reset.entries().unwrap().next().unwrap();
        assert_eq!(first.entry_type().unwrap(), EntryType::BookReset);
        assert_eq!(first.update_action().unwrap(), MdUpdateAction::New);
    }
}
