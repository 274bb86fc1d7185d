use mdp_types::schema::mdp3::incremental_refresh_book_46 as schema;
use mdp_types::{Decimal, EntryType, MatchEventIndicator, MdUpdateAction, OrderUpdateAction};

use super::{match_event_indicator, required_enum};
use crate::block::BlockReader;
use crate::error::DecodeError;
use crate::message::MessageReader;

/// `MDIncrementalRefreshBook46`: price-level book updates, optionally
/// followed by the individual orders behind them.
#[derive(Clone, Copy, Debug)]
pub struct IncrementalRefreshBook46<'a>(pub(super) MessageReader<'a>);

checked_view!(IncrementalRefreshBook46, schema::ID);

impl<'a> IncrementalRefreshBook46<'a> {
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
    ) -> Result<impl ExactSizeIterator<Item = BookEntry<'a>> + use<'a>, DecodeError> {
        Ok(self.0.group("NoMDEntries")?.iter().map(BookEntry))
    }

    /// The `NoOrderIDEntries` group.
    ///
    /// # Errors
    ///
    /// Bounds errors if this or the preceding dimension header is missing.
    pub fn orders(
        &self,
    ) -> Result<impl ExactSizeIterator<Item = BookOrderEntry<'a>> + use<'a>, DecodeError> {
        Ok(self.0.group("NoOrderIDEntries")?.iter().map(BookOrderEntry))
    }
}

/// One price-level update.
#[derive(Clone, Copy, Debug)]
pub struct BookEntry<'a>(BlockReader<'a>);

impl<'a> BookEntry<'a> {
    #[must_use]
    pub fn block(&self) -> &BlockReader<'a> {
        &self.0
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn price(&self) -> Result<Option<Decimal>, DecodeError> {
        self.0.value(&schema::MD_ENTRY_PX)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn size(&self) -> Result<Option<i32>, DecodeError> {
        self.0.value(&schema::MD_ENTRY_SIZE)
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
    pub fn number_of_orders(&self) -> Result<Option<i32>, DecodeError> {
        self.0.value(&schema::NUMBER_OF_ORDERS)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn price_level(&self) -> Result<u8, DecodeError> {
        self.0.required(&schema::MD_PRICE_LEVEL)
    }

    /// The enum accessors return `None` when the producer's entry block
    /// stops short of the field.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Type`] for a byte outside the enum.
    pub fn update_action(&self) -> Result<Option<MdUpdateAction>, DecodeError> {
        required_enum(&self.0, &schema::MD_UPDATE_ACTION, MdUpdateAction::from_wire_byte)
    }

    /// # Errors
    ///
    /// [`DecodeError::Type`] for a byte outside the enum.
    pub fn entry_type(&self) -> Result<Option<EntryType>, DecodeError> {
        required_enum(&self.0, &schema::MD_ENTRY_TYPE, EntryType::from_wire_byte)
    }
}

/// One order behind a price-level update.
#[derive(Clone, Copy, Debug)]
pub struct BookOrderEntry<'a>(BlockReader<'a>);

impl<'a> BookOrderEntry<'a> {
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
    pub fn order_priority(&self) -> Result<Option<u64>, DecodeError> {
        self.0.value(&schema::MD_ORDER_PRIORITY)
    }

    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn display_qty(&self) -> Result<Option<i32>, DecodeError> {
        self.0.value(&schema::MD_DISPLAY_QTY)
    }

    /// Index of the `NoMDEntries` entry this order belongs to.
    ///
    /// # Errors
    ///
    /// Bounds errors if the entry is truncated.
    pub fn reference_id(&self) -> Result<Option<u8>, DecodeError> {
        self.0.value(&schema::REFERENCE_ID)
    }

    /// # Errors
    ///
    /// [`DecodeError::Type`] for a byte outside the enum.
    pub fn update_action(&self) -> Result<Option<OrderUpdateAction>, DecodeError> {
        required_enum(
            &self.0,
            &schema::ORDER_UPDATE_ACTION,
            OrderUpdateAction::from_wire_byte,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdp_encoder::MessageEncoder;
    use mdp_types::{FieldValue, TemplateRegistry};

    #[test]
    fn levels_and_orders() {
        let mut encoder = MessageEncoder::new(&schema::TEMPLATE, 1, 9);
        encoder.set("TransactTime", FieldValue::U64(3));
        encoder.entry("NoMDEntries", |e| {
            e.set(
                "MDEntryPx",
                FieldValue::Decimal(Decimal::new(4_512_250_000_000, -9)),
            )
            .set("MDEntrySize", FieldValue::I32(12))
            .set("SecurityID", FieldValue::I32(5620))
            .set("RptSeq", FieldValue::U32(9))
            .set("NumberOfOrders", FieldValue::I32(3))
            .set("MDPriceLevel", FieldValue::U8(1))
            .set("MDUpdateAction", FieldValue::U8(1))
            .set("MDEntryType", FieldValue::Char(b'0'));
        });
        encoder.entry("NoOrderIDEntries", |e| {
            e.set("OrderID", FieldValue::U64(777))
                .set("ReferenceID", FieldValue::U8(1))
                .set("OrderUpdateAction", FieldValue::U8(2));
        });
        let buf = encoder.encode().unwrap();

        let reader = MessageReader::wrap(&buf, &TemplateRegistry::mdp3()).unwrap();
        let book = IncrementalRefreshBook46::new(reader).unwrap();

        let level = book.entries().unwrap().next().unwrap();
        assert_eq!(level.price().unwrap().unwrap().to_string(), "4512.25");
        assert_eq!(level.size().unwrap(), Some(12));
        assert_eq!(level.number_of_orders().unwrap(), Some(3));
        assert_eq!(level.price_level().unwrap(), 1);
        assert_eq!(level.update_action().unwrap(), Some(MdUpdateAction::Change));
        assert_eq!(level.entry_type().unwrap(), Some(EntryType::Bid));

        let orders: Vec<_> = book.orders().unwrap().collect();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id().unwrap(), 777);
        assert_eq!(orders[0].order_priority().unwrap(), None);
        assert_eq!(orders[0].display_qty().unwrap(), None);
        assert_eq!(orders[0].reference_id().unwrap(), Some(1));
        assert_eq!(
            orders[0].update_action().unwrap(),
            Some(OrderUpdateAction::Delete)
        );
    }
}
