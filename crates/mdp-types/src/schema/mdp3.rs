//! CME MDP 3.0 market data schema (subset).
//!
//! ```text
//! ┌─────┬──────────────────────────────────────┬───────┬──────────────────────────────┐
//! │ Id  │ Template                             │ Block │ Groups                       │
//! ├─────┼──────────────────────────────────────┼───────┼──────────────────────────────┤
//! │ 4   │ ChannelReset4                        │ 9     │ NoMDEntries                  │
//! │ 30  │ SecurityStatus30                     │ 30    │ (none)                       │
//! │ 46  │ MDIncrementalRefreshBook46           │ 11    │ NoMDEntries, NoOrderIDEntries│
//! │ 48  │ MDIncrementalRefreshTradeSummary48   │ 11    │ NoMDEntries, NoOrderIDEntries│
//! │ 50  │ MDIncrementalRefreshLimitsBanding50  │ 11    │ NoMDEntries                  │
//! └─────┴──────────────────────────────────────┴───────┴──────────────────────────────┘
//! ```
//!
//! Offsets are relative to the start of the root block or group entry.
//! Prices are `PRICE9`/`PRICENULL9`: an i64 mantissa with exponent -9.

use mdp_wire::GroupDimension;

use crate::codec::{FieldKind, FieldValue, null};
use crate::descriptor::{FieldDescriptor, GroupDescriptor, Template};

pub const SCHEMA_ID: u16 = 1;
pub const SCHEMA_VERSION: u16 = 13;

const PRICE9: FieldKind = FieldKind::Decimal64 { exponent: -9 };

/// Root-block fields shared by the incremental refresh templates.
pub const TRANSACT_TIME: FieldDescriptor = FieldDescriptor::new("TransactTime", 60, 0, FieldKind::U64);
pub const MATCH_EVENT_INDICATOR: FieldDescriptor =
    FieldDescriptor::new("MatchEventIndicator", 5799, 8, FieldKind::U8);

/// Every built-in template, in id order.
pub static TEMPLATES: &[&Template] = &[
    &channel_reset_4::TEMPLATE,
    &security_status_30::TEMPLATE,
    &incremental_refresh_book_46::TEMPLATE,
    &incremental_refresh_trade_summary_48::TEMPLATE,
    &incremental_refresh_limits_banding_50::TEMPLATE,
];

pub mod channel_reset_4 {
    use super::{FieldDescriptor, FieldKind, FieldValue, GroupDescriptor, GroupDimension, Template};

    pub use super::{MATCH_EVENT_INDICATOR, TRANSACT_TIME};

    pub const ID: u16 = 4;

    pub const MD_UPDATE_ACTION: FieldDescriptor =
        FieldDescriptor::constant("MDUpdateAction", 279, FieldValue::U8(0));
    pub const MD_ENTRY_TYPE: FieldDescriptor =
        FieldDescriptor::constant("MDEntryType", 269, FieldValue::Char(b'J'));
    pub const APPL_ID: FieldDescriptor = FieldDescriptor::new("ApplID", 1180, 0, FieldKind::I16);

    pub static FIELDS: [FieldDescriptor; 2] = [TRANSACT_TIME, MATCH_EVENT_INDICATOR];
    pub static ENTRY_FIELDS: [FieldDescriptor; 3] = [MD_UPDATE_ACTION, MD_ENTRY_TYPE, APPL_ID];

    pub static GROUPS: [GroupDescriptor; 1] = [GroupDescriptor {
        name: "NoMDEntries",
        id: 268,
        dimension: GroupDimension::GroupSize,
        block_length: 2,
        since_version: 9,
        fields: &ENTRY_FIELDS,
    }];

    pub static TEMPLATE: Template = Template {
        id: ID,
        name: "ChannelReset4",
        block_length: 9,
        since_version: 9,
        fields: &FIELDS,
        groups: &GROUPS,
    };
}

pub mod security_status_30 {
    use super::{FieldDescriptor, FieldKind, Template, null};

    pub use super::TRANSACT_TIME;

    pub const ID: u16 = 30;

    pub const SECURITY_GROUP: FieldDescriptor =
        FieldDescriptor::new("SecurityGroup", 1151, 8, FieldKind::CharArray(6));
    pub const ASSET: FieldDescriptor = FieldDescriptor::new("Asset", 6937, 14, FieldKind::CharArray(6));
    pub const SECURITY_ID: FieldDescriptor =
        FieldDescriptor::new("SecurityID", 48, 20, FieldKind::I32).nullable(null::INT32_NULL);
    pub const TRADE_DATE: FieldDescriptor =
        FieldDescriptor::new("TradeDate", 75, 24, FieldKind::U16).nullable(null::LOCAL_MKT_DATE_NULL);
    pub const MATCH_EVENT_INDICATOR: FieldDescriptor =
        FieldDescriptor::new("MatchEventIndicator", 5799, 26, FieldKind::U8);
    pub const SECURITY_TRADING_STATUS: FieldDescriptor =
        FieldDescriptor::new("SecurityTradingStatus", 326, 27, FieldKind::U8)
            .nullable(null::UINT8_NULL);
    pub const HALT_REASON: FieldDescriptor = FieldDescriptor::new("HaltReason", 327, 28, FieldKind::U8);
    pub const SECURITY_TRADING_EVENT: FieldDescriptor =
        FieldDescriptor::new("SecurityTradingEvent", 1174, 29, FieldKind::U8);

    pub static FIELDS: [FieldDescriptor; 9] = [
        TRANSACT_TIME,
        SECURITY_GROUP,
        ASSET,
        SECURITY_ID,
        TRADE_DATE,
        MATCH_EVENT_INDICATOR,
        SECURITY_TRADING_STATUS,
        HALT_REASON,
        SECURITY_TRADING_EVENT,
    ];

    pub static TEMPLATE: Template = Template {
        id: ID,
        name: "SecurityStatus30",
        block_length: 30,
        since_version: 9,
        fields: &FIELDS,
        groups: &[],
    };
}

pub mod incremental_refresh_book_46 {
    use super::{FieldDescriptor, FieldKind, GroupDescriptor, GroupDimension, PRICE9, Template, null};

    pub use super::{MATCH_EVENT_INDICATOR, TRANSACT_TIME};

    pub const ID: u16 = 46;

    pub const MD_ENTRY_PX: FieldDescriptor =
        FieldDescriptor::new("MDEntryPx", 270, 0, PRICE9).nullable(null::PRICE_NULL9);
    pub const MD_ENTRY_SIZE: FieldDescriptor =
        FieldDescriptor::new("MDEntrySize", 271, 8, FieldKind::I32).nullable(null::INT32_NULL);
    pub const SECURITY_ID: FieldDescriptor = FieldDescriptor::new("SecurityID", 48, 12, FieldKind::I32);
    pub const RPT_SEQ: FieldDescriptor = FieldDescriptor::new("RptSeq", 83, 16, FieldKind::U32);
    pub const NUMBER_OF_ORDERS: FieldDescriptor =
        FieldDescriptor::new("NumberOfOrders", 346, 20, FieldKind::I32).nullable(null::INT32_NULL);
    pub const MD_PRICE_LEVEL: FieldDescriptor =
        FieldDescriptor::new("MDPriceLevel", 1023, 24, FieldKind::U8);
    pub const MD_UPDATE_ACTION: FieldDescriptor =
        FieldDescriptor::new("MDUpdateAction", 279, 25, FieldKind::U8);
    pub const MD_ENTRY_TYPE: FieldDescriptor =
        FieldDescriptor::new("MDEntryType", 269, 26, FieldKind::Char);

    pub const ORDER_ID: FieldDescriptor = FieldDescriptor::new("OrderID", 37, 0, FieldKind::U64);
    pub const MD_ORDER_PRIORITY: FieldDescriptor =
        FieldDescriptor::new("MDOrderPriority", 37707, 8, FieldKind::U64).nullable(null::UINT64_NULL);
    pub const MD_DISPLAY_QTY: FieldDescriptor =
        FieldDescriptor::new("MDDisplayQty", 37706, 16, FieldKind::I32).nullable(null::INT32_NULL);
    pub const REFERENCE_ID: FieldDescriptor =
        FieldDescriptor::new("ReferenceID", 9633, 20, FieldKind::U8).nullable(null::UINT8_NULL);
    pub const ORDER_UPDATE_ACTION: FieldDescriptor =
        FieldDescriptor::new("OrderUpdateAction", 37708, 21, FieldKind::U8);

    pub static FIELDS: [FieldDescriptor; 2] = [TRANSACT_TIME, MATCH_EVENT_INDICATOR];

    pub static ENTRY_FIELDS: [FieldDescriptor; 8] = [
        MD_ENTRY_PX,
        MD_ENTRY_SIZE,
        SECURITY_ID,
        RPT_SEQ,
        NUMBER_OF_ORDERS,
        MD_PRICE_LEVEL,
        MD_UPDATE_ACTION,
        MD_ENTRY_TYPE,
    ];

    pub static ORDER_FIELDS: [FieldDescriptor; 5] = [
        ORDER_ID,
        MD_ORDER_PRIORITY,
        MD_DISPLAY_QTY,
        REFERENCE_ID,
        ORDER_UPDATE_ACTION,
    ];

    pub static GROUPS: [GroupDescriptor; 2] = [
        GroupDescriptor {
            name: "NoMDEntries",
            id: 268,
            dimension: GroupDimension::GroupSize,
            block_length: 32,
            since_version: 9,
            fields: &ENTRY_FIELDS,
        },
        GroupDescriptor {
            name: "NoOrderIDEntries",
            id: 37705,
            dimension: GroupDimension::GroupSize8Byte,
            block_length: 24,
            since_version: 9,
            fields: &ORDER_FIELDS,
        },
    ];

    pub static TEMPLATE: Template = Template {
        id: ID,
        name: "MDIncrementalRefreshBook46",
        block_length: 11,
        since_version: 9,
        fields: &FIELDS,
        groups: &GROUPS,
    };
}

pub mod incremental_refresh_trade_summary_48 {
    use super::{
        FieldDescriptor, FieldKind, FieldValue, GroupDescriptor, GroupDimension, PRICE9, Template,
        null,
    };

    pub use super::{MATCH_EVENT_INDICATOR, TRANSACT_TIME};

    pub const ID: u16 = 48;

    pub const MD_ENTRY_PX: FieldDescriptor = FieldDescriptor::new("MDEntryPx", 270, 0, PRICE9);
    pub const MD_ENTRY_SIZE: FieldDescriptor =
        FieldDescriptor::new("MDEntrySize", 271, 8, FieldKind::I32);
    pub const SECURITY_ID: FieldDescriptor = FieldDescriptor::new("SecurityID", 48, 12, FieldKind::I32);
    pub const RPT_SEQ: FieldDescriptor = FieldDescriptor::new("RptSeq", 83, 16, FieldKind::U32);
    pub const NUMBER_OF_ORDERS: FieldDescriptor =
        FieldDescriptor::new("NumberOfOrders", 346, 20, FieldKind::I32);
    pub const AGGRESSOR_SIDE: FieldDescriptor =
        FieldDescriptor::new("AggressorSide", 5797, 24, FieldKind::U8).nullable(null::UINT8_NULL);
    pub const MD_UPDATE_ACTION: FieldDescriptor =
        FieldDescriptor::new("MDUpdateAction", 279, 25, FieldKind::U8);
    pub const MD_TRADE_ENTRY_ID: FieldDescriptor =
        FieldDescriptor::new("MDTradeEntryID", 37711, 26, FieldKind::U32)
            .nullable(null::UINT32_NULL)
            .since(10);
    pub const MD_ENTRY_TYPE: FieldDescriptor =
        FieldDescriptor::constant("MDEntryType", 269, FieldValue::Char(b'2'));

    pub const ORDER_ID: FieldDescriptor = FieldDescriptor::new("OrderID", 37, 0, FieldKind::U64);
    pub const LAST_QTY: FieldDescriptor = FieldDescriptor::new("LastQty", 32, 8, FieldKind::I32);

    pub static FIELDS: [FieldDescriptor; 2] = [TRANSACT_TIME, MATCH_EVENT_INDICATOR];

    pub static ENTRY_FIELDS: [FieldDescriptor; 9] = [
        MD_ENTRY_PX,
        MD_ENTRY_SIZE,
        SECURITY_ID,
        RPT_SEQ,
        NUMBER_OF_ORDERS,
        AGGRESSOR_SIDE,
        MD_UPDATE_ACTION,
        MD_TRADE_ENTRY_ID,
        MD_ENTRY_TYPE,
    ];

    pub static ORDER_FIELDS: [FieldDescriptor; 2] = [ORDER_ID, LAST_QTY];

    pub static GROUPS: [GroupDescriptor; 2] = [
        GroupDescriptor {
            name: "NoMDEntries",
            id: 268,
            dimension: GroupDimension::GroupSize,
            block_length: 32,
            since_version: 9,
            fields: &ENTRY_FIELDS,
        },
        GroupDescriptor {
            name: "NoOrderIDEntries",
            id: 37705,
            dimension: GroupDimension::GroupSize8Byte,
            block_length: 16,
            since_version: 9,
            fields: &ORDER_FIELDS,
        },
    ];

    pub static TEMPLATE: Template = Template {
        id: ID,
        name: "MDIncrementalRefreshTradeSummary48",
        block_length: 11,
        since_version: 9,
        fields: &FIELDS,
        groups: &GROUPS,
    };
}

pub mod incremental_refresh_limits_banding_50 {
    use super::{FieldDescriptor, FieldKind, FieldValue, GroupDescriptor, GroupDimension, PRICE9, Template, null};

    pub use super::{MATCH_EVENT_INDICATOR, TRANSACT_TIME};

    pub const ID: u16 = 50;

    pub const HIGH_LIMIT_PRICE: FieldDescriptor =
        FieldDescriptor::new("HighLimitPrice", 1149, 0, PRICE9).nullable(null::PRICE_NULL9);
    pub const LOW_LIMIT_PRICE: FieldDescriptor =
        FieldDescriptor::new("LowLimitPrice", 1148, 8, PRICE9).nullable(null::PRICE_NULL9);
    pub const MAX_PRICE_VARIATION: FieldDescriptor =
        FieldDescriptor::new("MaxPriceVariation", 1143, 16, PRICE9).nullable(null::PRICE_NULL9);
    pub const SECURITY_ID: FieldDescriptor = FieldDescriptor::new("SecurityID", 48, 24, FieldKind::I32);
    pub const RPT_SEQ: FieldDescriptor = FieldDescriptor::new("RptSeq", 83, 28, FieldKind::U32);
    pub const MD_UPDATE_ACTION: FieldDescriptor =
        FieldDescriptor::constant("MDUpdateAction", 279, FieldValue::U8(0));
    pub const MD_ENTRY_TYPE: FieldDescriptor =
        FieldDescriptor::constant("MDEntryType", 269, FieldValue::Char(b'g'));

    pub static FIELDS: [FieldDescriptor; 2] = [TRANSACT_TIME, MATCH_EVENT_INDICATOR];

    pub static ENTRY_FIELDS: [FieldDescriptor; 7] = [
        HIGH_LIMIT_PRICE,
        LOW_LIMIT_PRICE,
        MAX_PRICE_VARIATION,
        SECURITY_ID,
        RPT_SEQ,
        MD_UPDATE_ACTION,
        MD_ENTRY_TYPE,
    ];

    pub static GROUPS: [GroupDescriptor; 1] = [GroupDescriptor {
        name: "NoMDEntries",
        id: 268,
        dimension: GroupDimension::GroupSize,
        block_length: 32,
        since_version: 9,
        fields: &ENTRY_FIELDS,
    }];

    pub static TEMPLATE: Template = Template {
        id: ID,
        name: "MDIncrementalRefreshLimitsBanding50",
        block_length: 11,
        since_version: 9,
        fields: &FIELDS,
        groups: &GROUPS,
    };
}
