use crate::error::TypeError;

// ── Macro for wire-byte enum boilerplate ──────────────────────────────
//
// Every enum here is a fixed set of named variants, each mapped to one
// wire byte, plus a to/from conversion pair. Char-encoded enums pass
// byte literals (b'0') as their wire values.

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Encode this variant as its wire byte.
            #[must_use]
            pub fn to_wire_byte(self) -> u8 {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }

            /// Decode a wire byte into this enum.
            ///
            /// # Errors
            ///
            /// Returns [`TypeError::InvalidEnumValue`] if the byte does
            /// not match any known variant.
            pub fn from_wire_byte(value: u8) -> Result<Self, TypeError> {
                match value {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(TypeError::InvalidEnumValue {
                        enum_name: stringify!($name),
                        value: other,
                    }),
                }
            }
        }
    };
}

// ── MdUpdateAction ────────────────────────────────────────────────────

wire_enum! {
    /// Book update action carried on every incremental refresh entry.
    ///
    /// ```text
    /// ┌──────┬────────────┐
    /// │ Wire │ Action     │
    /// ├──────┼────────────┤
    /// │ 0    │ New        │
    /// │ 1    │ Change     │
    /// │ 2    │ Delete     │
    /// │ 3    │ DeleteThru │
    /// │ 4    │ DeleteFrom │
    /// │ 5    │ Overlay    │
    /// └──────┴────────────┘
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum MdUpdateAction {
        New = 0,
        Change = 1,
        Delete = 2,
        DeleteThru = 3,
        DeleteFrom = 4,
        Overlay = 5,
    }
}

// ── EntryType ─────────────────────────────────────────────────────────

wire_enum! {
    /// Market data entry type (`MDEntryType`, char encoded).
    ///
    /// Book entries use bid/offer and their implied variants; trade
    /// summaries, channel resets and limits banding carry the type as a
    /// schema constant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum EntryType {
        Bid = b'0',
        Offer = b'1',
        Trade = b'2',
        ImpliedBid = b'E',
        ImpliedOffer = b'F',
        BookReset = b'J',
        ThresholdLimitsAndPriceBandVariation = b'g',
    }
}

// ── AggressorSide ─────────────────────────────────────────────────────

wire_enum! {
    /// Side of the aggressing order in a trade summary.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum AggressorSide {
        NoAggressor = 0,
        Buy = 1,
        Sell = 2,
    }
}

// ── SecurityTradingStatus ─────────────────────────────────────────────

wire_enum! {
    /// Instrument or group trading state reported by `SecurityStatus30`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum SecurityTradingStatus {
        TradingHalt = 2,
        Close = 4,
        NewPriceIndication = 15,
        ReadyToTrade = 17,
        NotAvailableForTrading = 18,
        UnknownOrInvalid = 20,
        PreOpen = 21,
        PreCross = 24,
        Cross = 25,
        PostClose = 26,
        NoChange = 103,
    }
}

// ── HaltReason ────────────────────────────────────────────────────────

wire_enum! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum HaltReason {
        GroupSchedule = 0,
        SurveillanceIntervention = 1,
        MarketEvent = 2,
        InstrumentActivation = 3,
        InstrumentExpiration = 4,
        Unknown = 5,
        RecoveryInProcess = 6,
    }
}

// ── SecurityTradingEvent ──────────────────────────────────────────────

wire_enum! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum SecurityTradingEvent {
        NoEvent = 0,
        NoCancel = 1,
        ResetStatistics = 4,
        ImpliedMatchingOn = 5,
        ImpliedMatchingOff = 6,
    }
}

// ── OrderUpdateAction ─────────────────────────────────────────────────

wire_enum! {
    /// Action applied to an individual order in a book update's order group.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum OrderUpdateAction {
        New = 0,
        Update = 1,
        Delete = 2,
    }
}

// ── MatchEventIndicator ───────────────────────────────────────────────

/// `MatchEventIndicator` bitset, present in the root block of every
/// incremental refresh.
///
/// Bit layout:
///   bit 0 = last trade message in the event
///   bit 1 = last volume message
///   bit 2 = last quote message
///   bit 3 = last statistics message
///   bit 4 = last implied message
///   bit 5 = message sent during recovery
///   bit 6 = reserved
///   bit 7 = end of event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchEventIndicator(u8);

impl MatchEventIndicator {
    pub const NONE: Self = Self(0);
    pub const LAST_TRADE_MSG: Self = Self(0b0000_0001);
    pub const LAST_VOLUME_MSG: Self = Self(0b0000_0010);
    pub const LAST_QUOTE_MSG: Self = Self(0b0000_0100);
    pub const LAST_STATS_MSG: Self = Self(0b0000_1000);
    pub const LAST_IMPLIED_MSG: Self = Self(0b0001_0000);
    pub const RECOVERY_MSG: Self = Self(0b0010_0000);
    pub const END_OF_EVENT: Self = Self(0b1000_0000);

    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn is_end_of_event(self) -> bool {
        self.contains(Self::END_OF_EVENT)
    }

    #[must_use]
    pub fn is_recovery(self) -> bool {
        self.contains(Self::RECOVERY_MSG)
    }
}
