//! Shared fixtures for the MDP integration tests and benches.
//!
//! | Fixture                      | Source                                          |
//! |------------------------------|-------------------------------------------------|
//! | `limits_banding_50.hex`      | Captured MDP 3.0 packet (one template 50 message) |
//! | [`limits_banding_encoder`]   | The same message rebuilt with the encoder       |
//! | [`book_encoder`]             | Book refresh with one level and one order       |
//! | [`trade_summary_encoder`]    | Trade summary with two order entries            |

#![allow(clippy::pedantic)]

use std::path::Path;

use mdp_decoder::{DecodeError, MessageReader};
use mdp_encoder::{MessageEncoder, PacketEncoder};
use mdp_types::schema::mdp3::{
    incremental_refresh_book_46 as book, incremental_refresh_limits_banding_50 as limits,
    incremental_refresh_trade_summary_48 as trades,
};
use mdp_types::{Decimal, FieldValue};

pub const CAPTURED_MSG_SEQ_NUM: u32 = 703_398;
pub const CAPTURED_SENDING_TIME: u64 = 1_633_099_253_939_247_451;
pub const CAPTURED_TRANSACT_TIME: u64 = 1_633_099_253_937_623_627;

/// Offset of the SBE message header inside the captured packet
/// (12-byte packet header plus the 2-byte MsgSize).
pub const CAPTURED_MESSAGE_OFFSET: usize = 14;

/// Read a golden fixture written as whitespace-separated hex.
pub fn golden(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()));
    let digits: String = text.split_whitespace().collect();
    hex::decode(digits)
        .unwrap_or_else(|e| panic!("golden fixture {} is not hex: {e}", path.display()))
}

/// The captured 68-byte packet.
pub fn captured_packet() -> Vec<u8> {
    golden("limits_banding_50.hex")
}

/// The SBE message inside the captured packet, without framing.
pub fn captured_message() -> Vec<u8> {
    captured_packet()[CAPTURED_MESSAGE_OFFSET..].to_vec()
}

/// Price in whole units as a PRICE9 decimal.
pub fn price9(whole: i64) -> FieldValue<'static> {
    FieldValue::Decimal(Decimal::new(whole * 1_000_000_000, -9))
}

/// The captured limits banding message, rebuilt field by field.
pub fn limits_banding_encoder() -> MessageEncoder {
    let mut encoder = MessageEncoder::new(&limits::TEMPLATE, 1, 9);
    encoder
        .set("TransactTime", FieldValue::U64(CAPTURED_TRANSACT_TIME))
        .set("MatchEventIndicator", FieldValue::U8(0));
    encoder.entry("NoMDEntries", |e| {
        e.set_null("HighLimitPrice")
            .set("LowLimitPrice", price9(9000))
            .set("MaxPriceVariation", price9(10))
            .set("SecurityID", FieldValue::I32(5620))
            .set("RptSeq", FieldValue::U32(1869));
    });
    encoder
}

/// The captured packet, rebuilt with the encoders.
pub fn encoded_captured_packet() -> Vec<u8> {
    let message = limits_banding_encoder()
        .encode()
        .expect("limits banding message encodes");
    let mut packet = PacketEncoder::new(CAPTURED_MSG_SEQ_NUM, CAPTURED_SENDING_TIME);
    packet.push(message);
    packet.encode().expect("packet encodes")
}

/// A book refresh: one bid level at 4512.25 and one order.
pub fn book_encoder(version: u16) -> MessageEncoder {
    let mut encoder = MessageEncoder::new(&book::TEMPLATE, 1, version);
    encoder
        .set("TransactTime", FieldValue::U64(CAPTURED_TRANSACT_TIME))
        .set("MatchEventIndicator", FieldValue::U8(0b1000_0100));
    encoder.entry("NoMDEntries", |e| {
        e.set(
            "MDEntryPx",
            FieldValue::Decimal(Decimal::new(4_512_250_000_000, -9)),
        )
        .set("MDEntrySize", FieldValue::I32(15))
        .set("SecurityID", FieldValue::I32(5620))
        .set("RptSeq", FieldValue::U32(1870))
        .set("MDPriceLevel", FieldValue::U8(1))
        .set("MDUpdateAction", FieldValue::U8(1))
        .set("MDEntryType", FieldValue::Char(b'0'));
    });
    encoder.entry("NoOrderIDEntries", |e| {
        e.set("OrderID", FieldValue::U64(843))
            .set("MDDisplayQty", FieldValue::I32(5))
            .set("ReferenceID", FieldValue::U8(1))
            .set("OrderUpdateAction", FieldValue::U8(0));
    });
    encoder
}

/// A trade summary: one trade at 4512.5 filled against two orders.
///
/// `MDTradeEntryID` is only set when `version` carries it.
pub fn trade_summary_encoder(version: u16) -> MessageEncoder {
    let mut encoder = MessageEncoder::new(&trades::TEMPLATE, 1, version);
    encoder
        .set("TransactTime", FieldValue::U64(CAPTURED_TRANSACT_TIME))
        .set("MatchEventIndicator", FieldValue::U8(0b1000_0001));
    encoder.entry("NoMDEntries", |e| {
        e.set(
            "MDEntryPx",
            FieldValue::Decimal(Decimal::new(4_512_500_000_000, -9)),
        )
        .set("MDEntrySize", FieldValue::I32(3))
        .set("SecurityID", FieldValue::I32(5620))
        .set("RptSeq", FieldValue::U32(1871))
        .set("NumberOfOrders", FieldValue::I32(2))
        .set("AggressorSide", FieldValue::U8(1))
        .set("MDUpdateAction", FieldValue::U8(0));
        if version >= trades::MD_TRADE_ENTRY_ID.since_version {
            e.set("MDTradeEntryID", FieldValue::U32(77));
        }
    });
    for (order_id, qty) in [(843, 2), (844, 1)] {
        encoder.entry("NoOrderIDEntries", |e| {
            e.set("OrderID", FieldValue::U64(order_id))
                .set("LastQty", FieldValue::I32(qty));
        });
    }
    encoder
}

/// Read every field of the root block and of every group entry.
///
/// Returns the number of group entries visited.
pub fn read_everything(reader: &MessageReader<'_>) -> Result<usize, DecodeError> {
    for desc in reader.template().fields {
        reader.read(desc)?;
    }
    let mut entries = 0;
    for group in reader.groups() {
        for entry in group? {
            for desc in entry.fields() {
                entry.read(desc)?;
            }
            entries += 1;
        }
    }
    Ok(entries)
}
