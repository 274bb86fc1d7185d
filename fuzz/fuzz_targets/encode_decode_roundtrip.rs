#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mdp_decoder::MessageReader;
use mdp_encoder::{MessageEncoder, PacketEncoder};
use mdp_types::schema::mdp3::incremental_refresh_limits_banding_50 as limits;
use mdp_types::{Decimal, FieldValue, TemplateRegistry};

#[derive(Debug, Arbitrary)]
struct FuzzEntry {
    low_limit: Option<i64>,
    security_id: i32,
    rpt_seq: u32,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    transact_time: u64,
    /// Extra bytes a newer producer appends to the root block.
    root_extension: u8,
    /// Extra bytes a newer producer appends to each entry.
    entry_extension: u8,
    entries: Vec<FuzzEntry>,
}

// Fuzz target: limits banding messages built with the encoder, using
// arbitrary values and newer-producer block lengths, must decode back to
// the same values.
fuzz_target!(|input: FuzzInput| {
    if input.entries.len() > 255 {
        return;
    }

    let mut encoder = MessageEncoder::new(&limits::TEMPLATE, 1, 13);
    encoder
        .with_block_length(limits::TEMPLATE.block_length + u16::from(input.root_extension))
        .with_group_block_length("NoMDEntries", 32 + u16::from(input.entry_extension))
        .set("TransactTime", FieldValue::U64(input.transact_time));
    for entry in &input.entries {
        encoder.entry("NoMDEntries", |e| {
            match entry.low_limit.filter(|&m| m != i64::MAX) {
                Some(m) => e.set("LowLimitPrice", FieldValue::Decimal(Decimal::new(m, -9))),
                None => e.set_null("LowLimitPrice"),
            };
            e.set("SecurityID", FieldValue::I32(entry.security_id))
                .set("RptSeq", FieldValue::U32(entry.rpt_seq));
        });
    }
    let message = encoder.encode().unwrap();

    let mut packet = PacketEncoder::new(0, 0);
    packet.push(message.clone());
    let Ok(framed) = packet.encode() else {
        // Messages above u16::MAX cannot be framed.
        return;
    };
    assert_eq!(&framed[14..], &message[..]);

    let reader = MessageReader::wrap(&message, &TemplateRegistry::mdp3()).unwrap();
    assert_eq!(
        reader.field("TransactTime").unwrap(),
        Some(FieldValue::U64(input.transact_time))
    );
    let group = reader.group("NoMDEntries").unwrap();
    assert_eq!(group.len(), input.entries.len());
    for (decoded, expected) in group.iter().zip(&input.entries) {
        assert_eq!(
            decoded.required::<i32>(&limits::SECURITY_ID).unwrap(),
            expected.security_id
        );
        assert_eq!(
            decoded.required::<u32>(&limits::RPT_SEQ).unwrap(),
            expected.rpt_seq
        );
        let low = decoded.value::<Decimal>(&limits::LOW_LIMIT_PRICE).unwrap();
        assert_eq!(
            low.map(|d| d.mantissa),
            expected.low_limit.filter(|&m| m != i64::MAX)
        );
    }
    assert_eq!(reader.encoded_length().unwrap() + 8, message.len());
});
