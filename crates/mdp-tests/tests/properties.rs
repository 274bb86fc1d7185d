//! Property tests for the field rule and header codec.
//!
//! The reader's contract is stated over all inputs: absent fields never
//! look at their bytes, reads past the buffer always fail, and arbitrary
//! input never panics. These properties drive it with generated buffers.

use mdp_decoder::{
    Absence, BlockReader, DecodeError, FieldRead, MessageReader, PacketDecoder, TextRenderer,
};
use mdp_encoder::MessageEncoder;
use mdp_types::schema::mdp3::{
    incremental_refresh_limits_banding_50 as limits,
    incremental_refresh_trade_summary_48 as trades,
};
use mdp_types::{Decimal, FieldValue, TemplateRegistry};
use mdp_wire::{MESSAGE_HEADER_SIZE, MessageHeader, WireError};
use proptest::prelude::*;

fn entry(buf: &[u8], block_length: usize, version: u16) -> BlockReader<'_> {
    BlockReader::new(buf, 0, block_length, version, "NoMDEntries", &limits::ENTRY_FIELDS)
}

proptest! {
    #[test]
    fn header_round_trips(
        block_length in any::<u16>(),
        template_id in any::<u16>(),
        schema_id in any::<u16>(),
        version in any::<u16>(),
    ) {
        let header = MessageHeader { block_length, template_id, schema_id, version };
        let mut buf = [0u8; 8];
        header.write_to(&mut buf).unwrap();
        prop_assert_eq!(MessageHeader::read_at(&buf, 0).unwrap(), header);
        prop_assert_eq!(MessageHeader::size(), MESSAGE_HEADER_SIZE);
        prop_assert_eq!(MESSAGE_HEADER_SIZE, 8);
    }

    #[test]
    fn field_newer_than_producer_ignores_its_bytes(
        bytes in any::<[u8; 32]>(),
        version in 0u16..10,
    ) {
        let block = BlockReader::new(&bytes, 0, 32, version, "NoMDEntries", &trades::ENTRY_FIELDS);
        prop_assert_eq!(
            block.read(&trades::MD_TRADE_ENTRY_ID).unwrap(),
            FieldRead::Absent(Absence::NotInVersion)
        );
        prop_assert_eq!(block.get(&trades::MD_TRADE_ENTRY_ID).unwrap(), None);
    }

    #[test]
    fn field_past_acting_block_ignores_present_bytes(
        bytes in any::<[u8; 32]>(),
        block_length in 0usize..32,
    ) {
        // RptSeq occupies 28..32: every block length below 32 leaves it
        // out, even though the buffer physically holds those bytes.
        let block = entry(&bytes, block_length, 9);
        prop_assert_eq!(
            block.read(&limits::RPT_SEQ).unwrap(),
            FieldRead::Absent(Absence::BeyondBlock)
        );
        prop_assert_eq!(block.get(&limits::RPT_SEQ).unwrap(), Some(FieldValue::U32(0)));
    }

    #[test]
    fn read_past_buffer_is_a_bounds_error(len in 0usize..32) {
        let bytes = vec![0x5A; len];
        let block = entry(&bytes, 32, 9);
        prop_assert!(matches!(
            block.read(&limits::RPT_SEQ),
            Err(DecodeError::Wire(WireError::OutOfBounds { .. }))
        ), "expected OutOfBounds error");
    }

    #[test]
    fn reads_are_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        if let Ok(reader) = MessageReader::wrap(&bytes, &TemplateRegistry::mdp3()) {
            prop_assert_eq!(TextRenderer::render(&reader), TextRenderer::render(&reader));
        }
    }

    #[test]
    fn arbitrary_packets_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(packet) = PacketDecoder::mdp3().decode_packet(&bytes) {
            for message in &packet.messages {
                let _ = TextRenderer::render(&message.reader);
            }
        }
    }

    #[test]
    fn encoded_entries_read_back(
        security_id in any::<i32>(),
        rpt_seq in any::<u32>(),
        mantissa in any::<i64>().prop_filter("null sentinel", |m| *m != i64::MAX),
    ) {
        let mut encoder = MessageEncoder::new(&limits::TEMPLATE, 1, 13);
        encoder.entry("NoMDEntries", |e| {
            e.set("LowLimitPrice", FieldValue::Decimal(Decimal::new(mantissa, -9)))
                .set("SecurityID", FieldValue::I32(security_id))
                .set("RptSeq", FieldValue::U32(rpt_seq));
        });
        let bytes = encoder.encode().unwrap();
        let reader = MessageReader::wrap(&bytes, &TemplateRegistry::mdp3()).unwrap();
        let group = reader.group("NoMDEntries").unwrap();
        let entry = group.entry(0).unwrap();

        prop_assert_eq!(entry.required::<i32>(&limits::SECURITY_ID).unwrap(), security_id);
        prop_assert_eq!(entry.required::<u32>(&limits::RPT_SEQ).unwrap(), rpt_seq);
        prop_assert_eq!(
            entry.value::<Decimal>(&limits::LOW_LIMIT_PRICE).unwrap(),
            Some(Decimal::new(mantissa, -9))
        );
    }
}
