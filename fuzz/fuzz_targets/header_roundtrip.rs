#![no_main]

use libfuzzer_sys::fuzz_target;
use mdp_wire::{MessageHeader, PacketHeader, MESSAGE_HEADER_SIZE, PACKET_HEADER_SIZE};

// Fuzz target: MessageHeader and PacketHeader write->read roundtrip.
//
// Builds both headers from the fuzz input, serializes them, parses them
// back, and asserts every field matches.
fuzz_target!(|data: &[u8]| {
    let Some(words) = data.get(..20) else {
        return;
    };
    let u16_at = |i: usize| u16::from_le_bytes([words[i], words[i + 1]]);

    let header = MessageHeader {
        block_length: u16_at(0),
        template_id: u16_at(2),
        schema_id: u16_at(4),
        version: u16_at(6),
    };
    let mut buf = [0u8; MESSAGE_HEADER_SIZE];
    header.write_to(&mut buf).unwrap();
    assert_eq!(MessageHeader::read_at(&buf, 0).unwrap(), header);

    let packet = PacketHeader {
        msg_seq_num: u32::from_le_bytes(words[8..12].try_into().unwrap()),
        sending_time: u64::from_le_bytes(words[12..20].try_into().unwrap()),
    };
    let mut buf = [0u8; PACKET_HEADER_SIZE];
    packet.write_to(&mut buf).unwrap();
    assert_eq!(PacketHeader::read_from(&buf).unwrap(), packet);
});
