#![no_main]

use libfuzzer_sys::fuzz_target;
use mdp_wire::{ByteView, MessageHeader, MESSAGE_HEADER_SIZE};

// Fuzz target: MessageHeader::read_at and read_from with arbitrary bytes.
//
// Catches bugs in:
// - Truncated header handling
// - Offset arithmetic near the end of the buffer
fuzz_target!(|data: &[u8]| {
    let at_zero = MessageHeader::read_at(data, 0);
    let from_view = MessageHeader::read_from(&ByteView::new(data));
    assert_eq!(at_zero, from_view);
    assert_eq!(at_zero.is_ok(), data.len() >= MESSAGE_HEADER_SIZE);

    if let Some(&offset) = data.first() {
        let _ = MessageHeader::read_at(data, usize::from(offset));
    }
});
