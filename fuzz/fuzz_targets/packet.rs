#![no_main]

use libfuzzer_sys::fuzz_target;
use mdp_wire::{Packet, MESSAGE_SIZE_LENGTH};

// Fuzz target: packet header and MsgSize framing.
//
// Catches bugs in:
// - Packet header length checks
// - MsgSize prefixes that are too small, too large, or run past the end
// - Frame offsets drifting out of the packet
fuzz_target!(|data: &[u8]| {
    let Ok(packet) = Packet::parse(data) else {
        return;
    };
    for frame in packet.frames() {
        let Ok(frame) = frame else {
            break;
        };
        let end = frame.offset + MESSAGE_SIZE_LENGTH + frame.bytes.len();
        assert!(end <= data.len());
    }
});
