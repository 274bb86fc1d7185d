#![no_main]

use libfuzzer_sys::fuzz_target;
use mdp_decoder::{PacketDecoder, TextRenderer};

// Fuzz target: full packet decode, then every field of every message.
//
// Calls `PacketDecoder::decode_packet` on arbitrary input and renders
// each decoded message, which reads every root field, every group
// dimension header, and every entry field.
// Catches bugs in:
// - Acting block length clamping
// - Group offset arithmetic (dimension headers, entry strides)
// - Null sentinel and decimal decoding
fuzz_target!(|data: &[u8]| {
    let decoder = PacketDecoder::mdp3();
    if let Ok(packet) = decoder.decode_packet(data) {
        for message in &packet.messages {
            let _ = TextRenderer::render(&message.reader);
            let _ = message.reader.encoded_length();
        }
    }
    if let Ok(Some(message)) = decoder.decode_message(data) {
        let _ = TextRenderer::render(&message.reader);
    }
});
