#![no_main]

use antgrid_protocol::{InboundMessage, decode_inbound};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must decode or fail, never panic.
    let Ok(frame) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(message) = decode_inbound(frame) {
        let _ = message.kind();
        match message {
            InboundMessage::PlaceAnt(p) => {
                let _ = p.cells.flatten();
            }
            InboundMessage::TileFlip(p) => {
                let _ = p.cells.flatten();
            }
            InboundMessage::PlayerLeave(p) => {
                let _ = p.cells.flatten();
            }
            InboundMessage::GameStateSnapshot(p) => {
                let _ = p.cells.flatten();
            }
            _ => {}
        }
    }
});
