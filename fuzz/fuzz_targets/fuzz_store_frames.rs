#![no_main]

use antgrid_core::GridSize;
use antgrid_protocol::{InboundMessage, decode_inbound};
use antgrid_store::GameStore;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Session {
    width: u8,
    height: u8,
    frames: Vec<String>,
}

fuzz_target!(|session: Session| {
    let grid = GridSize::new(u32::from(session.width).max(1), u32::from(session.height).max(1));
    let mut store = GameStore::new(grid);

    for frame in session.frames.iter().take(64) {
        let Ok(message) = decode_inbound(frame) else {
            continue;
        };
        match message {
            InboundMessage::PlayerJoin(p) => {
                store.apply_player_join(&p);
            }
            InboundMessage::PlayerLeave(p) => {
                store.apply_player_leave(&p);
            }
            InboundMessage::PlaceAnt(p) => {
                store.apply_placement_ack(&p);
            }
            InboundMessage::RuleChange(p) => {
                store.apply_rule_change(&p);
            }
            InboundMessage::TileFlip(p) => {
                store.apply_tile_flip(&p);
            }
            InboundMessage::GameStateSnapshot(p) => {
                store.apply_game_state(&p);
            }
            InboundMessage::Error(_) => {}
        }

        // Every stored cell lies inside the current grid.
        let grid = store.grid();
        assert!(store.cells().keys().all(|key| grid.contains(key.coord())));
        assert!(store.new_cells().keys().all(|key| grid.contains(key.coord())));
    }
});
