#![forbid(unsafe_code)]

//! Applying decoded server messages to the store.
//!
//! Each `apply_*` method handles one inbound kind and returns a small outcome
//! value so the caller can raise notices or update UI state without peeking
//! into the store before and after.

use antgrid_core::{AntId, CellCoord, Color, GridSize, Player, PlayerId};
use antgrid_protocol::{
    GameStateSnapshotPayload, PlaceAntAckPayload, PlayerJoinPayload, PlayerLeavePayload,
    RuleChangeAckPayload, TileFlipPayload,
};

use crate::store::{GameStore, Snapshot};

/// Result of a `PLAYER_JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The player was not known before.
    pub added: bool,
    /// The first-join heuristic adopted this player as the local one.
    pub became_local: bool,
}

/// One ant newly introduced by a `PLACE_ANT` broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedAnt {
    pub ant_id: AntId,
    pub owner: Option<PlayerId>,
}

/// Result of a `PLACE_ANT` broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub placed: Vec<PlacedAnt>,
    /// One of the placed ants belongs to the local player.
    pub local_acknowledged: bool,
}

/// Result of a `RULE_CHANGE` acknowledgement that matched a known ant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleChangeOutcome {
    pub ant_id: AntId,
    pub is_local: bool,
}

/// How a `GAME_STATE_SNAPSHOT` was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStateOutcome {
    /// First snapshot after (re)connect: state replaced wholesale.
    Resynced,
    /// Per-tick snapshot: cells merged as a diff, ants replaced.
    Merged { cells: usize },
}

impl GameStore {
    /// Register a joining player, adopting it as the local player when the
    /// first-join heuristic is armed.
    pub fn apply_player_join(&mut self, payload: &PlayerJoinPayload) -> JoinOutcome {
        let player = Player::new(payload.player_id.clone(), payload.color.clone());
        let added = self.add_player(player.clone());
        let became_local = self.welcome_armed();
        if became_local {
            self.set_current_player(player);
        }
        JoinOutcome {
            added,
            became_local,
        }
    }

    /// Remove a leaving player and its ant.
    pub fn apply_player_leave(&mut self, payload: &PlayerLeavePayload) -> Option<Player> {
        let removed = self.remove_player(&payload.player_id, &payload.cells);
        if removed.is_none() {
            tracing::debug!(target: "antgrid.store", player = %payload.player_id, "leave for unknown player");
        }
        removed
    }

    /// Merge a placement broadcast. Ants already known are refreshed in
    /// place; new ones are attributed to an owner when possible and
    /// acknowledged.
    pub fn apply_placement_ack(&mut self, payload: &PlaceAntAckPayload) -> PlacementOutcome {
        self.merge_diff(&payload.cells);
        let mut outcome = PlacementOutcome::default();
        let mut explicit_owner = payload.player_id.clone();
        for ant in &payload.ants {
            if self.ant(&ant.id).is_some() {
                self.upsert_ant(ant.clone());
                continue;
            }
            let owner = explicit_owner
                .take()
                .or_else(|| self.owner_by_color(&ant.color, ant.position));
            let is_local = self.record_placement(owner.as_ref(), ant.clone());
            outcome.local_acknowledged |= is_local;
            outcome.placed.push(PlacedAnt {
                ant_id: ant.id.clone(),
                owner,
            });
        }
        outcome
    }

    /// Attribute a new ant to the single ant-less player wearing its color.
    /// When several match, the local player wins if it has a pending placement
    /// at the ant's position.
    fn owner_by_color(&self, color: &Color, position: CellCoord) -> Option<PlayerId> {
        let mut candidates = self
            .players()
            .values()
            .filter(|p| p.ant_id.is_none() && p.color.same_as(color));
        let first = candidates.next()?;
        if candidates.next().is_none() {
            return Some(first.id.clone());
        }
        let local = self.current_player()?;
        let claims = self.pending_placement() == Some(position)
            && local.ant_id.is_none()
            && local.color.same_as(color);
        claims.then(|| local.id.clone())
    }

    /// Apply a rule-change acknowledgement. `None` when it was dropped.
    pub fn apply_rule_change(&mut self, payload: &RuleChangeAckPayload) -> Option<RuleChangeOutcome> {
        let ant_id = self.acknowledge_rule_change(&payload.player_id, payload.rules.clone())?;
        Some(RuleChangeOutcome {
            ant_id,
            is_local: self.is_local_player(&payload.player_id),
        })
    }

    /// Merge a tile-flip diff.
    pub fn apply_tile_flip(&mut self, payload: &TileFlipPayload) -> usize {
        self.merge_diff(&payload.cells)
    }

    /// Apply a server snapshot: wholesale on resync, as a diff otherwise.
    pub fn apply_game_state(&mut self, payload: &GameStateSnapshotPayload) -> GameStateOutcome {
        let current = self.grid();
        let grid = GridSize::new(
            payload.width.unwrap_or(current.width),
            payload.height.unwrap_or(current.height),
        );
        if self.resync_pending() {
            let ants = payload.ants.clone().unwrap_or_else(|| self.ants().to_vec());
            self.apply_snapshot(Snapshot {
                grid,
                cells: payload.cells.flatten(),
                ants,
                players: None,
            });
            return GameStateOutcome::Resynced;
        }
        self.set_grid_size(grid);
        let cells = self.merge_diff(&payload.cells);
        if let Some(ants) = &payload.ants {
            self.replace_ants(ants.clone());
            self.sync_current_player();
        }
        GameStateOutcome::Merged { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antgrid_core::{Ant, CellKey, Direction};
    use antgrid_protocol::GridDiff;

    fn ant(id: &str, x: i64, y: i64, color: &str) -> Ant {
        Ant {
            id: AntId::from(id),
            position: CellCoord::new(x, y),
            direction: Direction::Right,
            color: Color::from(color),
            rules: Vec::new(),
        }
    }

    fn join(id: &str, color: &str) -> PlayerJoinPayload {
        PlayerJoinPayload {
            player_id: PlayerId::from(id),
            color: Color::from(color),
        }
    }

    #[test]
    fn first_join_becomes_local() {
        let mut store = GameStore::default();
        let first = store.apply_player_join(&join("me", "#ff0000"));
        let second = store.apply_player_join(&join("other", "#00ff00"));
        assert!(first.became_local && first.added);
        assert!(!second.became_local && second.added);
        assert_eq!(store.current_player().unwrap().id, PlayerId::from("me"));
        assert_eq!(store.selected_rules().len(), 2);
    }

    #[test]
    fn placement_attributed_by_color() {
        let mut store = GameStore::default();
        store.apply_player_join(&join("me", "#ff0000"));
        store.apply_player_join(&join("other", "#00ff00"));

        let outcome = store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: None,
            cells: GridDiff::from_cells([(3, 3, "#ff0000")]),
            ants: vec![ant("a1", 3, 3, "#FF0000")],
        });
        assert!(outcome.local_acknowledged);
        assert_eq!(outcome.placed[0].owner, Some(PlayerId::from("me")));
        assert!(store.is_local_ant(&AntId::from("a1")));
        assert_eq!(store.color_at(CellKey::new(3, 3)), Some(&Color::from("#ff0000")));
    }

    #[test]
    fn placement_with_explicit_owner() {
        let mut store = GameStore::default();
        store.apply_player_join(&join("me", "#ff0000"));
        store.apply_player_join(&join("twin", "#ff0000"));
        let outcome = store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: Some(PlayerId::from("twin")),
            cells: GridDiff::new(),
            ants: vec![ant("a7", 0, 0, "#ff0000")],
        });
        assert!(!outcome.local_acknowledged);
        assert_eq!(
            store.player(&PlayerId::from("twin")).unwrap().ant_id,
            Some(AntId::from("a7"))
        );
    }

    #[test]
    fn ambiguous_color_without_pending_stays_unattributed() {
        let mut store = GameStore::default();
        store.apply_player_join(&join("me", "#ff0000"));
        store.apply_player_join(&join("twin", "#ff0000"));
        let outcome = store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: None,
            cells: GridDiff::new(),
            ants: vec![ant("a7", 0, 0, "#ff0000")],
        });
        assert_eq!(outcome.placed[0].owner, None);
        assert_eq!(store.ants().len(), 1);
    }

    #[test]
    fn known_ants_refresh_in_place() {
        let mut store = GameStore::default();
        store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: None,
            cells: GridDiff::new(),
            ants: vec![ant("a1", 0, 0, "#123456")],
        });
        let outcome = store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: None,
            cells: GridDiff::new(),
            ants: vec![ant("a1", 1, 0, "#123456"), ant("a2", 5, 5, "#654321")],
        });
        assert_eq!(outcome.placed.len(), 1);
        assert_eq!(store.ants().len(), 2);
        assert_eq!(store.ant(&AntId::from("a1")).unwrap().position, CellCoord::new(1, 0));
    }

    #[test]
    fn first_snapshot_resyncs_then_merges() {
        let mut store = GameStore::default();
        store.merge_diff(&GridDiff::from_cells([(9, 9, "#000000")]));

        let outcome = store.apply_game_state(&GameStateSnapshotPayload {
            cells: GridDiff::from_cells([(1, 1, "#ff0000")]),
            ants: Some(vec![ant("a1", 1, 1, "#ff0000")]),
            width: Some(40),
            height: None,
        });
        assert_eq!(outcome, GameStateOutcome::Resynced);
        assert_eq!(store.grid(), GridSize::new(40, 100));
        assert!(store.color_at(CellKey::new(9, 9)).is_none());
        assert_eq!(store.snapshot_epoch(), 1);

        let outcome = store.apply_game_state(&GameStateSnapshotPayload {
            cells: GridDiff::from_cells([(2, 1, "#ff0000")]),
            ants: Some(vec![ant("a1", 2, 1, "#ff0000")]),
            width: None,
            height: None,
        });
        assert_eq!(outcome, GameStateOutcome::Merged { cells: 1 });
        assert_eq!(store.cells().len(), 2);
        assert_eq!(store.snapshot_epoch(), 1);
        assert_eq!(store.ants()[0].position, CellCoord::new(2, 1));
    }

    fn decode_snapshot(frame: &str) -> GameStateSnapshotPayload {
        match antgrid_protocol::decode_inbound(frame).unwrap() {
            antgrid_protocol::InboundMessage::GameStateSnapshot(payload) => payload,
            other => panic!("expected a snapshot, got {}", other.kind()),
        }
    }

    #[test]
    fn cells_only_update_keeps_ants() {
        let mut store = GameStore::default();
        store.apply_player_join(&join("me", "#ff0000"));
        store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: Some(PlayerId::from("me")),
            cells: GridDiff::new(),
            ants: vec![ant("a1", 1, 1, "#ff0000")],
        });
        store.apply_game_state(&GameStateSnapshotPayload {
            cells: GridDiff::new(),
            ants: Some(vec![ant("a1", 1, 1, "#ff0000")]),
            width: None,
            height: None,
        });

        let tick = decode_snapshot(
            r##"{"type":"GAME_STATE_SNAPSHOT","payload":{"cells":{"0,0":{"2,2":"#00ff00"}}}}"##,
        );
        assert_eq!(tick.ants, None);
        let outcome = store.apply_game_state(&tick);

        assert_eq!(outcome, GameStateOutcome::Merged { cells: 1 });
        assert_eq!(store.color_at(CellKey::new(2, 2)), Some(&Color::from("#00ff00")));
        assert_eq!(store.ants().len(), 1);
        assert_eq!(
            store.current_player().and_then(|p| p.ant_id.clone()),
            Some(AntId::from("a1"))
        );
    }

    #[test]
    fn resync_without_ants_keeps_known_ants() {
        let mut store = GameStore::default();
        store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: None,
            cells: GridDiff::new(),
            ants: vec![ant("a1", 3, 3, "#123456")],
        });

        let outcome = store.apply_game_state(&decode_snapshot(
            r##"{"type":"GAME_STATE_SNAPSHOT","payload":{"cells":{"0,0":{"4,4":"#000000"}}}}"##,
        ));

        assert_eq!(outcome, GameStateOutcome::Resynced);
        assert_eq!(store.ants().len(), 1);
        assert_eq!(store.cells().len(), 1);
    }

    #[test]
    fn rule_change_reports_locality() {
        let mut store = GameStore::default();
        store.apply_player_join(&join("me", "#ff0000"));
        store.apply_placement_ack(&PlaceAntAckPayload {
            player_id: Some(PlayerId::from("me")),
            cells: GridDiff::new(),
            ants: vec![ant("a1", 0, 0, "#ff0000")],
        });
        let outcome = store
            .apply_rule_change(&RuleChangeAckPayload {
                player_id: PlayerId::from("me"),
                rules: Vec::new(),
            })
            .unwrap();
        assert!(outcome.is_local);
        assert_eq!(outcome.ant_id, AntId::from("a1"));
    }
}
