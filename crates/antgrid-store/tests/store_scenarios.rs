#![forbid(unsafe_code)]

//! Scenario tests for the store: placement rejection, leave cleanup, the
//! reconnect flow, and the log events emitted for dropped messages.
//!
//! Run:
//!   cargo test -p antgrid-store --test store_scenarios

use std::sync::{Arc, Mutex};

use antgrid_core::{Ant, AntId, CellCoord, CellKey, Color, Direction, GridSize, PlayerId};
use antgrid_protocol::{
    GameStateSnapshotPayload, GridDiff, MemoryGateway, PlaceAntAckPayload, PlayerJoinPayload,
    PlayerLeavePayload, RuleChangeAckPayload,
};
use antgrid_store::{
    ConnectionState, GameStateOutcome, GameStore, IntentError, ValidationError,
};
use tracing_subscriber::layer::SubscriberExt;

fn ant(id: &str, x: i64, y: i64, color: &str) -> Ant {
    Ant {
        id: AntId::from(id),
        position: CellCoord::new(x, y),
        direction: Direction::Down,
        color: Color::from(color),
        rules: Vec::new(),
    }
}

fn join(store: &mut GameStore, id: &str, color: &str) {
    store.apply_player_join(&PlayerJoinPayload {
        player_id: PlayerId::from(id),
        color: Color::from(color),
    });
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn placement_outside_grid_is_rejected_without_sending() {
    let mut store = GameStore::new(GridSize::new(50, 50));
    join(&mut store, "me", "#ff0000");
    let mut gateway = MemoryGateway::connected();

    let err = store
        .place_ant(&mut gateway, CellCoord::new(-1, 5))
        .unwrap_err();

    assert!(matches!(
        err,
        IntentError::Validation(ValidationError::OutOfBounds { .. })
    ));
    assert!(gateway.sent().is_empty());
    assert_eq!(store.pending_placement(), None);
}

#[test]
fn leave_removes_player_and_owned_ant() {
    let mut store = GameStore::default();
    join(&mut store, "me", "#ff0000");
    join(&mut store, "p", "#00ff00");
    store.apply_placement_ack(&PlaceAntAckPayload {
        player_id: Some(PlayerId::from("p")),
        cells: GridDiff::from_cells([(3, 3, "#00ff00")]),
        ants: vec![ant("a1", 3, 3, "#00ff00")],
    });
    assert_eq!(store.ants().len(), 1);

    let removed = store.apply_player_leave(&PlayerLeavePayload {
        player_id: PlayerId::from("p"),
        cells: GridDiff::from_cells([(3, 3, "#FFFFFF")]),
        ants: Vec::new(),
    });

    assert_eq!(removed.map(|p| p.id), Some(PlayerId::from("p")));
    assert!(store.ants().iter().all(|a| a.id != AntId::from("a1")));
    assert!(store.player(&PlayerId::from("p")).is_none());
    assert_eq!(store.color_at(CellKey::new(3, 3)), Some(&Color::white()));
    assert_eq!(store.new_cells().len(), 1);
}

#[test]
fn reconnect_resyncs_and_reidentifies() {
    let mut store = GameStore::default();
    store.set_connection_state(ConnectionState::Connecting).unwrap();
    store.set_connection_state(ConnectionState::Connected).unwrap();
    join(&mut store, "me-1", "#ff0000");

    let snapshot = GameStateSnapshotPayload {
        cells: GridDiff::from_cells([(0, 0, "#ff0000")]),
        ants: Some(Vec::new()),
        width: None,
        height: None,
    };
    assert_eq!(store.apply_game_state(&snapshot), GameStateOutcome::Resynced);
    assert!(matches!(
        store.apply_game_state(&snapshot),
        GameStateOutcome::Merged { .. }
    ));

    store.set_connection_state(ConnectionState::Disconnected).unwrap();
    store.set_connection_state(ConnectionState::Connecting).unwrap();
    store.set_connection_state(ConnectionState::Connected).unwrap();
    assert!(store.current_player().is_none());

    join(&mut store, "me-2", "#0000ff");
    assert_eq!(store.current_player().map(|p| p.id.clone()), Some(PlayerId::from("me-2")));
    assert_eq!(store.apply_game_state(&snapshot), GameStateOutcome::Resynced);
    assert_eq!(store.snapshot_epoch(), 2);
}

// ============================================================================
// Log capture
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
}

struct StoreCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for StoreCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            message: visitor.0,
        });
    }
}

fn with_capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(StoreCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn unknown_rule_change_logs_warning_and_changes_nothing() {
    let mut store = GameStore::default();
    store.apply_placement_ack(&PlaceAntAckPayload {
        player_id: None,
        cells: GridDiff::new(),
        ants: vec![ant("a1", 0, 0, "#123456")],
    });
    let before = store.ants().to_vec();

    let events = with_capture(|| {
        let outcome = store.apply_rule_change(&RuleChangeAckPayload {
            player_id: PlayerId::from("ghost"),
            rules: Vec::new(),
        });
        assert!(outcome.is_none());
    });

    assert_eq!(store.ants(), before.as_slice());
    let warning = events
        .iter()
        .find(|e| e.level == tracing::Level::WARN)
        .expect("a warning is emitted");
    assert_eq!(warning.target, "antgrid.store");
    assert!(warning.message.contains("rule change"));
}

#[test]
fn accepted_merges_log_at_debug_only() {
    let mut store = GameStore::default();
    let events = with_capture(|| {
        store.merge_diff(&GridDiff::from_cells([(1, 2, "#abcdef")]));
    });
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.level == tracing::Level::DEBUG));
}

#[test]
fn resize_with_ants_present_warns() {
    let mut store = GameStore::default();
    store.apply_game_state(&GameStateSnapshotPayload {
        cells: GridDiff::new(),
        ants: Some(vec![ant("a1", 5, 5, "#ff0000")]),
        width: None,
        height: None,
    });

    let events = with_capture(|| {
        store.apply_game_state(&GameStateSnapshotPayload {
            cells: GridDiff::new(),
            ants: None,
            width: Some(40),
            height: Some(40),
        });
    });

    assert_eq!(store.grid(), GridSize::new(40, 40));
    assert_eq!(store.ants().len(), 1);
    let warning = events
        .iter()
        .find(|e| e.level == tracing::Level::WARN)
        .expect("a warning is emitted");
    assert_eq!(warning.target, "antgrid.store");
    assert!(warning.message.contains("grid resized"));
}

#[test]
fn resize_of_empty_board_is_quiet() {
    let mut store = GameStore::default();
    let events = with_capture(|| {
        store.apply_game_state(&GameStateSnapshotPayload {
            cells: GridDiff::new(),
            ants: Some(Vec::new()),
            width: Some(30),
            height: Some(30),
        });
    });
    assert_eq!(store.grid(), GridSize::new(30, 30));
    assert!(events.iter().all(|e| e.level != tracing::Level::WARN));
}
