#![forbid(unsafe_code)]

//! End-to-end scenarios through the client facade: socket frames in, taps
//! routed to intents, notices out, frames rendered headlessly.
//!
//! Run:
//!   cargo test -p antgrid --test client_scenarios

use std::sync::{Arc, Mutex};
use std::time::Duration;

use antgrid::prelude::*;
use antgrid::protocol::OutboundMessage;
use antgrid::render::CellRepaint;
use antgrid::{CellMap, Color, Severity};
use antgrid_core::CellKey;
use pretty_assertions::assert_eq;
use tracing_subscriber::layer::SubscriberExt;
use web_time::Instant;

const JOIN_ME: &str = r##"{"type":"PLAYER_JOIN","payload":{"playerId":"me","color":"#ff0000"}}"##;
const JOIN_OTHER: &str = r##"{"type":"PLAYER_JOIN","payload":{"playerId":"p2","color":"#00ff00"}}"##;

fn config(side: u32) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.session.grid_width = side;
    config.session.grid_height = side;
    config
}

/// Connected, laid out at 800×600, with "me" joined as the local player.
fn session(side: u32) -> Client<MemoryGateway, antgrid::RecordingSurface> {
    let mut client = Client::headless(&config(side), MemoryGateway::new());
    client.connect().unwrap();
    client.receive(JOIN_ME).unwrap();
    client.resize(CanvasSize::new(800.0, 600.0));
    client.drain_notices();
    client
}

fn titles(client: &mut Client<MemoryGateway, antgrid::RecordingSurface>) -> Vec<String> {
    client.drain_notices().into_iter().map(|n| n.title).collect()
}

fn click(at: (f64, f64)) -> InputEvent {
    InputEvent::Click(ScreenPoint::new(at.0, at.1))
}

// ============================================================================
// Connection
// ============================================================================

#[test]
fn connect_announces_and_marks_connected() {
    let mut client = Client::headless(&ClientConfig::default(), MemoryGateway::new());
    client.connect().unwrap();

    assert!(client.ui().connected);
    assert_eq!(client.store().connection(), ConnectionState::Connected);
    let notices = client.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Connected");
    assert_eq!(notices[0].severity, Severity::Info);
}

#[test]
fn transport_failure_flags_connection_without_notice() {
    let mut gateway = MemoryGateway::new();
    gateway.fail_next("refused");
    let mut client = Client::headless(&ClientConfig::default(), gateway);

    let err = client.connect().unwrap_err();

    assert_eq!(err.recovery(), Recovery::FlagConnection);
    assert!(!client.ui().connected);
    assert_eq!(client.store().connection(), ConnectionState::Error);
    assert!(client.ui().connection_error.as_deref().unwrap().contains("refused"));
    assert!(client.notices().is_empty());

    // A retry clears the flag.
    client.connect().unwrap();
    assert_eq!(client.ui().connection_error, None);
}

#[test]
fn disconnect_twice_is_quiet() {
    let mut client = session(50);
    client.disconnect().unwrap();
    client.disconnect().unwrap();
    assert!(!client.ui().connected);
    assert!(!client.gateway().is_open());
}

#[test]
fn first_snapshot_after_connect_replaces_state() {
    let mut client = session(50);
    client
        .receive(r##"{"type":"TILE_FLIP","payload":{"cells":{"0,0":{"1,1":"#000000"}}}}"##)
        .unwrap();
    assert_eq!(client.store().cells().len(), 1);

    client
        .receive(r##"{"type":"GAME_STATE_SNAPSHOT","payload":{"cells":{"0,0":{"2,2":"#ff0000"}},"ants":[]}}"##)
        .unwrap();

    assert_eq!(client.store().cells().len(), 1);
    assert!(client.store().color_at(CellKey::new(1, 1)).is_none());
}

// ============================================================================
// Taps and intents
// ============================================================================

#[test]
fn placing_ant_sends_tapped_cell_and_returns_to_idle_on_ack() {
    let mut client = session(50);
    client.toggle_mode(InteractionMode::PlacingAnt);

    // 800×600 canvas, 50×50 grid: the center pixel is cell (25, 25).
    client.input(&click((400.0, 300.0)), Instant::now()).unwrap();

    let sent = client.gateway().sent().to_vec();
    assert_eq!(sent.len(), 1);
    let OutboundMessage::PlaceAnt { position, .. } = &sent[0] else {
        panic!("expected PLACE_ANT, got {sent:?}");
    };
    assert_eq!(*position, CellCoord::new(25, 25));
    assert_eq!(client.ui().mode, InteractionMode::PlacingAnt);

    client
        .receive(
            r##"{"type":"PLACE_ANT","payload":{"playerId":"me","cells":{},
                "ants":[{"id":"a1","position":{"x":25,"y":25},"direction":"UP","color":"#ff0000"}]}}"##,
        )
        .unwrap();

    assert_eq!(client.ui().mode, InteractionMode::Idle);
    assert_eq!(client.store().ants().len(), 1);
}

#[test]
fn click_outside_grid_shows_invalid_position() {
    let mut client = session(50);
    client.toggle_mode(InteractionMode::PlacingAnt);

    let err = client.input(&click((5.0, 5.0)), Instant::now()).unwrap_err();

    assert_eq!(err.error_type(), "outside_grid");
    assert!(client.gateway().sent().is_empty());
    let notices = client.drain_notices();
    assert_eq!(notices[0].title, "Invalid Position");
    assert_eq!(notices[0].description, "Click position is outside the grid boundaries");
    assert_eq!(notices[0].severity, Severity::Error);
}

#[test]
fn tap_outside_grid_names_touch() {
    let mut client = session(50);
    client.toggle_mode(InteractionMode::FlippingTile);
    let t0 = Instant::now();
    let at = ScreenPoint::new(5.0, 5.0);

    client
        .input(&InputEvent::TouchStart([at].into_iter().collect()), t0)
        .unwrap();
    let result = client.input(&InputEvent::TouchEnd(Default::default()), t0);

    assert!(result.is_err());
    let notices = client.drain_notices();
    assert_eq!(notices[0].description, "Touch position is outside the grid boundaries");
}

#[test]
fn placing_without_rules_asks_for_rules() {
    let mut client = session(50);
    client.set_selected_rules(Vec::new());
    client.set_mode(InteractionMode::PlacingAnt);

    let _ = client.input(&click((400.0, 300.0)), Instant::now());

    let notices = client.drain_notices();
    assert_eq!(notices[0].title, "No rules selected");
    assert_eq!(notices[0].description, "Please select rules before placing an ant");
    assert!(client.gateway().sent().is_empty());
}

#[test]
fn idle_clicks_do_nothing() {
    let mut client = session(50);
    let outcome = client.input(&click((400.0, 300.0)), Instant::now()).unwrap();
    assert!(outcome.tap.is_some());
    assert!(client.gateway().sent().is_empty());
    assert!(client.notices().is_empty());
}

#[test]
fn flipping_tile_sends_position() {
    let mut client = session(50);
    client.toggle_mode(InteractionMode::FlippingTile);
    client.input(&click((400.0, 300.0)), Instant::now()).unwrap();
    assert_eq!(
        client.gateway().sent(),
        &[OutboundMessage::TileFlip {
            position: CellCoord::new(25, 25)
        }]
    );
}

#[test]
fn duplicate_rule_colors_are_rejected_locally() {
    let mut client = session(50);
    let rules = vec![
        Rule::new("#ffffff", "#ff0000", TurnDirection::Right),
        Rule::new("#ffffff", "#00ff00", TurnDirection::Left),
    ];
    let err = client.change_rules(&rules).unwrap_err();
    assert_eq!(err.recovery(), Recovery::NotifyUser);
    assert_eq!(titles(&mut client), vec!["Invalid rules".to_owned()]);
    assert!(client.gateway().sent().is_empty());
}

// ============================================================================
// Inbound notices
// ============================================================================

#[test]
fn rule_change_notices_distinguish_local_and_remote() {
    let mut client = session(50);
    client.receive(JOIN_OTHER).unwrap();
    client
        .receive(
            r##"{"type":"PLACE_ANT","payload":{"playerId":"me","cells":{},
                "ants":[{"id":"a1","position":{"x":1,"y":1},"direction":"UP","color":"#ff0000"}]}}"##,
        )
        .unwrap();
    client
        .receive(
            r##"{"type":"PLACE_ANT","payload":{"playerId":"p2","cells":{},
                "ants":[{"id":"a1","position":{"x":1,"y":1},"direction":"UP","color":"#ff0000"},
                        {"id":"a2","position":{"x":9,"y":9},"direction":"UP","color":"#00ff00"}]}}"##,
        )
        .unwrap();

    client
        .receive(r#"{"type":"RULE_CHANGE","payload":{"playerId":"me","rules":[]}}"#)
        .unwrap();
    client
        .receive(r#"{"type":"RULE_CHANGE","payload":{"playerId":"p2","rules":[]}}"#)
        .unwrap();

    let notices = client.drain_notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].description, "Your ant's rules have been successfully updated.");
    assert!(notices[1].description.starts_with("Another player"));
}

#[test]
fn rule_change_for_unknown_player_is_dropped() {
    let mut client = session(50);
    let err = client
        .receive(r#"{"type":"RULE_CHANGE","payload":{"playerId":"ghost","rules":[]}}"#)
        .unwrap_err();
    assert_eq!(err.recovery(), Recovery::LogAndDrop);
    assert!(client.notices().is_empty());
}

#[test]
fn server_error_becomes_notice() {
    let mut client = session(50);
    let _ = client.receive(r#"{"type":"ERROR","payload":{"message":"Cell occupied"}}"#);
    let notices = client.drain_notices();
    assert_eq!(
        notices,
        vec![Notice::error("An error occurred", "Cell occupied")]
    );
}

#[test]
fn malformed_frames_are_dropped_quietly() {
    let mut client = session(50);
    let err = client.receive("not json").unwrap_err();
    assert_eq!(err.recovery(), Recovery::LogAndDrop);
    assert!(client.notices().is_empty());
}

// ============================================================================
// Configuration change
// ============================================================================

#[test]
fn config_change_loads_until_sized_snapshot() {
    let mut client = session(50);
    client.request_config_change(64, 100).unwrap();
    assert!(client.ui().config_loading);

    client
        .receive(r#"{"type":"GAME_STATE_SNAPSHOT","payload":{"cells":{},"ants":[],"width":64,"height":64}}"#)
        .unwrap();

    assert!(!client.ui().config_loading);
    assert_eq!(client.viewport().grid(), client.store().grid());
    assert_eq!(client.store().grid().width, 64);
}

#[test]
fn config_change_with_ants_present_is_refused() {
    let mut client = session(50);
    client
        .receive(
            r##"{"type":"PLACE_ANT","payload":{"cells":{},
                "ants":[{"id":"a1","position":{"x":1,"y":1},"direction":"UP","color":"#123456"}]}}"##,
        )
        .unwrap();

    assert!(client.request_config_change(64, 100).is_err());
    assert!(!client.ui().config_loading);
    assert_eq!(titles(&mut client), vec!["Configuration not changed".to_owned()]);
}

#[test]
fn server_error_clears_config_loading() {
    let mut client = session(50);
    client.request_config_change(64, 100).unwrap();
    let _ = client.receive(r#"{"type":"ERROR","payload":{"message":"busy"}}"#);
    assert!(!client.ui().config_loading);
}

// ============================================================================
// Focus and frames
// ============================================================================

#[test]
fn selecting_ant_centers_its_cell() {
    let mut client = session(100);
    client
        .receive(
            r##"{"type":"PLACE_ANT","payload":{"cells":{},
                "ants":[{"id":"a1","position":{"x":10,"y":10},"direction":"UP","color":"#123456"}]}}"##,
        )
        .unwrap();

    assert_eq!(client.select_ant(AntId::from("a1")), Some(AntId::from("a1")));
    let center = client.viewport().canvas().center();
    assert_eq!(client.viewport().hit_test(center), Some(CellCoord::new(10, 10)));

    assert_eq!(client.select_ant(AntId::from("a1")), None);
    assert_eq!(client.ui().focused_ant, None);
}

#[test]
fn focus_before_layout_waits_for_resize() {
    let mut client = Client::headless(&config(100), MemoryGateway::new());
    client
        .receive(
            r##"{"type":"PLACE_ANT","payload":{"cells":{},
                "ants":[{"id":"a1","position":{"x":10,"y":10},"direction":"UP","color":"#123456"}]}}"##,
        )
        .unwrap();
    client.select_ant(AntId::from("a1"));
    assert!(client.ui().focus_request().is_some());

    client.resize(CanvasSize::new(800.0, 600.0));

    assert!(client.ui().focus_request().is_none());
    let center = client.viewport().canvas().center();
    assert_eq!(client.viewport().hit_test(center), Some(CellCoord::new(10, 10)));
}

#[test]
fn frames_before_layout_are_skipped() {
    let mut client = Client::headless(&ClientConfig::default(), MemoryGateway::new());
    client.start();
    let err = client.frame(Instant::now()).unwrap_err();
    assert_eq!(err.recovery(), Recovery::SkipFrame);
    assert!(client.notices().is_empty());
}

#[test]
fn stopped_loop_renders_nothing() {
    let mut client = session(50);
    assert_eq!(client.frame(Instant::now()).unwrap(), None);
    assert!(client.start());
    assert!(client.frame(Instant::now()).unwrap().is_some());
    assert!(client.stop());
    assert_eq!(client.frame(Instant::now()).unwrap(), None);
}

#[test]
fn baseline_is_released_after_first_paint() {
    let mut client = session(50);
    let mut baseline = CellMap::default();
    baseline.insert(CellKey::new(3, 3), Color::from("#abcdef"));
    assert!(client.load_historical_baseline(baseline));
    client.start();

    let t0 = Instant::now();
    let first = client.frame(t0).unwrap().unwrap();
    assert!(first.baseline_painted);
    assert!(client.store().historical_baseline().is_none());
    assert_eq!(
        client.store().color_at(CellKey::new(3, 3)),
        Some(&Color::from("#abcdef"))
    );

    let second = client.frame(t0 + Duration::from_millis(16)).unwrap().unwrap();
    assert!(!second.baseline_painted);
    assert_eq!(second.cells, CellRepaint::Unchanged);
}

#[test]
fn tile_flip_after_settle_paints_incrementally() {
    let mut client = session(50);
    client.start();
    let t0 = Instant::now();
    client.frame(t0).unwrap();

    client
        .receive(r##"{"type":"TILE_FLIP","payload":{"cells":{"0,0":{"4,4":"#000000"}}}}"##)
        .unwrap();
    let report = client.frame(t0 + Duration::from_millis(16)).unwrap().unwrap();

    assert_eq!(report.cells, CellRepaint::Incremental { cells: 1 });
}

// ============================================================================
// Log capture
// ============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<(tracing::Level, String)>>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Captured {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();
        self.0
            .lock()
            .unwrap()
            .push((*meta.level(), meta.target().to_owned()));
    }
}

#[test]
fn unknown_message_kind_warns_and_is_ignored() {
    let mut client = session(50);
    let captured = Captured::default();
    let subscriber = tracing_subscriber::registry().with(captured.clone());

    tracing::subscriber::with_default(subscriber, || {
        client
            .receive(r#"{"type":"CHAT","payload":{"text":"hi"}}"#)
            .unwrap();
    });

    let events = captured.0.lock().unwrap().clone();
    assert!(
        events
            .iter()
            .any(|(level, target)| *level == tracing::Level::WARN && target == "antgrid.client")
    );
    assert!(client.notices().is_empty());
}
