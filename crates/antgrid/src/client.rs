#![forbid(unsafe_code)]

//! Session wiring: one store, one viewport, one renderer, one gateway.
//!
//! [`Client`] is what a host talks to. It forwards decoded server messages to
//! the store, raw input to the viewport, taps to the store's intents, and
//! animation ticks to the renderer, and it owns the panel-facing UI state and
//! the notice queue.
//!
//! # Entry points
//!
//! | Host event              | Method                                   |
//! |-------------------------|------------------------------------------|
//! | socket frame            | [`receive`](Client::receive)             |
//! | connection state change | [`connection_changed`](Client::connection_changed) |
//! | pointer / wheel / touch | [`input`](Client::input)                 |
//! | container resize        | [`resize`](Client::resize)               |
//! | animation frame         | [`frame`](Client::frame)                 |
//!
//! Every entry point applies the error's [`Recovery`] before returning, so a
//! host may ignore the `Err` entirely.

use antgrid_core::{AntId, CanvasSize, CellMap, Rule, ScreenPoint, TurnDirection};
use antgrid_protocol::{Gateway, InboundMessage, decode_inbound};
use antgrid_render::{FrameLoop, FrameReport, LayerSet, LayeredRenderer, RecordingSurface, Surface};
use antgrid_store::{AntListing, ConnectionState, GameStateOutcome, GameStore, IntentError};
use antgrid_viewport::{InputEvent, InputOutcome, Viewport};
use web_time::Instant;

use crate::config::ClientConfig;
use crate::error::{Error, Intent, Recovery, Result};
use crate::interaction::{InteractionMode, UiState};
use crate::notice::{Notice, NoticeQueue};

pub struct Client<G: Gateway, S: Surface> {
    store: GameStore,
    viewport: Viewport,
    renderer: LayeredRenderer<S>,
    frame_loop: FrameLoop,
    gateway: G,
    ui: UiState,
    notices: NoticeQueue,
}

impl<G: Gateway> Client<G, RecordingSurface> {
    /// A client drawing to [`RecordingSurface`]s.
    #[must_use]
    pub fn headless(config: &ClientConfig, gateway: G) -> Self {
        Self::new(config, gateway, LayerSet::default())
    }
}

impl<G: Gateway, S: Surface> Client<G, S> {
    #[must_use]
    pub fn new(config: &ClientConfig, gateway: G, surfaces: LayerSet<S>) -> Self {
        let grid = config.grid_size();
        Self {
            store: GameStore::new(grid).with_tick_interval(config.session.tick_interval_ms),
            viewport: Viewport::new(grid, config.to_viewport_config()),
            renderer: LayeredRenderer::new(config.to_render_config(), surfaces),
            frame_loop: FrameLoop::new(),
            gateway,
            ui: UiState::default(),
            notices: NoticeQueue::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn renderer(&self) -> &LayeredRenderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut LayeredRenderer<S> {
        &mut self.renderer
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn notices(&self) -> &NoticeQueue {
        &self.notices
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Ant panel rows, local ant first.
    #[must_use]
    pub fn ant_listing(&self) -> Vec<AntListing> {
        self.store.ant_listing()
    }

    // -------------------------------------------------------------------------
    // Connection
    // -------------------------------------------------------------------------

    /// Open the gateway, moving through `connecting` to `connected` or
    /// `error`.
    pub fn connect(&mut self) -> Result<()> {
        self.connection_changed(ConnectionState::Connecting, None)?;
        match self.gateway.connect() {
            Ok(()) => self.connection_changed(ConnectionState::Connected, None),
            Err(err) => {
                let reason = err.to_string();
                self.connection_changed(ConnectionState::Error, Some(&reason))?;
                Err(self.absorb(Error::Transport(reason)))
            }
        }
    }

    /// Close the gateway. A no-op when already disconnected.
    pub fn disconnect(&mut self) -> Result<()> {
        self.gateway.disconnect();
        if self.store.connection() == ConnectionState::Disconnected {
            return Ok(());
        }
        self.connection_changed(ConnectionState::Disconnected, None)
    }

    /// Report a connection state change observed by the gateway.
    pub fn connection_changed(&mut self, next: ConnectionState, reason: Option<&str>) -> Result<()> {
        if let Err(err) = self.store.set_connection_state(next) {
            return Err(self.absorb(err.into()));
        }
        self.ui.connected = next.is_connected();
        match next {
            ConnectionState::Connected => {
                self.ui.connection_error = None;
                self.notices.push(Notice::connected());
            }
            ConnectionState::Error => {
                self.ui.connection_error =
                    Some(reason.unwrap_or("connection error").to_owned());
            }
            ConnectionState::Connecting | ConnectionState::Disconnected => {}
        }
        tracing::info!(target: "antgrid.client", state = next.as_str(), "connection");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Inbound
    // -------------------------------------------------------------------------

    /// Decode and apply one socket frame. Unknown kinds are logged and
    /// ignored.
    pub fn receive(&mut self, frame: &str) -> Result<()> {
        match decode_inbound(frame) {
            Ok(message) => self.dispatch(message),
            Err(err) if err.is_unknown_kind() => {
                tracing::warn!(target: "antgrid.client", error = %err, "ignoring message");
                Ok(())
            }
            Err(err) => Err(self.absorb(err.into())),
        }
    }

    /// Apply an already-decoded message.
    pub fn dispatch(&mut self, message: InboundMessage) -> Result<()> {
        let kind = message.kind();
        tracing::trace!(target: "antgrid.client", kind, "dispatch");
        match message {
            InboundMessage::PlayerJoin(payload) => {
                let outcome = self.store.apply_player_join(&payload);
                if outcome.became_local {
                    tracing::info!(target: "antgrid.client", player = %payload.player_id, "joined as local player");
                }
            }
            InboundMessage::PlayerLeave(payload) => {
                let removed = self.store.apply_player_leave(&payload);
                let left_ant = removed.and_then(|player| player.ant_id);
                if left_ant.is_some() && self.ui.focused_ant == left_ant {
                    self.ui.focused_ant = None;
                    self.ui.focus_request = None;
                }
            }
            InboundMessage::PlaceAnt(payload) => {
                let outcome = self.store.apply_placement_ack(&payload);
                if outcome.local_acknowledged && self.ui.mode == InteractionMode::PlacingAnt {
                    self.ui.mode = InteractionMode::Idle;
                }
            }
            InboundMessage::RuleChange(payload) => match self.store.apply_rule_change(&payload) {
                Some(outcome) => self.notices.push(Notice::rules_updated(outcome.is_local)),
                None => {
                    return Err(self.absorb(Error::UnknownEntity {
                        player_id: payload.player_id,
                    }));
                }
            },
            InboundMessage::TileFlip(payload) => {
                self.store.apply_tile_flip(&payload);
            }
            InboundMessage::GameStateSnapshot(payload) => {
                let resized = payload.width.is_some() || payload.height.is_some();
                let outcome = self.store.apply_game_state(&payload);
                self.viewport.set_grid(self.store.grid());
                if resized {
                    self.ui.config_loading = false;
                }
                if outcome == GameStateOutcome::Resynced {
                    tracing::info!(
                        target: "antgrid.client",
                        cells = self.store.cells().len(),
                        ants = self.store.ants().len(),
                        "state resynced"
                    );
                }
            }
            InboundMessage::Error(payload) => {
                self.ui.config_loading = false;
                return Err(self.absorb(Error::Server(payload.message)));
            }
        }
        Ok(())
    }

    /// Merge a one-time bulk cell map beneath the live cells.
    pub fn load_historical_baseline(&mut self, cells: CellMap) -> bool {
        self.store.apply_historical_baseline(cells)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Apply a container size.
    pub fn resize(&mut self, observed: CanvasSize) -> bool {
        let changed = self.viewport.resize(observed);
        if changed {
            self.resolve_focus();
        }
        changed
    }

    /// Feed one input event. Taps are routed to the current interaction mode.
    pub fn input(&mut self, event: &InputEvent, now: Instant) -> Result<InputOutcome> {
        let outcome = self.viewport.handle(event, now);
        if let Some(at) = outcome.tap {
            let touch = matches!(event, InputEvent::TouchEnd(_));
            self.route_tap(at, touch)?;
        }
        Ok(outcome)
    }

    fn route_tap(&mut self, at: ScreenPoint, touch: bool) -> Result<()> {
        let intent = match self.ui.mode {
            InteractionMode::Idle => return Ok(()),
            InteractionMode::PlacingAnt => Intent::PlaceAnt,
            InteractionMode::FlippingTile => Intent::FlipTile,
        };
        let Some(cell) = self.viewport.hit_test(at) else {
            return Err(self.absorb(Error::OutsideGrid { touch }));
        };
        let result = match intent {
            Intent::PlaceAnt => self.store.place_ant(&mut self.gateway, cell),
            _ => self.store.flip_tile(&mut self.gateway, cell),
        };
        self.intent_result(intent, result)
    }

    /// Enter `mode`, or return to idle if it is already active.
    pub fn toggle_mode(&mut self, mode: InteractionMode) -> InteractionMode {
        self.ui.toggle_mode(mode)
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.ui.mode = mode;
    }

    // -------------------------------------------------------------------------
    // Rules
    // -------------------------------------------------------------------------

    pub fn set_selected_rules(&mut self, rules: Vec<Rule>) {
        self.store.set_selected_rules(rules);
    }

    pub fn set_rule_direction(&mut self, index: usize, direction: TurnDirection) -> Result<()> {
        match self.store.set_rule_direction(index, direction) {
            Ok(()) => Ok(()),
            Err(source) => Err(self.absorb(Error::Rejected {
                intent: Intent::ChangeRules,
                source,
            })),
        }
    }

    /// Send the selected rules as the local ant's new rule set.
    pub fn apply_selected_rules(&mut self) -> Result<()> {
        let result = self.store.apply_selected_rules(&mut self.gateway);
        self.intent_result(Intent::ChangeRules, result)
    }

    pub fn change_rules(&mut self, rules: &[Rule]) -> Result<()> {
        let result = self.store.change_rules(&mut self.gateway, rules);
        self.intent_result(Intent::ChangeRules, result)
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Ask the server for a new grid size and tick interval. Sets the
    /// loading flag until a sized snapshot or an error arrives.
    pub fn request_config_change(&mut self, grid_size: u32, tick_interval: u32) -> Result<()> {
        let result = self
            .store
            .request_config_change(&mut self.gateway, grid_size, tick_interval);
        self.intent_result(Intent::ConfigChange, result)?;
        self.ui.config_loading = true;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // View controls
    // -------------------------------------------------------------------------

    pub fn zoom_in(&mut self) -> bool {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport.zoom_out()
    }

    pub fn center_view(&mut self) -> bool {
        self.viewport.center_view()
    }

    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent()
    }

    /// Select an ant in the list; selecting the focused ant again clears it.
    /// A new selection jumps the view to the ant.
    pub fn select_ant(&mut self, ant: AntId) -> Option<AntId> {
        let focused = self.ui.toggle_focus(ant).cloned();
        self.resolve_focus();
        focused
    }

    /// Apply a pending focus jump. Kept pending while the viewport has no
    /// layout; dropped if the ant is gone.
    fn resolve_focus(&mut self) {
        let Some(id) = self.ui.focus_request.clone() else {
            return;
        };
        let Some(position) = self.store.ant(&id).map(|ant| ant.position) else {
            tracing::debug!(target: "antgrid.client", ant = %id, "focus target gone");
            self.ui.focus_request = None;
            return;
        };
        if self.viewport.projection().is_degenerate() {
            return;
        }
        self.viewport.focus_on_cell(position);
        self.ui.focus_request = None;
    }

    // -------------------------------------------------------------------------
    // Frames
    // -------------------------------------------------------------------------

    /// Start accepting animation ticks.
    pub fn start(&mut self) -> bool {
        self.frame_loop.start()
    }

    pub fn stop(&mut self) -> bool {
        self.frame_loop.stop()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Render one animation tick. `Ok(None)` while stopped.
    pub fn frame(&mut self, now: Instant) -> Result<Option<FrameReport>> {
        if self.frame_loop.tick(now).is_none() {
            return Ok(None);
        }
        self.viewport.poll_settle(now);
        self.resolve_focus();
        match self.renderer.frame(&self.store, &self.viewport) {
            Ok(report) => {
                if report.baseline_painted {
                    self.store.release_historical_baseline();
                }
                Ok(Some(report))
            }
            Err(err) => Err(self.absorb(err.into())),
        }
    }

    // -------------------------------------------------------------------------
    // Errors
    // -------------------------------------------------------------------------

    fn intent_result<E: std::fmt::Display>(
        &mut self,
        intent: Intent,
        result: std::result::Result<(), IntentError<E>>,
    ) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(IntentError::Validation(source)) => {
                Err(self.absorb(Error::Rejected { intent, source }))
            }
            Err(IntentError::ConfigChange(err)) => Err(self.absorb(err.into())),
            Err(IntentError::Transport(err)) => Err(self.absorb(Error::Transport(err.to_string()))),
        }
    }

    /// Apply the recovery for `err` and hand it back.
    fn absorb(&mut self, err: Error) -> Error {
        match err.recovery() {
            Recovery::NotifyUser => {
                tracing::debug!(target: "antgrid.client", kind = err.error_type(), error = %err, "notifying user");
                if let Some(notice) = err.notice() {
                    self.notices.push(notice);
                }
            }
            Recovery::LogAndDrop => {
                tracing::warn!(target: "antgrid.client", kind = err.error_type(), error = %err, "dropped");
            }
            Recovery::FlagConnection => {
                tracing::warn!(target: "antgrid.client", error = %err, "transport failure");
                self.ui.connection_error = Some(err.to_string());
            }
            Recovery::SkipFrame => {
                tracing::trace!(target: "antgrid.client", error = %err, "frame skipped");
            }
        }
        err
    }
}
