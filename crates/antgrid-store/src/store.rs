#![forbid(unsafe_code)]

//! The authoritative client-side game state.
//!
//! [`GameStore`] is a plain owned value. Every change goes through one of the
//! named mutation methods below (or the message-level wrappers in
//! [`crate::inbound`] and the intent emitters in [`crate::intents`]), and each
//! completes before the next read, so a frame never observes a half-applied
//! merge.
//!
//! # Render hand-off
//!
//! The renderer never diffs the whole grid. Instead the store publishes:
//!
//! - [`new_cells`](GameStore::new_cells): exactly the flattened cells of the
//!   most recent diff, replaced (not accumulated) on each merge, tagged with
//!   [`diff_seq`](GameStore::diff_seq);
//! - [`snapshot_epoch`](GameStore::snapshot_epoch): bumped on wholesale
//!   replacement, meaning "repaint everything";
//! - [`historical_baseline`](GameStore::historical_baseline): a one-shot bulk
//!   map painted once and then released.

use std::collections::HashMap;

use antgrid_core::{
    Ant, AntId, CellCoord, CellKey, CellMap, Color, GridSize, Player, PlayerId, Rule, TurnDirection,
};
use antgrid_protocol::GridDiff;

use crate::connection::ConnectionState;
use crate::error::{ConnectionError, ValidationError};

/// Players keyed by id.
pub type PlayerMap = HashMap<PlayerId, Player, ahash::RandomState>;

/// Default tick interval advertised before the server says otherwise.
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 250;

/// Wholesale replacement state for [`GameStore::apply_snapshot`].
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub grid: GridSize,
    pub cells: CellMap,
    pub ants: Vec<Ant>,
    /// `None` keeps the currently known players.
    pub players: Option<Vec<Player>>,
}

/// One row of the ant panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntListing {
    pub ant_id: AntId,
    pub color: Color,
    pub is_local: bool,
    pub label: String,
}

/// Client-side mirror of the server's game.
#[derive(Debug)]
pub struct GameStore {
    grid: GridSize,
    cells: CellMap,
    new_cells: CellMap,
    diff_seq: u64,
    snapshot_epoch: u64,
    baseline: Option<CellMap>,
    baseline_consumed: bool,
    baseline_generation: u64,
    ants: Vec<Ant>,
    players: PlayerMap,
    current_player: Option<Player>,
    welcome_armed: bool,
    resync_pending: bool,
    selected_rules: Vec<Rule>,
    tick_interval: u32,
    pending_placement: Option<CellCoord>,
    connection: ConnectionState,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}

impl GameStore {
    /// An empty store for a grid of the given size.
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            cells: CellMap::default(),
            new_cells: CellMap::default(),
            diff_seq: 0,
            snapshot_epoch: 0,
            baseline: None,
            baseline_consumed: false,
            baseline_generation: 0,
            ants: Vec::new(),
            players: PlayerMap::default(),
            current_player: None,
            welcome_armed: true,
            resync_pending: true,
            selected_rules: Vec::new(),
            tick_interval: DEFAULT_TICK_INTERVAL_MS,
            pending_placement: None,
            connection: ConnectionState::Disconnected,
        }
    }

    /// Builder: set the advertised tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: u32) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Every non-background cell.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &CellMap {
        &self.cells
    }

    /// Color of one cell, or `None` for background.
    #[must_use]
    pub fn color_at(&self, key: CellKey) -> Option<&Color> {
        self.cells.get(&key)
    }

    /// Flattened cells of the most recent diff.
    #[inline]
    #[must_use]
    pub fn new_cells(&self) -> &CellMap {
        &self.new_cells
    }

    /// Incremented on every merge that replaces [`new_cells`](Self::new_cells).
    #[inline]
    #[must_use]
    pub fn diff_seq(&self) -> u64 {
        self.diff_seq
    }

    /// Incremented on every wholesale replacement.
    #[inline]
    #[must_use]
    pub fn snapshot_epoch(&self) -> u64 {
        self.snapshot_epoch
    }

    /// The baseline waiting to be painted, if any.
    #[must_use]
    pub fn historical_baseline(&self) -> Option<&CellMap> {
        self.baseline.as_ref()
    }

    /// Bumped when a baseline is installed.
    #[inline]
    #[must_use]
    pub fn baseline_generation(&self) -> u64 {
        self.baseline_generation
    }

    #[inline]
    #[must_use]
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    #[must_use]
    pub fn ant(&self, id: &AntId) -> Option<&Ant> {
        self.ants.iter().find(|ant| &ant.id == id)
    }

    #[inline]
    #[must_use]
    pub fn players(&self) -> &PlayerMap {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// The player this session believes it is.
    #[inline]
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.current_player.as_ref()
    }

    /// Whether `id` is the local player.
    #[must_use]
    pub fn is_local_player(&self, id: &PlayerId) -> bool {
        self.current_player.as_ref().is_some_and(|p| &p.id == id)
    }

    /// Whether `id` is the local player's ant.
    #[must_use]
    pub fn is_local_ant(&self, id: &AntId) -> bool {
        self.current_player
            .as_ref()
            .and_then(|p| p.ant_id.as_ref())
            .is_some_and(|ant_id| ant_id == id)
    }

    #[inline]
    #[must_use]
    pub fn selected_rules(&self) -> &[Rule] {
        &self.selected_rules
    }

    #[inline]
    #[must_use]
    pub fn tick_interval(&self) -> u32 {
        self.tick_interval
    }

    /// Position of a placement sent but not yet acknowledged.
    #[inline]
    #[must_use]
    pub fn pending_placement(&self) -> Option<CellCoord> {
        self.pending_placement
    }

    #[inline]
    #[must_use]
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Whether the next `PLAYER_JOIN` will be taken as the local player.
    #[inline]
    #[must_use]
    pub fn welcome_armed(&self) -> bool {
        self.welcome_armed && self.current_player.is_none()
    }

    /// Whether the next server snapshot replaces state wholesale.
    #[inline]
    #[must_use]
    pub fn resync_pending(&self) -> bool {
        self.resync_pending
    }

    /// Ants for the side panel: the local ant first, the rest in arrival
    /// order, numbered by their position in the listing.
    #[must_use]
    pub fn ant_listing(&self) -> Vec<AntListing> {
        let mut ordered: Vec<&Ant> = self.ants.iter().collect();
        ordered.sort_by_key(|ant| !self.is_local_ant(&ant.id));
        ordered
            .into_iter()
            .enumerate()
            .map(|(index, ant)| {
                let is_local = self.is_local_ant(&ant.id);
                let label = if is_local {
                    "Your ant".to_owned()
                } else {
                    format!("Player {}'s ant", index + 1)
                };
                AntListing {
                    ant_id: ant.id.clone(),
                    color: ant.color.clone(),
                    is_local,
                    label,
                }
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Grid mutations
    // -------------------------------------------------------------------------

    /// Replace grid, cells, ants, and optionally players wholesale.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot {
            grid,
            cells,
            ants,
            players,
        } = snapshot;
        if grid != self.grid {
            warn_resize_with_ants(self.grid, grid, ants.len());
        }
        self.grid = grid;
        self.cells = cells;
        self.retain_in_bounds();
        self.ants = ants;
        if let Some(players) = players {
            self.players = players.into_iter().map(|p| (p.id.clone(), p)).collect();
        }
        self.new_cells.clear();
        self.snapshot_epoch += 1;
        self.resync_pending = false;
        self.sync_current_player();
        tracing::debug!(
            target: "antgrid.store",
            width = grid.width,
            height = grid.height,
            cells = self.cells.len(),
            ants = self.ants.len(),
            epoch = self.snapshot_epoch,
            "snapshot applied"
        );
    }

    /// Flatten and merge a chunked diff, last write wins. Returns the number
    /// of cells written.
    pub fn merge_diff(&mut self, diff: &GridDiff) -> usize {
        self.merge_cells(diff.flatten())
    }

    /// Merge an already-flattened map and make it the new-cells view.
    pub fn merge_cells(&mut self, mut flat: CellMap) -> usize {
        let grid = self.grid;
        let before = flat.len();
        flat.retain(|key, _| grid.contains(key.coord()));
        if flat.len() != before {
            tracing::warn!(
                target: "antgrid.store",
                dropped = before - flat.len(),
                "diff cells outside the grid ignored"
            );
        }
        for (key, color) in &flat {
            self.cells.insert(*key, color.clone());
        }
        let written = flat.len();
        self.new_cells = flat;
        self.diff_seq += 1;
        tracing::debug!(target: "antgrid.store", cells = written, seq = self.diff_seq, "diff merged");
        written
    }

    /// Merge a bulk map beneath the live cells, once per store. Keys already
    /// present keep their live color. Returns `false` if a baseline was
    /// already applied.
    pub fn apply_historical_baseline(&mut self, cells: CellMap) -> bool {
        if self.baseline_consumed {
            tracing::debug!(target: "antgrid.store", "historical baseline already applied");
            return false;
        }
        let grid = self.grid;
        let mut baseline = cells;
        baseline.retain(|key, _| grid.contains(key.coord()));
        for (key, color) in &baseline {
            self.cells.entry(*key).or_insert_with(|| color.clone());
        }
        tracing::debug!(target: "antgrid.store", cells = baseline.len(), "historical baseline merged");
        self.baseline = Some(baseline);
        self.baseline_consumed = true;
        self.baseline_generation += 1;
        true
    }

    /// Drop the baseline once it has been painted.
    pub fn release_historical_baseline(&mut self) {
        self.baseline = None;
    }

    fn retain_in_bounds(&mut self) {
        let grid = self.grid;
        self.cells.retain(|key, _| grid.contains(key.coord()));
        self.new_cells.retain(|key, _| grid.contains(key.coord()));
    }

    // -------------------------------------------------------------------------
    // Players and ants
    // -------------------------------------------------------------------------

    /// Register a player. Idempotent: returns `false` if the id is known.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.players.contains_key(&player.id) {
            return false;
        }
        tracing::debug!(target: "antgrid.store", player = %player.id, "player joined");
        self.players.insert(player.id.clone(), player);
        true
    }

    /// Remove a player and the ant it owns. The cleanup diff is merged only
    /// when there was an ant to remove.
    pub fn remove_player(&mut self, id: &PlayerId, cleanup: &GridDiff) -> Option<Player> {
        let removed = self.players.remove(id)?;
        if let Some(ant_id) = &removed.ant_id {
            self.ants.retain(|ant| &ant.id != ant_id);
            self.merge_diff(cleanup);
        }
        tracing::debug!(
            target: "antgrid.store",
            player = %id,
            ant = ?removed.ant_id,
            "player left"
        );
        Some(removed)
    }

    /// Record an acknowledged placement: merge its diff, add (or refresh)
    /// the ant, and link it to its owner. Returns whether the owner is the
    /// local player.
    pub fn acknowledge_placement(&mut self, player_id: &PlayerId, ant: Ant, diff: &GridDiff) -> bool {
        self.merge_diff(diff);
        self.record_placement(Some(player_id), ant)
    }

    pub(crate) fn record_placement(&mut self, owner: Option<&PlayerId>, ant: Ant) -> bool {
        let ant_id = ant.id.clone();
        self.upsert_ant(ant);
        let Some(owner) = owner else {
            tracing::debug!(target: "antgrid.store", ant = %ant_id, "ant placed without a known owner");
            return false;
        };
        match self.players.get_mut(owner) {
            Some(player) => player.ant_id = Some(ant_id.clone()),
            None => tracing::warn!(
                target: "antgrid.store",
                player = %owner,
                ant = %ant_id,
                "placement acknowledged for unknown player"
            ),
        }
        let is_local = self.is_local_player(owner);
        if let Some(current) = self.current_player.as_mut().filter(|_| is_local) {
            current.ant_id = Some(ant_id.clone());
            self.pending_placement = None;
        }
        tracing::debug!(target: "antgrid.store", player = %owner, ant = %ant_id, is_local, "placement acknowledged");
        is_local
    }

    pub(crate) fn upsert_ant(&mut self, ant: Ant) {
        match self.ants.iter_mut().find(|known| known.id == ant.id) {
            Some(known) => *known = ant,
            None => self.ants.push(ant),
        }
    }

    pub(crate) fn replace_ants(&mut self, ants: Vec<Ant>) {
        self.ants = ants;
    }

    /// Replace the rules of a player's ant. Drops the update (with a warning)
    /// when the player or its ant is unknown, returning `None`.
    pub fn acknowledge_rule_change(&mut self, player_id: &PlayerId, rules: Vec<Rule>) -> Option<AntId> {
        let Some(ant_id) = self.players.get(player_id).and_then(|p| p.ant_id.clone()) else {
            tracing::warn!(
                target: "antgrid.store",
                player = %player_id,
                "rule change for unknown player or ant dropped"
            );
            return None;
        };
        let Some(ant) = self.ants.iter_mut().find(|ant| ant.id == ant_id) else {
            tracing::warn!(
                target: "antgrid.store",
                player = %player_id,
                ant = %ant_id,
                "rule change for unknown ant dropped"
            );
            return None;
        };
        ant.rules = rules;
        tracing::debug!(target: "antgrid.store", player = %player_id, ant = %ant_id, "rules updated");
        Some(ant_id)
    }

    // -------------------------------------------------------------------------
    // Local player
    // -------------------------------------------------------------------------

    /// Adopt `player` as the local player and seed the default rule pair.
    pub fn set_current_player(&mut self, player: Player) {
        self.selected_rules = Rule::default_set(&player.color);
        tracing::debug!(target: "antgrid.store", player = %player.id, "local player identified");
        self.current_player = Some(player);
        self.welcome_armed = false;
    }

    pub fn set_selected_rules(&mut self, rules: Vec<Rule>) {
        self.selected_rules = rules;
    }

    /// Change the turn direction of one selected rule.
    pub fn set_rule_direction(
        &mut self,
        index: usize,
        direction: TurnDirection,
    ) -> Result<(), ValidationError> {
        let len = self.selected_rules.len();
        let rule = self
            .selected_rules
            .get_mut(index)
            .ok_or(ValidationError::RuleIndexOutOfRange { index, len })?;
        rule.turn_direction = direction;
        Ok(())
    }

    pub(crate) fn set_pending_placement(&mut self, position: CellCoord) {
        self.pending_placement = Some(position);
    }

    pub(crate) fn set_grid_size(&mut self, grid: GridSize) {
        if grid != self.grid {
            warn_resize_with_ants(self.grid, grid, self.ants.len());
            self.grid = grid;
            self.retain_in_bounds();
            self.snapshot_epoch += 1;
        }
    }

    pub(crate) fn sync_current_player(&mut self) {
        let Some(current) = self.current_player.as_mut() else {
            return;
        };
        if let Some(known) = self.players.get(&current.id) {
            current.ant_id = known.ant_id.clone();
        }
        if let Some(ant_id) = &current.ant_id {
            if !self.ants.iter().any(|ant| &ant.id == ant_id) {
                current.ant_id = None;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Connection
    // -------------------------------------------------------------------------

    /// Advance the connection state machine.
    ///
    /// Starting a new attempt forgets the local identity and re-arms the
    /// first-join heuristic, since the server assigns a fresh player id per
    /// connection. Reaching `Connected` schedules a wholesale resync from the
    /// next snapshot.
    pub fn set_connection_state(
        &mut self,
        next: ConnectionState,
    ) -> Result<ConnectionState, ConnectionError> {
        let previous = self.connection;
        self.connection = match previous.transition(next) {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(target: "antgrid.store", error = %err, "connection transition rejected");
                return Err(err);
            }
        };
        match next {
            ConnectionState::Connecting => {
                self.current_player = None;
                self.welcome_armed = true;
                self.pending_placement = None;
            }
            ConnectionState::Connected => self.resync_pending = true,
            ConnectionState::Disconnected | ConnectionState::Error => {
                self.pending_placement = None;
            }
        }
        tracing::debug!(
            target: "antgrid.store",
            from = previous.as_str(),
            to = next.as_str(),
            "connection state changed"
        );
        Ok(previous)
    }
}

/// Config changes are refused locally while ants exist, so a resize that
/// keeps ants is unexpected.
fn warn_resize_with_ants(from: GridSize, to: GridSize, ants: usize) {
    if ants > 0 {
        tracing::warn!(
            target: "antgrid.store",
            from_width = from.width,
            from_height = from.height,
            width = to.width,
            height = to.height,
            ants,
            "grid resized while ants are present"
        );
    }
}
