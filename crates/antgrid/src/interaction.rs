#![forbid(unsafe_code)]

//! UI interaction state read by the panels.

use antgrid_core::AntId;

/// What a click or tap on the grid does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Pan and zoom only.
    #[default]
    Idle,
    PlacingAnt,
    FlippingTile,
}

/// Panel-facing state owned by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub connected: bool,
    /// Message of the last transport failure, cleared on reconnect.
    pub connection_error: Option<String>,
    pub mode: InteractionMode,
    /// Ant highlighted in the ant list.
    pub focused_ant: Option<AntId>,
    /// A focus jump requested but not yet applied to the viewport.
    pub(crate) focus_request: Option<AntId>,
    /// A configuration change was sent and not yet reflected.
    pub config_loading: bool,
}

impl UiState {
    /// Enter `mode`, or go back to idle if it is already active. Modes are
    /// mutually exclusive.
    pub fn toggle_mode(&mut self, mode: InteractionMode) -> InteractionMode {
        self.mode = if self.mode == mode {
            InteractionMode::Idle
        } else {
            mode
        };
        self.mode
    }

    /// Select an ant in the list. Selecting the focused ant again clears the
    /// selection; otherwise a focus jump is requested. Returns the new focus.
    pub fn toggle_focus(&mut self, ant: AntId) -> Option<&AntId> {
        if self.focused_ant.as_ref() == Some(&ant) {
            self.focused_ant = None;
            self.focus_request = None;
        } else {
            self.focus_request = Some(ant.clone());
            self.focused_ant = Some(ant);
        }
        self.focused_ant.as_ref()
    }

    #[must_use]
    pub fn focus_request(&self) -> Option<&AntId> {
        self.focus_request.as_ref()
    }
}
