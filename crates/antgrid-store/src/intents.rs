#![forbid(unsafe_code)]

//! Validate-then-emit intents.
//!
//! Each intent checks its preconditions against the current state first. A
//! failed check returns [`IntentError::Validation`] (or
//! [`IntentError::ConfigChange`]) and nothing reaches the gateway. Sending is
//! fire-and-forget: a transport error is returned as-is and never retried
//! here.

use antgrid_core::{CellCoord, Rule};
use antgrid_protocol::{Gateway, OutboundMessage};

use crate::error::{IntentError, ValidationError};
use crate::store::GameStore;
use crate::validation::{validate_config_change, validate_position, validate_rules};

fn send<G: Gateway>(gateway: &mut G, message: &OutboundMessage) -> Result<(), IntentError<G::Error>> {
    gateway.send(message).map_err(|err| {
        tracing::warn!(target: "antgrid.store", kind = message.kind(), error = %err, "send failed");
        IntentError::Transport(err)
    })?;
    tracing::debug!(target: "antgrid.store", kind = message.kind(), "intent sent");
    Ok(())
}

fn rejected<E>(kind: &'static str, err: impl Into<IntentError<E>>) -> IntentError<E>
where
    E: core::fmt::Display,
{
    let err = err.into();
    tracing::debug!(target: "antgrid.store", kind, reason = %err, "intent rejected");
    err
}

impl GameStore {
    /// Ask the server to place the local player's ant at `position` with the
    /// selected rules. Records the pending placement on success.
    pub fn place_ant<G: Gateway>(
        &mut self,
        gateway: &mut G,
        position: CellCoord,
    ) -> Result<(), IntentError<G::Error>> {
        if self.selected_rules().is_empty() {
            return Err(rejected("PLACE_ANT", ValidationError::EmptyRules));
        }
        validate_position(position, self.grid()).map_err(|e| rejected("PLACE_ANT", e))?;
        validate_rules(self.selected_rules()).map_err(|e| rejected("PLACE_ANT", e))?;
        let message = OutboundMessage::PlaceAnt {
            position,
            rules: self.selected_rules().to_vec(),
        };
        send(gateway, &message)?;
        self.set_pending_placement(position);
        Ok(())
    }

    /// Ask the server to flip one tile.
    pub fn flip_tile<G: Gateway>(
        &self,
        gateway: &mut G,
        position: CellCoord,
    ) -> Result<(), IntentError<G::Error>> {
        validate_position(position, self.grid()).map_err(|e| rejected("TILE_FLIP", e))?;
        send(gateway, &OutboundMessage::TileFlip { position })
    }

    /// Ask the server to replace the local ant's rules.
    pub fn change_rules<G: Gateway>(
        &self,
        gateway: &mut G,
        rules: &[Rule],
    ) -> Result<(), IntentError<G::Error>> {
        validate_rules(rules).map_err(|e| rejected("RULE_CHANGE", e))?;
        send(
            gateway,
            &OutboundMessage::RuleChange {
                rules: rules.to_vec(),
            },
        )
    }

    /// [`change_rules`](Self::change_rules) with the selected rules.
    pub fn apply_selected_rules<G: Gateway>(
        &self,
        gateway: &mut G,
    ) -> Result<(), IntentError<G::Error>> {
        self.change_rules(gateway, self.selected_rules())
    }

    /// Ask the server to reconfigure the game. Refused while ants exist.
    pub fn request_config_change<G: Gateway>(
        &self,
        gateway: &mut G,
        grid_size: u32,
        tick_interval: u32,
    ) -> Result<(), IntentError<G::Error>> {
        validate_config_change(self.ants().len(), grid_size, tick_interval)
            .map_err(|e| rejected("UPDATE_GAME_CONFIG", e))?;
        send(
            gateway,
            &OutboundMessage::UpdateGameConfig {
                grid_size,
                tick_interval,
            },
        )
    }
}
