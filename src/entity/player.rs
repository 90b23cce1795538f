//! Player-side interaction state
//!
//! The privileged heat source carries two independent progress meters: one
//! for deliberately heating a held entity, one for deliberately dousing
//! itself underwater. Both reset to zero the moment their hold condition
//! breaks; there is no partial memory across interruptions.

use serde::{Deserialize, Serialize};

/// Input snapshot for one tick, supplied by the host each tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Horizontal movement axis: -1, 0 or 1.
    pub move_x: i8,
    /// Vertical movement axis: -1, 0 or 1.
    pub move_y: i8,
    pub jump: bool,
    pub throw: bool,
    /// The pickup/eat gesture that drives heating and dousing.
    pub pickup: bool,
}

impl PlayerInput {
    /// The neutral hold gesture: pickup pressed with no movement and no
    /// jump/throw in flight.
    pub fn neutral_hold(&self) -> bool {
        self.pickup && self.move_x == 0 && self.move_y == 0 && !self.jump && !self.throw
    }
}

/// Interaction state owned by the privileged entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current tick's input.
    pub input: PlayerInput,
    heat_progress: f32,
    douse_progress: f32,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress toward heating/consuming the held entity, in `[0, 1]`.
    pub fn heat_progress(&self) -> f32 {
        self.heat_progress
    }

    /// Progress toward the terminal douse, in `[0, 1+]`.
    pub fn douse_progress(&self) -> f32 {
        self.douse_progress
    }

    pub(crate) fn advance_heat(&mut self, amount: f32) {
        self.heat_progress = (self.heat_progress + amount).clamp(0.0, 1.0);
    }

    pub(crate) fn reset_heat(&mut self) {
        self.heat_progress = 0.0;
    }

    pub(crate) fn advance_douse(&mut self, amount: f32) {
        self.douse_progress += amount;
    }

    pub(crate) fn reset_douse(&mut self) {
        self.douse_progress = 0.0;
    }
}
