//! Per-entity thermal state
//!
//! Every simulated body carries a temperature in `[0, 1]` (transient
//! excursions above 1 are tolerated and decay), plus a non-negative buffer of
//! heat "in flight" that is folded into the temperature a fraction per tick.
//! Depositing into the buffer is the only way external code adds heat; direct
//! temperature writes are reserved for environment-driven resets and clamps.

use serde::{Deserialize, Serialize};

use crate::world::ObjectId;

/// Mutable thermal record owned by an entity for its lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermalState {
    temperature: f32,
    temperature_change: f32,
    /// Ticks remaining during which a steam-hiss cue is re-emitted.
    pub steam_sound: u32,
    /// Ongoing smoke association per contact point, lazily sized.
    /// Stale ids (object no longer live) are detected and replaced by users.
    smoke_slots: Vec<Option<ObjectId>>,
}

impl ThermalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Overwrite the temperature. Reserved for explicit resets and clamps
    /// (environment-driven restore, water cooling); gameplay heat goes
    /// through [`ThermalState::deposit`].
    pub fn set_temperature(&mut self, value: f32) {
        self.temperature = value;
    }

    /// Internal arithmetic path used by the exchange/diffusion/combustion
    /// steps. Not clamped; callers clamp at the point of use.
    pub(crate) fn add_temperature(&mut self, delta: f32) {
        self.temperature += delta;
    }

    /// Snap to exactly zero once below `epsilon`, so decay terminates
    /// instead of drifting asymptotically.
    pub(crate) fn snap_to_zero(&mut self, epsilon: f32) {
        if self.temperature < epsilon {
            self.temperature = 0.0;
        }
    }

    /// Heat waiting to be folded into the temperature.
    pub fn pending_change(&self) -> f32 {
        self.temperature_change
    }

    /// Deposit heat to be applied gradually over the next ticks.
    ///
    /// The buffer contract only admits non-negative deposits; a negative
    /// amount is a programming defect and fails fast.
    pub fn deposit(&mut self, amount: f32) {
        assert!(
            amount >= 0.0,
            "negative heat deposit ({amount}); cooling must go through the water/diffusion paths"
        );
        self.temperature_change += amount;
    }

    /// Cancel pending warming: you cannot be actively warming up while
    /// being doused. Clamps the buffer to at most zero.
    pub fn quench(&mut self) {
        self.temperature_change = self.temperature_change.min(0.0);
    }

    /// Fold `fraction` of the buffered heat into the temperature and remove
    /// it from the buffer. Returns the warming applied this tick.
    ///
    /// Asserts the buffer invariant: a negative `temperature_change` means a
    /// caller bypassed the deposit contract, which is raised immediately
    /// rather than silently clamped.
    pub(crate) fn integrate(&mut self, fraction: f32) -> f32 {
        assert!(
            self.temperature_change >= 0.0,
            "temperature_change buffer is negative ({}); deposit contract violated",
            self.temperature_change
        );
        let warming = self.temperature_change * fraction;
        self.temperature += warming;
        self.temperature_change -= warming;
        warming
    }

    /// Smoke handle associated with contact point `index`, if any.
    pub fn smoke_handle(&self, index: usize) -> Option<ObjectId> {
        self.smoke_slots.get(index).copied().flatten()
    }

    /// Associate (or clear) the smoke handle for contact point `index`,
    /// growing the slot array on first use.
    pub fn set_smoke_handle(&mut self, index: usize, handle: Option<ObjectId>) {
        if self.smoke_slots.len() <= index {
            self.smoke_slots.resize(index + 1, None);
        }
        self.smoke_slots[index] = handle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_integrate() {
        let mut thermal = ThermalState::new();
        thermal.deposit(1.0);
        assert_eq!(thermal.pending_change(), 1.0);

        let warming = thermal.integrate(0.15);
        assert!((warming - 0.15).abs() < 1e-6);
        assert!((thermal.temperature() - 0.15).abs() < 1e-6);
        assert!((thermal.pending_change() - 0.85).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "negative heat deposit")]
    fn test_negative_deposit_fails_fast() {
        let mut thermal = ThermalState::new();
        thermal.deposit(-0.1);
    }

    #[test]
    fn test_quench_cancels_pending_warming() {
        let mut thermal = ThermalState::new();
        thermal.deposit(0.5);
        thermal.quench();
        assert_eq!(thermal.pending_change(), 0.0);

        // Integration of an empty buffer is a no-op.
        let warming = thermal.integrate(0.15);
        assert_eq!(warming, 0.0);
        assert_eq!(thermal.temperature(), 0.0);
    }

    #[test]
    fn test_snap_to_zero() {
        let mut thermal = ThermalState::new();
        thermal.set_temperature(0.0005);
        thermal.snap_to_zero(0.001);
        assert_eq!(thermal.temperature(), 0.0);

        thermal.set_temperature(0.5);
        thermal.snap_to_zero(0.001);
        assert_eq!(thermal.temperature(), 0.5);
    }

    #[test]
    fn test_smoke_slots_lazily_sized() {
        let mut thermal = ThermalState::new();
        assert_eq!(thermal.smoke_handle(3), None);

        thermal.set_smoke_handle(3, Some(ObjectId(7)));
        assert_eq!(thermal.smoke_handle(3), Some(ObjectId(7)));
        assert_eq!(thermal.smoke_handle(0), None);
    }
}
