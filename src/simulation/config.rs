//! Tuning configuration - serializable parameters for the thermal core
//!
//! All gameplay-tuned scalars in one place, serializable to RON for presets.
//! Loading is fail-soft: a malformed preset logs a warning and falls back to
//! the defaults so the simulation keeps running.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a tuning preset cannot be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning preset: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Complete tuning for the thermal/combustion core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    // -- Heat exchange --
    /// Per-tick exchange speed for sustained contact.
    pub exchange_speed: f32,
    /// Exchange speed for an instantaneous collision jolt.
    pub collision_speed: f32,
    /// Fraction of the pending-heat buffer folded into temperature per tick.
    pub buffer_rate: f32,
    /// Passive heat-loss rate, scaled by material conductivity.
    pub passive_decay: f32,
    /// Temperatures below this snap to exactly zero.
    pub zero_epsilon: f32,
    /// Decay factor applied to the heat source while above temperature 1.
    pub overheat_decay: f32,

    // -- Water --
    /// Chunk mass that counts as one "body unit" when scaling water cooling.
    pub reference_chunk_mass: f32,
    /// Submersion loss divisor for the primary contact point.
    pub submersion_divisor_main: f32,
    /// Submersion loss divisor for every other contact point.
    pub submersion_divisor_rest: f32,
    /// Rain-soak loss divisor.
    pub rain_divisor: f32,
    /// Flat loss when a water drip lands.
    pub drip_loss: f32,
    /// Loss per unit of waterfall flow.
    pub waterfall_loss_per_flow: f32,
    /// Ticks of steam-hiss cue after each cooling application.
    pub steam_sound_ticks: u32,

    // -- Combustion --
    /// Radiant exchange speed at point-blank range.
    pub radiant_speed: f32,
    /// Distance at which radiant heating peaks.
    pub radiant_inner: f32,
    /// Distance beyond which radiant heating is zero.
    pub radiant_outer: f32,
    /// Bulk temperature above which random ignition can happen.
    pub ignition_threshold: f32,
    /// Ignition probability per unit of temperature above the threshold.
    pub ignition_chance: f32,
    /// Per-tick burn advance for a segment on a living composite.
    pub seed_burn_rate: f32,
    /// Per-tick burn advance once the composite is dead; burns out fast.
    pub seed_burn_rate_dead: f32,
    /// Divisor applied to segment heat feeding the bulk temperature.
    pub bulk_heat_divisor: f32,
    /// Chance factor for spreading to the nearest unlit segment.
    pub spread_chance: f32,
    /// Chance factor for ember particles off a burning segment.
    pub ember_chance: f32,
    /// Impulse applied to the composite's endpoints when a segment finishes.
    pub seed_kick: f32,

    // -- Deliberate feeding --
    /// Reach within which the heat source can feed a composite by hand.
    pub feed_reach: f32,
    /// Ticks of feeding to fully heat a living composite.
    pub feed_ticks: f32,
    /// Ticks of feeding once the composite is dead.
    pub feed_ticks_dead: f32,
    /// Feeding stops once the bulk temperature reaches this.
    pub feed_max_temperature: f32,

    // -- Player heating interaction --
    /// Ticks of holding to fully heat a non-fuel target.
    pub hold_ticks: f32,
    /// Base ticks for consuming a fuel target.
    pub fuel_hold_base: f32,
    /// Extra ticks per unit of fuel-target mass.
    pub fuel_hold_mass_scale: f32,
    /// A non-fuel target must be at least this much cooler than the player.
    pub heat_epsilon: f32,
    /// Progress above which feedback effects and rapid heating start.
    pub feedback_threshold: f32,
    /// Exchange speed multiplier while rapidly heating a held non-fuel item.
    pub held_exchange_scale: f32,
    /// Flat heat bonus on top of a consumed fuel target's mass.
    pub fuel_bonus: f32,
    /// Fuel payoff multiplier when the player is cold (diminishing returns).
    pub payoff_cold: f32,
    /// Fuel payoff multiplier when the player is already hot.
    pub payoff_hot: f32,

    // -- Douse branch --
    /// Ticks of holding underwater before the douse commits.
    pub douse_ticks: f32,
    /// Progress above which the escalating shake/steam feedback starts.
    pub douse_feedback_threshold: f32,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        ThermalConfig {
            exchange_speed: 0.05,
            collision_speed: 0.25,
            buffer_rate: 0.15,
            passive_decay: 0.1,
            zero_epsilon: 0.001,
            overheat_decay: 0.995,

            reference_chunk_mass: 0.35,
            submersion_divisor_main: 100.0,
            submersion_divisor_rest: 400.0,
            rain_divisor: 100.0,
            drip_loss: 1.0 / 100.0,
            waterfall_loss_per_flow: 1.0 / 600.0,
            steam_sound_ticks: 7,

            radiant_speed: 0.25,
            radiant_inner: 5.0,
            radiant_outer: 50.0,
            ignition_threshold: 0.2,
            ignition_chance: 0.06,
            seed_burn_rate: 1.0 / 400.0,
            seed_burn_rate_dead: 1.0 / 80.0,
            bulk_heat_divisor: 20.0,
            spread_chance: 0.2,
            ember_chance: 0.2,
            seed_kick: 0.35,

            feed_reach: 22.0,
            feed_ticks: 800.0,
            feed_ticks_dead: 700.0,
            feed_max_temperature: 0.45,

            hold_ticks: 80.0,
            fuel_hold_base: 80.0,
            fuel_hold_mass_scale: 160.0,
            heat_epsilon: 0.01,
            feedback_threshold: 0.25,
            held_exchange_scale: 0.25,
            fuel_bonus: 0.005,
            payoff_cold: 1.5,
            payoff_hot: 0.25,

            douse_ticks: 120.0,
            douse_feedback_threshold: 0.5,
        }
    }
}

impl ThermalConfig {
    /// Parse a RON preset, falling back to defaults on malformed input.
    /// The parse failure is logged, not propagated; use
    /// [`ThermalConfig::try_from_ron_str`] when the cause matters.
    pub fn from_ron_str(source: &str) -> Self {
        match Self::try_from_ron_str(source) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("falling back to default tuning: {err}");
                Self::default()
            }
        }
    }

    /// Parse a RON preset, propagating the parse error.
    pub fn try_from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ThermalConfig::default();
        assert_eq!(config.exchange_speed, 0.05);
        assert_eq!(config.submersion_divisor_main, 100.0);
        assert_eq!(config.submersion_divisor_rest, 400.0);
        assert!(config.seed_burn_rate_dead > config.seed_burn_rate);
    }

    #[test]
    fn test_partial_preset_overrides_defaults() {
        let config = ThermalConfig::from_ron_str("(exchange_speed: 0.1)");
        assert_eq!(config.exchange_speed, 0.1);
        // Untouched fields keep their defaults.
        assert_eq!(config.buffer_rate, 0.15);
    }

    #[test]
    fn test_malformed_preset_fails_soft() {
        let config = ThermalConfig::from_ron_str("this is not ron {{{");
        assert_eq!(config.exchange_speed, 0.05);

        assert!(ThermalConfig::try_from_ron_str("this is not ron {{{").is_err());
    }
}
