//! Data-driven game balance
//!
//! Every tunable number lives here so a session can be reconfigured from JSON
//! without touching the simulation. Missing keys fall back to [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Game tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Field
    pub field_width: f32,
    pub field_height: f32,
    pub kill_margin: f32,

    // Spike walls
    pub slots_per_wall: usize,
    pub spike_depth: f32,
    pub spike_height: f32,
    pub spike_spacing: f32,
    pub spike_base_y: f32,
    pub spike_motion_secs: f32,

    // Difficulty
    pub min_spikes: u32,
    pub max_spikes: u32,
    pub points_per_spike: u32,
    pub tier_one_score: u32,
    pub tier_two_score: u32,

    // Player
    pub player_size: f32,
    pub body_inset: f32,
    pub start_speed: f32,
    pub speed_increment: f32,
    pub jump_impulse: f32,
    pub knockback_impulse: f32,
    pub gravity: f32,
    pub impulse_scale: f32,
    pub points_per_meter: f32,

    // Power-ups
    pub power_up_size: f32,
    pub power_up_inset: f32,
    pub power_up_safe_margin: f32,
    pub power_up_roll_max: u32,
    pub power_up_sentinel: u32,
    pub invincibility_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            kill_margin: KILL_MARGIN,

            slots_per_wall: SLOTS_PER_WALL,
            spike_depth: SPIKE_DEPTH,
            spike_height: SPIKE_HEIGHT,
            spike_spacing: SPIKE_SPACING,
            spike_base_y: SPIKE_BASE_Y,
            spike_motion_secs: SPIKE_MOTION_SECS,

            min_spikes: MIN_SPIKES,
            max_spikes: MAX_SPIKES,
            points_per_spike: POINTS_PER_SPIKE,
            tier_one_score: TIER_ONE_SCORE,
            tier_two_score: TIER_TWO_SCORE,

            player_size: PLAYER_SIZE,
            body_inset: BODY_INSET,
            start_speed: START_SPEED,
            speed_increment: SPEED_INCREMENT,
            jump_impulse: JUMP_IMPULSE,
            knockback_impulse: KNOCKBACK_IMPULSE,
            gravity: GRAVITY,
            impulse_scale: IMPULSE_SCALE,
            points_per_meter: POINTS_PER_METER,

            power_up_size: POWER_UP_SIZE,
            power_up_inset: POWER_UP_INSET,
            power_up_safe_margin: POWER_UP_SAFE_MARGIN,
            power_up_roll_max: POWER_UP_ROLL_MAX,
            power_up_sentinel: POWER_UP_SENTINEL,
            invincibility_secs: INVINCIBILITY_SECS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{e}, using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values that would break session invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(invalid("field_width", "field dimensions must be positive"));
        }
        if self.slots_per_wall == 0 {
            return Err(invalid("slots_per_wall", "must be at least 1"));
        }
        if self.min_spikes > self.max_spikes {
            return Err(invalid("min_spikes", "cannot exceed max_spikes"));
        }
        if self.max_spikes as usize > self.slots_per_wall {
            return Err(invalid(
                "max_spikes",
                format!(
                    "{} spikes requested but a wall only has {} slots",
                    self.max_spikes, self.slots_per_wall
                ),
            ));
        }
        if self.points_per_spike == 0 {
            return Err(invalid("points_per_spike", "must be at least 1"));
        }
        if self.tier_one_score > self.tier_two_score {
            return Err(invalid("tier_one_score", "cannot exceed tier_two_score"));
        }
        if self.power_up_sentinel > self.power_up_roll_max {
            return Err(invalid(
                "power_up_sentinel",
                "sentinel is outside the roll range and could never spawn",
            ));
        }
        if self.invincibility_secs < 0.0 || self.spike_motion_secs < 0.0 {
            return Err(invalid("invincibility_secs", "durations cannot be negative"));
        }
        if !(0.0..=1.0).contains(&self.body_inset) {
            return Err(invalid("body_inset", "must be within 0.0..=1.0"));
        }
        Ok(())
    }

    /// Field dimensions as a vector
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// Gravity in points/s² once enabled
    pub fn gravity_accel(&self) -> f32 {
        self.gravity * self.points_per_meter
    }

    /// Bottom edge of a wall spike slot
    pub fn slot_y(&self, index: usize) -> f32 {
        index as f32 * self.spike_height * self.spike_spacing + self.spike_base_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "start_speed": 20.0 }"#).unwrap();
        assert_eq!(tuning.start_speed, 20.0);
        assert_eq!(tuning.slots_per_wall, SLOTS_PER_WALL);
        assert_eq!(tuning.max_spikes, MAX_SPIKES);
    }

    #[test]
    fn test_rejects_more_spikes_than_slots() {
        let err = Tuning::from_json(r#"{ "slots_per_wall": 5, "max_spikes": 7 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_spikes", .. }));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_unreachable_sentinel() {
        let err = Tuning::from_json(r#"{ "power_up_sentinel": 9 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "power_up_sentinel", .. }));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(Some(Path::new("/nonexistent/tuning.json")));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_slot_layout() {
        let tuning = Tuning::default();
        assert_eq!(tuning.slot_y(0), 160.0);
        assert!((tuning.slot_y(1) - 214.0).abs() < 0.001);
        // Top slot stays below the top kill zone
        let top = tuning.slot_y(tuning.slots_per_wall - 1) + tuning.spike_height;
        assert!(top < tuning.field_height - tuning.kill_margin);
    }
}
