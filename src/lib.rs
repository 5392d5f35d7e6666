//! Spike Wall - a wall-bouncing spike dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spike walls, power-ups, contacts, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default field dimensions (points)
    pub const FIELD_WIDTH: f32 = 390.0;
    pub const FIELD_HEIGHT: f32 = 844.0;

    /// Spike slots on each side wall
    pub const SLOTS_PER_WALL: usize = 10;
    /// Wall spike triangle size (depth into the field, height along the wall)
    pub const SPIKE_DEPTH: f32 = 25.0;
    pub const SPIKE_HEIGHT: f32 = 40.0;
    /// Vertical pitch between slots as a multiple of spike height
    pub const SPIKE_SPACING: f32 = 1.35;
    /// Bottom edge of slot 0
    pub const SPIKE_BASE_Y: f32 = 160.0;
    /// Seconds for a spike to fully extend or retract
    pub const SPIKE_MOTION_SECS: f32 = 0.4;

    /// Difficulty curve
    pub const MIN_SPIKES: u32 = 2;
    pub const MAX_SPIKES: u32 = 7;
    pub const POINTS_PER_SPIKE: u32 = 5;

    /// Player body
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Collision boxes are shrunk to this fraction of the sprite
    pub const BODY_INSET: f32 = 0.8;
    pub const START_SPEED: f32 = 15.0;
    pub const SPEED_INCREMENT: f32 = 0.5;
    pub const JUMP_IMPULSE: f32 = 30.0;
    pub const KNOCKBACK_IMPULSE: f32 = 25.0;
    /// Gravity in m/s² once the game starts (negative = down)
    pub const GRAVITY: f32 = -5.0;
    /// Velocity change (points/s) per unit of impulse
    pub const IMPULSE_SCALE: f32 = 20.0;
    pub const POINTS_PER_METER: f32 = 150.0;

    /// Height of the top and bottom kill zones (solid band + spike row)
    pub const KILL_MARGIN: f32 = 150.0;

    /// Power-up placement
    pub const POWER_UP_SIZE: f32 = 50.0;
    pub const POWER_UP_INSET: f32 = 50.0;
    pub const POWER_UP_SAFE_MARGIN: f32 = 220.0;
    /// Spawn roll: uniform integer in 0..=POWER_UP_ROLL_MAX, spawn on sentinel
    pub const POWER_UP_ROLL_MAX: u32 = 4;
    pub const POWER_UP_SENTINEL: u32 = 1;
    /// Invincibility: 9 repetitions of a 0.4s wait
    pub const INVINCIBILITY_SECS: f32 = 9.0 * 0.4;

    /// Background tier thresholds
    pub const TIER_ONE_SCORE: u32 = 5;
    pub const TIER_TWO_SCORE: u32 = 10;
}
