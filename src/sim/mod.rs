//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (walls left then right, slots by index)
//! - No rendering, audio or platform dependencies (see [`effects`])

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod player;
pub mod powerup;
pub mod spikes;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Aabb, Body, Category, Contact, ContactKind, ContactTracker, KillZone, classify};
pub use difficulty::{background_tier_for_score, spike_count_for_score};
pub use effects::{BackgroundTier, Effect, Effects, Facing, PlayerVisual, Presenter, SoundId};
pub use player::Player;
pub use powerup::{PowerUpController, PowerUpKind, PowerUpState};
pub use spikes::{SpikeWalls, WallSide, WallSpikeSet};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use timer::{TimedAction, TimerId, Timers};
