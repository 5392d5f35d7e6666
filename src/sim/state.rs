//! Game state and session lifecycle
//!
//! A session owns everything that changes during play. Restart throws the
//! whole session away and builds a fresh one, keeping only the tuning, the
//! RNG stream and the timer generation.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, ContactTracker};
use super::effects::{BackgroundTier, Effect, Effects, Facing, PlayerVisual, Presenter};
use super::player::Player;
use super::powerup::{PowerUpController, PowerUpKind};
use super::spikes::{SpikeWalls, WallSide};
use super::timer::Timers;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player floating at the centre, waiting for the first tap
    NotStarted,
    /// Active gameplay
    Running,
    /// Player hit a spike, waiting for a tap to restart
    Dead,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Walls bounced off this session
    pub score: u32,
    pub player: Player,
    pub walls: SpikeWalls,
    pub power_up: PowerUpController,
    pub timers: Timers,
    /// Presentation outbox, drained by the caller
    pub effects: Effects,
    pub background: BackgroundTier,
    /// Wall currently carrying spikes
    pub armed_side: Option<WallSide>,
    /// Simulation tick counter (reset on restart)
    pub time_ticks: u64,
    /// Restarts since the state was created
    pub sessions: u32,

    pub(crate) rng: Pcg32,
    pub(crate) contacts: ContactTracker,
    pub(crate) pending_contacts: VecDeque<Contact>,
    pub(crate) queued_inputs: u32,
    pub(crate) out_of_bounds: bool,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let rng = Pcg32::seed_from_u64(seed);
        let mut state = Self::fresh(seed, tuning, rng, Timers::new(), Effects::new(), 0);
        state.sync_presentation();
        log::debug!("Session created with seed {}", seed);
        state
    }

    fn fresh(
        seed: u64,
        tuning: Tuning,
        rng: Pcg32,
        timers: Timers,
        effects: Effects,
        sessions: u32,
    ) -> Self {
        Self {
            seed,
            phase: GamePhase::NotStarted,
            score: 0,
            player: Player::new(&tuning),
            walls: SpikeWalls::new(tuning.slots_per_wall),
            power_up: PowerUpController::new(PowerUpKind::Invincibility),
            timers,
            effects,
            background: BackgroundTier::Calm,
            armed_side: None,
            time_ticks: 0,
            sessions,
            rng,
            contacts: ContactTracker::new(),
            pending_contacts: VecDeque::new(),
            queued_inputs: 0,
            out_of_bounds: false,
            tuning,
        }
    }

    /// Throw the session away and start over in `NotStarted`.
    ///
    /// Pending timers are cancelled first so nothing from the old session can
    /// fire into the new one. Effects already in the outbox are kept.
    pub fn restart(&mut self) {
        let mut timers = std::mem::take(&mut self.timers);
        timers.cancel_all();
        let effects = std::mem::take(&mut self.effects);
        let rng = self.rng.clone();
        let sessions = self.sessions + 1;
        let last_score = self.score;

        *self = Self::fresh(self.seed, self.tuning.clone(), rng, timers, effects, sessions);
        self.sync_presentation();
        log::info!("Restarted (session {}, last score {})", sessions, last_score);
    }

    /// Bring the presentation layer in line with a fresh session
    fn sync_presentation(&mut self) {
        for side in WallSide::BOTH {
            self.walls.wall_mut(side).clear(&mut self.effects);
        }
        self.effects.push(Effect::DespawnPowerUpVisual);
        self.effects.push(Effect::SetScoreDisplay(0));
        self.effects.push(Effect::SetBackgroundTier(BackgroundTier::Calm));
        self.effects.push(Effect::SetPlayerVisual(PlayerVisual::Normal));
        self.effects.push(Effect::FacePlayer(Facing::Right));
    }

    /// Queue a contact from an external physics engine.
    /// Contacts are handled in arrival order on the next tick.
    pub fn push_contact(&mut self, contact: Contact) {
        self.pending_contacts.push_back(contact);
    }

    /// Queue a primary action (tap/click). Only one action is taken per tick.
    pub fn queue_input(&mut self) {
        self.queued_inputs = self.queued_inputs.saturating_add(1);
    }

    /// Simulation time in seconds since the session started
    pub fn time_secs(&self) -> f32 {
        self.time_ticks as f32 * crate::consts::SIM_DT
    }

    /// Deliver and clear all pending effects
    pub fn flush_effects(&mut self, presenter: &mut dyn Presenter) {
        self.effects.flush(presenter);
    }
}
