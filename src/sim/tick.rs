//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically, plus the
//! state machine transitions it drives.

use super::autopilot;
use super::collision::{Contact, ContactKind, classify, overlapping_contacts};
use super::difficulty::{background_tier_for_score, spike_count_for_score};
use super::effects::{Effect, PlayerVisual, SoundId};
use super::powerup::PowerUpController;
use super::spikes::WallSide;
use super::state::{GamePhase, GameState};
use super::timer::{TimedAction, TimerId};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Primary action (tap/click/space)
    pub action: bool,
    /// Idle/demo mode - autopilot plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    for (handle, action) in state.timers.advance(dt) {
        state.run_timed_action(handle, action);
    }

    // Only the first action per tick counts
    let mut action = input.action || state.queued_inputs > 0;
    state.queued_inputs = 0;
    if input.autopilot && !action {
        action = autopilot::wants_action(state);
    }
    if action && state.on_input() {
        // Fresh session, nothing else to simulate this tick
        return;
    }

    state.player.integrate(dt, &state.tuning);
    state.walls.advance(dt, state.tuning.spike_motion_secs);
    state.check_vertical_bounds();

    if state.phase == GamePhase::Running {
        let overlapping =
            overlapping_contacts(&state.player, &state.walls, &state.power_up, &state.tuning);
        let began = state.contacts.update(overlapping, state.player.contact_mask);
        state.pending_contacts.extend(began);
    }
    while let Some(contact) = state.pending_contacts.pop_front() {
        state.handle_contact(&contact);
    }

    if state.phase == GamePhase::Running && state.player.reached_wall_ahead(&state.tuning) {
        let side = state.player.facing.wall_ahead();
        state.on_boundary_cross(side);
    }
}

impl GameState {
    /// Primary action. Returns true if it restarted the session.
    pub fn on_input(&mut self) -> bool {
        match self.phase {
            GamePhase::NotStarted => {
                self.on_first_input();
                false
            }
            GamePhase::Running if self.player.alive => {
                self.jump();
                false
            }
            GamePhase::Running | GamePhase::Dead => {
                self.restart();
                true
            }
        }
    }

    /// Launch toward the right wall and start the session
    pub fn on_first_input(&mut self) {
        if self.phase != GamePhase::NotStarted {
            return;
        }
        self.player.launch(&self.tuning);
        self.player.gravity_enabled = true;
        self.player.jump(&self.tuning);
        self.phase = GamePhase::Running;
        log::info!("Session {} started (seed {})", self.sessions, self.seed);
    }

    pub fn jump(&mut self) {
        if self.phase == GamePhase::Running && self.player.alive {
            self.player.jump(&self.tuning);
        }
    }

    /// The player reached the wall on `side`.
    /// Ignored unless that is the wall it is flying toward.
    pub fn on_boundary_cross(&mut self, side: WallSide) {
        if self.phase != GamePhase::Running || !self.player.alive {
            return;
        }
        if side != self.player.facing.wall_ahead() {
            return;
        }
        self.add_score();
    }

    /// Score a bounce, escalate, then flip
    pub fn add_score(&mut self) {
        if self.phase != GamePhase::Running || !self.player.alive {
            return;
        }

        if PowerUpController::roll(&mut self.rng, &self.tuning) {
            let toward = self.player.facing.wall_ahead();
            self.power_up
                .try_spawn(toward, &self.tuning, &mut self.rng, &mut self.effects);
        }

        self.score += 1;
        self.effects.push(Effect::SetScoreDisplay(self.score));
        self.player.speed += self.tuning.speed_increment;

        let tier = background_tier_for_score(self.score, &self.tuning);
        if tier != self.background {
            log::debug!("Background tier {:?} at score {}", tier, self.score);
            self.background = tier;
            self.effects.push(Effect::SetBackgroundTier(tier));
        }

        self.flip();
    }

    /// Bounce off the wall just touched and re-arm the opposite one
    pub fn flip(&mut self) {
        let departed = self.player.facing.wall_ahead();
        let approached = departed.opposite();

        self.player.reverse(&self.tuning);
        self.effects.push(Effect::FacePlayer(self.player.facing));

        self.clear_spikes(departed);
        let armed = self.generate_spikes(approached);
        self.effects.push(Effect::PlaySound(SoundId::Flip));

        debug_assert!(self.walls.armed_sides().len() <= 1);
        log::debug!(
            "Flip at score {}: {} spikes on {:?} wall, speed {:.1}",
            self.score,
            armed,
            approached,
            self.player.speed
        );
    }

    /// Arm `spike_count_for_score` random inactive slots on `side`.
    /// Returns how many were armed.
    pub fn generate_spikes(&mut self, side: WallSide) -> usize {
        let count = spike_count_for_score(self.score, &self.tuning) as usize;
        let wall = self.walls.wall_mut(side);
        let mut armed = 0;
        for _ in 0..count {
            let Some(index) = wall.pick_inactive_random(&mut self.rng) else {
                log::warn!(
                    "{:?} wall has no free slot, armed {} of {} spikes",
                    side,
                    armed,
                    count
                );
                break;
            };
            if wall.activate(index, &mut self.effects) {
                armed += 1;
            }
        }
        self.armed_side = Some(side);
        armed
    }

    /// Retract every spike on `side`
    pub fn clear_spikes(&mut self, side: WallSide) {
        self.walls.wall_mut(side).clear(&mut self.effects);
        if self.armed_side == Some(side) {
            self.armed_side = None;
        }
    }

    /// Kill the player. No-op when already dead or invincible.
    pub fn die(&mut self) {
        if !self.player.alive || self.player.invincible {
            return;
        }
        self.player.alive = false;
        self.phase = GamePhase::Dead;
        self.effects.push(Effect::ShowGameOver);
        self.player.knock_back(&self.tuning);
        self.player.visual = PlayerVisual::Dead;
        self.effects.push(Effect::SetPlayerVisual(PlayerVisual::Dead));
        self.effects.push(Effect::PlaySound(SoundId::Death));
        log::info!("Player died at score {}", self.score);
    }

    /// Route a contact to its reaction
    pub fn handle_contact(&mut self, contact: &Contact) {
        if self.phase != GamePhase::Running {
            return;
        }
        match classify(contact) {
            ContactKind::PlayerEdge(side) => {
                log::trace!("Player touched {:?} edge", side);
            }
            ContactKind::PlayerSpike(body) => {
                log::debug!("Player touched {:?}", body);
                self.die();
            }
            ContactKind::PlayerPowerUp => {
                if !self.player.alive {
                    return;
                }
                let collected = self.power_up.on_collected(
                    &mut self.player,
                    &mut self.timers,
                    &self.tuning,
                    &mut self.effects,
                );
                if collected {
                    self.effects.push(Effect::PlaySound(SoundId::PowerUpPickup));
                }
            }
            ContactKind::Ignored => {}
        }
    }

    pub(crate) fn run_timed_action(&mut self, handle: TimerId, action: TimedAction) {
        match action {
            TimedAction::EndPowerUp(kind) => {
                self.power_up
                    .on_effect_end(handle, kind, &mut self.player, &mut self.effects);
            }
        }
    }

    /// Keep the player inside the field vertically, warning once per excursion
    pub(crate) fn check_vertical_bounds(&mut self) {
        let half = self.tuning.player_size / 2.0;
        let max_y = self.tuning.field_height - half;
        let y = self.player.pos.y;
        if y >= half && y <= max_y {
            self.out_of_bounds = false;
            return;
        }
        if !self.out_of_bounds {
            log::warn!("Player left the field vertically at y = {:.1}", y);
            self.out_of_bounds = true;
        }
        self.player.pos.y = y.clamp(half, max_y);
        self.player.vel.y = 0.0;
    }
}
