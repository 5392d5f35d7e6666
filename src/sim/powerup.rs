//! Power-up spawning and timed effects
//!
//! At most one power-up exists per session. It spawns on the wall opposite
//! the one the player is flying toward, waits to be collected, and stays
//! blocked from respawning until its effect window has run out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Category};
use super::effects::{Effect, Effects, PlayerVisual};
use super::player::Player;
use super::spikes::WallSide;
use super::timer::{TimedAction, TimerId, Timers};
use crate::tuning::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Spikes cannot kill the player for a while
    Invincibility,
}

impl PowerUpKind {
    /// How long the effect lasts once collected
    pub fn duration(self, tuning: &Tuning) -> f32 {
        match self {
            PowerUpKind::Invincibility => tuning.invincibility_secs,
        }
    }

    /// Start the effect on the player
    pub fn apply(self, player: &mut Player, effects: &mut Effects) {
        match self {
            PowerUpKind::Invincibility => {
                player.invincible = true;
                player.contact_mask &= !Category::SPIKE;
                player.visual = PlayerVisual::Invincible;
                effects.push(Effect::SetPlayerVisual(PlayerVisual::Invincible));
            }
        }
    }

    /// Undo the effect
    pub fn revert(self, player: &mut Player, effects: &mut Effects) {
        match self {
            PowerUpKind::Invincibility => {
                player.invincible = false;
                player.contact_mask |= Category::SPIKE;
                if player.alive {
                    player.visual = PlayerVisual::Normal;
                    effects.push(Effect::SetPlayerVisual(PlayerVisual::Normal));
                }
            }
        }
    }
}

/// Lifecycle of the session's single power-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerUpState {
    /// Nothing on screen, free to spawn
    Idle,
    /// On screen and collectible
    Spawned { pos: Vec2 },
    /// Collected, effect running until the timer fires
    Active { timer: TimerId },
}

/// Spawn gating and effect lifecycle for the power-up
#[derive(Debug, Clone)]
pub struct PowerUpController {
    pub kind: PowerUpKind,
    state: PowerUpState,
}

impl PowerUpController {
    pub fn new(kind: PowerUpKind) -> Self {
        Self {
            kind,
            state: PowerUpState::Idle,
        }
    }

    pub fn state(&self) -> PowerUpState {
        self.state
    }

    /// True while on screen or while its effect is running
    pub fn is_spawned(&self) -> bool {
        !matches!(self.state, PowerUpState::Idle)
    }

    pub fn is_collectible(&self) -> bool {
        matches!(self.state, PowerUpState::Spawned { .. })
    }

    pub fn position(&self) -> Option<Vec2> {
        match self.state {
            PowerUpState::Spawned { pos } => Some(pos),
            _ => None,
        }
    }

    /// Collision box while collectible
    pub fn bounds(&self, tuning: &Tuning) -> Option<Aabb> {
        self.position().map(|pos| {
            Aabb::from_center_size(pos, Vec2::splat(tuning.power_up_size * tuning.body_inset))
        })
    }

    /// Spawn roll made after each score increment
    pub fn roll<R: Rng>(rng: &mut R, tuning: &Tuning) -> bool {
        rng.random_range(0..=tuning.power_up_roll_max) == tuning.power_up_sentinel
    }

    /// Place the power-up on the wall opposite `toward`.
    ///
    /// No-op while one is already spawned or its effect is still running.
    pub fn try_spawn<R: Rng>(
        &mut self,
        toward: WallSide,
        tuning: &Tuning,
        rng: &mut R,
        effects: &mut Effects,
    ) -> bool {
        if self.is_spawned() {
            return false;
        }

        let x = match toward.opposite() {
            WallSide::Left => tuning.power_up_inset,
            WallSide::Right => tuning.field_width - tuning.power_up_inset,
        };
        let low = tuning.power_up_safe_margin;
        let high = tuning.field_height - tuning.power_up_safe_margin;
        let y = if high > low {
            rng.random_range(low..=high)
        } else {
            tuning.field_height / 2.0
        };

        let pos = Vec2::new(x, y);
        self.state = PowerUpState::Spawned { pos };
        effects.push(Effect::SpawnPowerUpVisual(pos));
        log::debug!("Power-up {:?} spawned at ({:.0}, {:.0})", self.kind, x, y);
        true
    }

    /// Player touched the power-up: start its effect and schedule the end
    pub fn on_collected(
        &mut self,
        player: &mut Player,
        timers: &mut Timers,
        tuning: &Tuning,
        effects: &mut Effects,
    ) -> bool {
        if !self.is_collectible() {
            return false;
        }
        self.kind.apply(player, effects);
        effects.push(Effect::DespawnPowerUpVisual);
        let timer = timers.schedule(self.kind.duration(tuning), TimedAction::EndPowerUp(self.kind));
        self.state = PowerUpState::Active { timer };
        log::info!("Power-up {:?} collected", self.kind);
        true
    }

    /// The effect window scheduled under `handle` elapsed: revert and allow
    /// a new spawn. Handles from any other window are ignored.
    pub fn on_effect_end(
        &mut self,
        handle: TimerId,
        kind: PowerUpKind,
        player: &mut Player,
        effects: &mut Effects,
    ) {
        match self.state {
            PowerUpState::Active { timer } if timer == handle => {}
            _ => {
                log::debug!("Ignoring stale end of {:?}", kind);
                return;
            }
        }
        kind.revert(player, effects);
        self.state = PowerUpState::Idle;
        log::info!("Power-up {:?} ended", kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (PowerUpController, Player, Timers, Tuning, Effects, Pcg32) {
        let tuning = Tuning::default();
        (
            PowerUpController::new(PowerUpKind::Invincibility),
            Player::new(&tuning),
            Timers::new(),
            tuning,
            Effects::new(),
            Pcg32::seed_from_u64(42),
        )
    }

    #[test]
    fn test_spawns_opposite_wall_in_safe_band() {
        let (mut ctrl, _, _, tuning, mut effects, mut rng) = setup();

        assert!(ctrl.try_spawn(WallSide::Right, &tuning, &mut rng, &mut effects));
        let pos = ctrl.position().unwrap();
        assert_eq!(pos.x, tuning.power_up_inset);
        assert!(pos.y >= tuning.power_up_safe_margin);
        assert!(pos.y <= tuning.field_height - tuning.power_up_safe_margin);
        assert_eq!(effects.drain(), vec![Effect::SpawnPowerUpVisual(pos)]);

        let mut other = PowerUpController::new(PowerUpKind::Invincibility);
        other.try_spawn(WallSide::Left, &tuning, &mut rng, &mut effects);
        assert_eq!(
            other.position().unwrap().x,
            tuning.field_width - tuning.power_up_inset
        );
    }

    #[test]
    fn test_only_one_instance() {
        let (mut ctrl, _, _, tuning, mut effects, mut rng) = setup();
        assert!(ctrl.try_spawn(WallSide::Right, &tuning, &mut rng, &mut effects));
        let first = ctrl.position();
        assert!(!ctrl.try_spawn(WallSide::Left, &tuning, &mut rng, &mut effects));
        assert_eq!(ctrl.position(), first);
    }

    #[test]
    fn test_collect_grants_invincibility() {
        let (mut ctrl, mut player, mut timers, tuning, mut effects, mut rng) = setup();
        ctrl.try_spawn(WallSide::Right, &tuning, &mut rng, &mut effects);
        effects.clear();

        assert!(ctrl.on_collected(&mut player, &mut timers, &tuning, &mut effects));
        assert!(player.invincible);
        assert_eq!(player.contact_mask & Category::SPIKE, 0);
        assert_ne!(player.contact_mask & Category::EDGE, 0);
        assert!(ctrl.is_spawned());
        assert!(!ctrl.is_collectible());
        assert_eq!(
            effects.drain(),
            vec![
                Effect::SetPlayerVisual(PlayerVisual::Invincible),
                Effect::DespawnPowerUpVisual
            ]
        );

        // Cannot be collected twice
        assert!(!ctrl.on_collected(&mut player, &mut timers, &tuning, &mut effects));
    }

    #[test]
    fn test_stays_spawned_until_window_ends() {
        let (mut ctrl, mut player, mut timers, tuning, mut effects, mut rng) = setup();
        ctrl.try_spawn(WallSide::Right, &tuning, &mut rng, &mut effects);
        ctrl.on_collected(&mut player, &mut timers, &tuning, &mut effects);

        // Just before the window closes: still blocked
        assert!(timers.advance(tuning.invincibility_secs - 0.1).is_empty());
        assert!(ctrl.is_spawned());
        assert!(!ctrl.try_spawn(WallSide::Right, &tuning, &mut rng, &mut effects));

        let due = timers.advance(0.2);
        assert_eq!(due.len(), 1);
        let (handle, action) = due[0];
        assert_eq!(action, TimedAction::EndPowerUp(PowerUpKind::Invincibility));
        ctrl.on_effect_end(handle, PowerUpKind::Invincibility, &mut player, &mut effects);

        assert!(!ctrl.is_spawned());
        assert!(!player.invincible);
        assert_ne!(player.contact_mask & Category::SPIKE, 0);
        assert_eq!(player.visual, PlayerVisual::Normal);
    }

    #[test]
    fn test_effect_end_ignored_when_idle() {
        let (mut ctrl, mut player, mut timers, _, mut effects, _) = setup();
        let handle = timers.schedule(0.0, TimedAction::EndPowerUp(PowerUpKind::Invincibility));
        ctrl.on_effect_end(handle, PowerUpKind::Invincibility, &mut player, &mut effects);
        assert!(effects.is_empty());
        assert_eq!(ctrl.state(), PowerUpState::Idle);
    }

    #[test]
    fn test_effect_end_requires_matching_handle() {
        let (mut ctrl, mut player, mut timers, tuning, mut effects, mut rng) = setup();
        let stale = timers.schedule(0.0, TimedAction::EndPowerUp(PowerUpKind::Invincibility));
        timers.cancel_all();

        ctrl.try_spawn(WallSide::Right, &tuning, &mut rng, &mut effects);
        ctrl.on_collected(&mut player, &mut timers, &tuning, &mut effects);
        effects.clear();

        ctrl.on_effect_end(stale, PowerUpKind::Invincibility, &mut player, &mut effects);
        assert!(player.invincible);
        assert!(matches!(ctrl.state(), PowerUpState::Active { .. }));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_roll_hits_about_one_in_five() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1234);
        let hits = (0..10_000)
            .filter(|_| PowerUpController::roll(&mut rng, &tuning))
            .count();
        assert!((1700..2300).contains(&hits), "hits = {hits}");
    }
}
