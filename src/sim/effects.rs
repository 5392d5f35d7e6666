//! Presentation side effects
//!
//! The simulation never draws or plays anything itself. Every visible or
//! audible consequence is recorded as an [`Effect`] in the state's outbox, in
//! the order it happened, and handed to a [`Presenter`] by the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spikes::WallSide;

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundId {
    /// Player bounced off a wall and flipped
    Flip,
    /// Player hit a spike
    Death,
    /// Power-up collected
    PowerUpPickup,
}

/// Background color tier, driven by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum BackgroundTier {
    /// Light gray
    #[default]
    Calm,
    /// Pale cyan
    Tense,
    /// Black
    Frantic,
}

/// Player sprite state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerVisual {
    #[default]
    Normal,
    Invincible,
    Dead,
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// The wall the player is flying toward
    pub fn wall_ahead(self) -> WallSide {
        match self {
            Facing::Left => WallSide::Left,
            Facing::Right => WallSide::Right,
        }
    }

    /// Horizontal sign of travel
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// A fire-and-forget call into the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    ExtendSpike { side: WallSide, index: usize },
    RetractAllSpikes(WallSide),
    SetBackgroundTier(BackgroundTier),
    SetScoreDisplay(u32),
    ShowGameOver,
    SetPlayerVisual(PlayerVisual),
    FacePlayer(Facing),
    PlaySound(SoundId),
    SpawnPowerUpVisual(Vec2),
    DespawnPowerUpVisual,
}

impl Effect {
    /// Deliver this effect to a presenter
    pub fn apply(&self, presenter: &mut dyn Presenter) {
        match *self {
            Effect::ExtendSpike { side, index } => presenter.extend_spike(side, index),
            Effect::RetractAllSpikes(side) => presenter.retract_all_spikes(side),
            Effect::SetBackgroundTier(tier) => presenter.set_background_tier(tier),
            Effect::SetScoreDisplay(score) => presenter.set_score_display(score),
            Effect::ShowGameOver => presenter.show_game_over(),
            Effect::SetPlayerVisual(visual) => presenter.set_player_visual(visual),
            Effect::FacePlayer(facing) => presenter.face_player(facing),
            Effect::PlaySound(sound) => presenter.play_sound(sound),
            Effect::SpawnPowerUpVisual(pos) => presenter.spawn_power_up_visual(pos),
            Effect::DespawnPowerUpVisual => presenter.despawn_power_up_visual(),
        }
    }
}

/// Presentation collaborator (scene graph, audio, HUD)
pub trait Presenter {
    fn extend_spike(&mut self, side: WallSide, index: usize);
    fn retract_all_spikes(&mut self, side: WallSide);
    fn set_background_tier(&mut self, tier: BackgroundTier);
    fn set_score_display(&mut self, score: u32);
    fn show_game_over(&mut self);
    fn set_player_visual(&mut self, visual: PlayerVisual);
    fn face_player(&mut self, facing: Facing);
    fn play_sound(&mut self, sound: SoundId);
    fn spawn_power_up_visual(&mut self, pos: Vec2);
    fn despawn_power_up_visual(&mut self);
}

/// Ordered outbox of effects produced during a tick
#[derive(Debug, Clone, Default)]
pub struct Effects {
    queue: Vec<Effect>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.queue.push(effect);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.queue.iter()
    }

    /// Take every pending effect, oldest first
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.queue)
    }

    /// Deliver and clear every pending effect
    pub fn flush(&mut self, presenter: &mut dyn Presenter) {
        for effect in self.queue.drain(..) {
            effect.apply(presenter);
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
