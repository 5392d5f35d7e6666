//! The bouncing player body

use glam::Vec2;

use super::collision::{Aabb, Category};
use super::effects::{Facing, PlayerVisual};
use crate::tuning::Tuning;

/// Default contact mask: walls, spikes and pickups
pub const PLAYER_CONTACT_MASK: u32 = Category::EDGE | Category::SPIKE | Category::POWER_UP;

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    /// Centre position (y up, origin bottom-left)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Direction of horizontal travel
    pub facing: Facing,
    pub invincible: bool,
    /// Horizontal impulse applied on every flip
    pub speed: f32,
    pub alive: bool,
    /// Categories this body reports contacts with
    pub contact_mask: u32,
    pub visual: PlayerVisual,
    /// Gravity stays off until the first input
    pub gravity_enabled: bool,
}

impl Player {
    /// A fresh player at the centre of the field, facing right
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.field() * 0.5,
            vel: Vec2::ZERO,
            facing: Facing::Right,
            invincible: false,
            speed: tuning.start_speed,
            alive: true,
            contact_mask: PLAYER_CONTACT_MASK,
            visual: PlayerVisual::Normal,
            gravity_enabled: false,
        }
    }

    /// Apply an impulse (velocity change scaled by `impulse_scale`)
    pub fn apply_impulse(&mut self, impulse: Vec2, tuning: &Tuning) {
        self.vel += impulse * tuning.impulse_scale;
    }

    /// Zero vertical velocity and kick upward
    pub fn jump(&mut self, tuning: &Tuning) {
        self.vel.y = 0.0;
        self.apply_impulse(Vec2::new(0.0, tuning.jump_impulse), tuning);
    }

    /// Horizontal kick of the current speed in the facing direction
    pub fn launch(&mut self, tuning: &Tuning) {
        self.apply_impulse(Vec2::new(self.speed * self.facing.sign(), 0.0), tuning);
    }

    /// Reverse horizontal travel at the current speed
    pub fn reverse(&mut self, tuning: &Tuning) {
        self.vel.x = 0.0;
        self.facing = self.facing.flipped();
        self.launch(tuning);
    }

    /// Kick against the direction of travel
    pub fn knock_back(&mut self, tuning: &Tuning) {
        let dir = -self.facing.sign();
        self.apply_impulse(Vec2::new(tuning.knockback_impulse * dir, 0.0), tuning);
    }

    /// Integrate one step and keep the body between the side walls
    pub fn integrate(&mut self, dt: f32, tuning: &Tuning) {
        if self.gravity_enabled {
            self.vel.y += tuning.gravity_accel() * dt;
        }
        self.pos += self.vel * dt;

        let half = tuning.player_size / 2.0;
        let max_x = tuning.field_width - half;
        if self.pos.x < half {
            self.pos.x = half;
            self.vel.x = self.vel.x.max(0.0);
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = self.vel.x.min(0.0);
        }
    }

    /// Full sprite extent
    pub fn sprite_bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::from_center_size(self.pos, Vec2::splat(tuning.player_size))
    }

    /// Collision box (sprite shrunk by `body_inset`)
    pub fn body_bounds(&self, tuning: &Tuning) -> Aabb {
        Aabb::from_center_size(self.pos, Vec2::splat(tuning.player_size * tuning.body_inset))
    }

    /// Whether the sprite reached the wall it is flying toward
    pub fn reached_wall_ahead(&self, tuning: &Tuning) -> bool {
        let half = tuning.player_size / 2.0;
        match self.facing {
            Facing::Right => self.pos.x >= tuning.field_width - half,
            Facing::Left => self.pos.x <= half,
        }
    }
}
