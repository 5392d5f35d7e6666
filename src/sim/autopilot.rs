//! Idle/demo mode: synthesises the primary action
//!
//! Starts a session when waiting and, while running, keeps the player
//! bobbing around the middle of the widest safe gap on the wall ahead.
//! It never restarts a dead session.

use super::state::{GamePhase, GameState};
use crate::tuning::Tuning;

/// Height gained by a jump from rest under gravity
pub fn jump_apex(tuning: &Tuning) -> f32 {
    let launch = tuning.jump_impulse * tuning.impulse_scale;
    let gravity = tuning.gravity_accel().abs();
    if gravity <= f32::EPSILON {
        return 0.0;
    }
    launch * launch / (2.0 * gravity)
}

/// Centre of the widest vertical gap between armed spikes on the wall ahead,
/// inside the band left open by the kill zones
pub fn safe_height(state: &GameState) -> f32 {
    let tuning = &state.tuning;
    let wall = state.walls.wall(state.player.facing.wall_ahead());
    let half = tuning.player_size * tuning.body_inset / 2.0;
    let floor = tuning.kill_margin + half;
    let ceiling = tuning.field_height - tuning.kill_margin - half;

    let mut best = (floor, floor);
    let mut low = floor;
    for index in wall.active_indices() {
        let bottom = tuning.slot_y(index) - half;
        if bottom - low > best.1 - best.0 {
            best = (low, bottom);
        }
        low = low.max(tuning.slot_y(index) + tuning.spike_height + half);
    }
    if ceiling - low > best.1 - best.0 {
        best = (low, ceiling);
    }
    (best.0 + best.1) / 2.0
}

/// Whether the autopilot presses the button this tick
pub fn wants_action(state: &GameState) -> bool {
    match state.phase {
        GamePhase::NotStarted => true,
        GamePhase::Dead => false,
        GamePhase::Running => {
            let player = &state.player;
            if !player.alive || player.vel.y > 0.0 {
                return false;
            }
            let apex = jump_apex(&state.tuning);
            player.pos.y < safe_height(state) - apex / 2.0
        }
    }
}
