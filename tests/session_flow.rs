//! End-to-end session tests driven through the public tick API.
//!
//! Gravity is switched off after launch so the player flies level; before
//! each wall approach the player is parked at a height of our choosing,
//! either in a free slot (survive) or on an armed one (die).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use spike_wall::Tuning;
use spike_wall::consts::SIM_DT;
use spike_wall::sim::{
    Body, Contact, Effect, Facing, GamePhase, GameState, SoundId, TickInput, WallSide,
    spike_count_for_score, tick,
};

/// Ticks to let the player clear the wall it just bounced off
const CLEAR_TICKS: usize = 30;
/// Upper bound on ticks for one wall-to-wall pass
const MAX_PASS_TICKS: usize = 2_000;

fn step(state: &mut GameState) {
    tick(state, &TickInput::default(), SIM_DT);
}

fn start(seed: u64) -> GameState {
    let mut state = GameState::new(seed, Tuning::default());
    state.queue_input();
    step(&mut state);
    hold_altitude(&mut state);
    state
}

fn hold_altitude(state: &mut GameState) {
    state.player.gravity_enabled = false;
    state.player.vel.y = 0.0;
}

/// Vertical centre of a slot on any wall
fn slot_centre(state: &GameState, index: usize) -> f32 {
    state.tuning.slot_y(index) + state.tuning.spike_height / 2.0
}

/// Move the player level with a free slot on the wall ahead, away from the
/// power-up if one is waiting
fn park_in_gap(state: &mut GameState) {
    let half = state.tuning.player_size * state.tuning.body_inset / 2.0;
    let wall = state.walls.wall(state.player.facing.wall_ahead());
    let pickup = state.power_up.bounds(&state.tuning);
    let index = (0..wall.len())
        .find(|&i| {
            let y = slot_centre(state, i);
            !wall.is_active(i)
                && pickup.is_none_or(|b| y + half < b.min.y || y - half > b.max.y)
        })
        .expect("a free slot away from the power-up");
    state.player.pos.y = slot_centre(state, index);
}

/// Move the player level with an armed slot on the wall ahead
fn park_on_spike(state: &mut GameState) {
    let wall = state.walls.wall(state.player.facing.wall_ahead());
    let index = wall.active_indices()[0];
    state.player.pos.y = slot_centre(state, index);
}

/// Fly to the wall ahead, parking with `park` once clear of the last wall.
/// Returns once the score changes or the phase leaves `Running`.
fn fly(state: &mut GameState, park: fn(&mut GameState)) {
    let score = state.score;
    for _ in 0..CLEAR_TICKS {
        step(state);
    }
    park(state);
    for _ in 0..MAX_PASS_TICKS {
        step(state);
        if state.score != score || state.phase != GamePhase::Running {
            return;
        }
    }
    panic!("player never reached the {:?} wall", state.player.facing.wall_ahead());
}

#[test]
fn full_session_scenario() {
    let mut state = GameState::new(2024, Tuning::default());
    assert_eq!(state.phase, GamePhase::NotStarted);

    // First input: running, moving right
    state.queue_input();
    step(&mut state);
    hold_altitude(&mut state);
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.player.facing, Facing::Right);
    assert!(state.player.vel.x > 0.0);

    // Reach the right wall: score 1, left wall armed with two spikes
    fly(&mut state, park_in_gap);
    assert_eq!(state.score, 1);
    assert_eq!(state.player.facing, Facing::Left);
    assert_eq!(state.walls.left.active_count(), 2);
    assert_eq!(state.walls.right.active_count(), 0);
    assert_eq!(state.armed_side, Some(WallSide::Left));

    // Keep bouncing to score 5
    while state.score < 5 {
        fly(&mut state, park_in_gap);
        assert_eq!(state.phase, GamePhase::Running, "died at score {}", state.score);
        let ahead = state.player.facing.wall_ahead();
        let expected = spike_count_for_score(state.score, &state.tuning) as usize;
        assert_eq!(state.walls.wall(ahead).active_count(), expected);
        assert_eq!(state.walls.wall(ahead.opposite()).active_count(), 0);
    }
    let ahead = state.player.facing.wall_ahead();
    assert_eq!(state.walls.wall(ahead).active_count(), 3);
    assert!(!state.player.invincible);

    // Fly into an armed spike
    state.effects.clear();
    fly(&mut state, park_on_spike);
    assert_eq!(state.phase, GamePhase::Dead);
    assert_eq!(state.score, 5);
    assert!(!state.player.alive);
    let effects = state.effects.drain();
    assert!(effects.contains(&Effect::ShowGameOver));
    assert!(effects.contains(&Effect::PlaySound(SoundId::Death)));

    // Next input restarts
    state.queue_input();
    step(&mut state);
    assert_eq!(state.phase, GamePhase::NotStarted);
    assert_eq!(state.score, 0);
    assert!(state.walls.armed_sides().is_empty());
    assert!(!state.power_up.is_spawned());
    assert!(!state.player.invincible);
    assert_eq!(state.sessions, 1);
}

#[test]
fn flip_effects_in_order() {
    let mut state = start(11);
    state.effects.clear();
    fly(&mut state, park_in_gap);

    let effects: Vec<Effect> = state
        .effects
        .drain()
        .into_iter()
        .filter(|e| !matches!(e, Effect::SpawnPowerUpVisual(_)))
        .collect();
    assert_eq!(effects[0], Effect::SetScoreDisplay(1));
    assert_eq!(effects[1], Effect::FacePlayer(Facing::Left));
    assert_eq!(effects[2], Effect::RetractAllSpikes(WallSide::Right));
    assert!(matches!(
        effects[3],
        Effect::ExtendSpike {
            side: WallSide::Left,
            ..
        }
    ));
    assert!(matches!(
        effects[4],
        Effect::ExtendSpike {
            side: WallSide::Left,
            ..
        }
    ));
    assert_eq!(effects[5], Effect::PlaySound(SoundId::Flip));
}

#[test]
fn external_contacts_drive_the_router() {
    let mut state = start(7);
    let mut rng = Pcg32::seed_from_u64(7);
    let toward = state.player.facing.wall_ahead();
    assert!(
        state
            .power_up
            .try_spawn(toward, &state.tuning, &mut rng, &mut state.effects)
    );

    state.push_contact(Contact::new(Body::PowerUp, Body::Player));
    step(&mut state);
    assert!(state.player.invincible);
    assert!(state.power_up.is_spawned());

    // Spike contact is harmless while invincible
    state.push_contact(Contact::new(
        Body::Player,
        Body::WallSpike {
            side: WallSide::Right,
            index: 3,
        },
    ));
    step(&mut state);
    assert_eq!(state.phase, GamePhase::Running);

    // Let the window run out, then the same contact kills
    let window = (state.tuning.invincibility_secs / SIM_DT).ceil() as usize + 1;
    for _ in 0..window {
        state.player.pos.x = state.tuning.field_width / 2.0;
        step(&mut state);
    }
    assert!(!state.player.invincible);
    assert!(!state.power_up.is_spawned());

    state.push_contact(Contact::new(
        Body::WallSpike {
            side: WallSide::Right,
            index: 3,
        },
        Body::Player,
    ));
    step(&mut state);
    assert_eq!(state.phase, GamePhase::Dead);
}

#[test]
fn same_seed_same_session() {
    let run = |seed: u64| {
        let mut state = start(seed);
        for _ in 0..4 {
            fly(&mut state, park_in_gap);
        }
        (
            state.score,
            state.walls.left.active_indices(),
            state.walls.right.active_indices(),
            state.power_up.position(),
        )
    };
    assert_eq!(run(555), run(555));
}
