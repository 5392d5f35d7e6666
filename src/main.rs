//! Spike Wall - headless runner
//!
//! Plays one autopilot session on a fixed timestep, narrating presentation
//! effects through the log, and prints a JSON summary when the player dies.
//!
//! Usage: `spike-wall [tuning.json]`, seed from `SPIKE_WALL_SEED`.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::Serialize;
use spike_wall::Tuning;
use spike_wall::consts::{MAX_SUBSTEPS, SIM_DT};
use spike_wall::sim::{
    BackgroundTier, Facing, GamePhase, GameState, PlayerVisual, Presenter, SoundId, TickInput,
    WallSide, tick,
};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after ten minutes of play
const MAX_FRAMES: u32 = 60 * 60 * 10;

/// Presenter that narrates effects through the log
#[derive(Debug, Default)]
struct LogPresenter {
    spikes_extended: u32,
    power_ups_spawned: u32,
}

impl Presenter for LogPresenter {
    fn extend_spike(&mut self, side: WallSide, index: usize) {
        self.spikes_extended += 1;
        log::debug!("extend spike {:?}[{}]", side, index);
    }

    fn retract_all_spikes(&mut self, side: WallSide) {
        log::debug!("retract {:?} wall", side);
    }

    fn set_background_tier(&mut self, tier: BackgroundTier) {
        log::info!("Background -> {:?}", tier);
    }

    fn set_score_display(&mut self, score: u32) {
        log::info!("Score: {}", score);
    }

    fn show_game_over(&mut self) {
        log::info!("GAME OVER");
    }

    fn set_player_visual(&mut self, visual: PlayerVisual) {
        log::debug!("player visual {:?}", visual);
    }

    fn face_player(&mut self, facing: Facing) {
        log::trace!("player faces {:?}", facing);
    }

    fn play_sound(&mut self, sound: SoundId) {
        log::trace!("sound {:?}", sound);
    }

    fn spawn_power_up_visual(&mut self, pos: Vec2) {
        self.power_ups_spawned += 1;
        log::info!("Power-up at ({:.0}, {:.0})", pos.x, pos.y);
    }

    fn despawn_power_up_visual(&mut self) {
        log::debug!("power-up hidden");
    }
}

/// Final report printed on exit
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    score: u32,
    phase: GamePhase,
    ticks: u64,
    seconds: f32,
    spikes_extended: u32,
    power_ups_spawned: u32,
}

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    presenter: LogPresenter,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            accumulator: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            presenter: LogPresenter::default(),
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.action = false;
        }

        self.state.flush_effects(&mut self.presenter);
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.state.seed,
            score: self.state.score,
            phase: self.state.phase,
            ticks: self.state.time_ticks,
            seconds: self.state.time_secs(),
            spikes_extended: self.presenter.spikes_extended,
            power_ups_spawned: self.presenter.power_ups_spawned,
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn seed_from_env() -> u64 {
    match std::env::var("SPIKE_WALL_SEED") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            log::warn!("Ignoring SPIKE_WALL_SEED={:?}: {}", raw, e);
            time_seed()
        }),
        Err(_) => time_seed(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spike Wall (headless) starting...");

    let tuning_path = std::env::args().nth(1).map(PathBuf::from);
    let tuning = Tuning::load_or_default(tuning_path.as_deref());
    let seed = seed_from_env();
    log::info!("Game initialized with seed: {}", seed);

    let mut game = Game::new(seed, tuning);
    for _ in 0..MAX_FRAMES {
        game.update(FRAME_DT);
        if game.state.phase == GamePhase::Dead {
            break;
        }
    }
    if game.state.phase != GamePhase::Dead {
        log::warn!("Stopped after {} frames without a death", MAX_FRAMES);
    }

    match serde_json::to_string_pretty(&game.summary()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode run summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only; embed the library for web builds
}
