//! Bricker headless runner
//!
//! Plays one round with a paddle that tracks the ball and logs what
//! happens. Usage: `bricker [tuning.json]` (set `RUST_LOG=info` or `debug`).

use bricker::Tuning;
use bricker::consts::SIM_DT;
use bricker::sim::{GameEvent, GameOutcome, GameState, TickInput, tick};

/// Give up after ten simulated minutes
const MAX_TICKS: u64 = 60 * 60 * 10;

fn main() {
    env_logger::init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };

    let mut state = match GameState::new(tuning) {
        Ok(state) => state,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(2);
        }
    };

    let mut bricks_removed = 0;
    let mut outcome = GameOutcome::Playing;
    while outcome == GameOutcome::Playing && state.time_ticks < MAX_TICKS {
        let input = TickInput {
            paddle_dir: track_ball(&state),
        };
        outcome = tick(&mut state, &input, SIM_DT);
        bricks_removed += state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickRemoved { .. }))
            .count();
    }

    log::info!(
        "Finished: {:?} after {} ticks, {} bricks removed, {} left, {} lives",
        outcome,
        state.time_ticks,
        bricks_removed,
        state.brick_count(),
        state.lives()
    );
}

/// Steer the main paddle under the main ball
fn track_ball(state: &GameState) -> f32 {
    let field = &state.playfield;
    let (Some(ball), Some(paddle)) = (field.world.get(field.main_ball), field.world.get(field.main_paddle)) else {
        return 0.0;
    };
    let dx = ball.center.x - paddle.center.x;
    if dx.abs() < paddle.size.x / 4.0 { 0.0 } else { dx.signum() }
}
