//! Randomized brick strategy construction
//!
//! Half the bricks (in expectation) stay plain. The rest get one of four
//! single effects, or a combined chain of several effects. A combined draw
//! inside a combined chain raises the number of effects to collect by one,
//! up to `combined_max_effects`; once the cap is reached only single effects
//! can be drawn.

use glam::Vec2;
use rand::Rng;

use super::entity::Assets;
use super::strategy::{
    BoxedStrategy, Combined, Decorated, ExtraBalls, ExtraPaddle, FallingHeart, StrategyKind, Turbo,
    chain_kinds,
};
use crate::consts::MOCK_BALL_COUNT;
use crate::tuning::Tuning;

/// Builds one strategy chain per brick
#[derive(Debug, Clone)]
pub struct StrategyFactory {
    special_behavior_threshold: f64,
    combined_initial_effects: u32,
    combined_max_effects: u32,
    extra_balls: ExtraBalls,
    extra_paddle: ExtraPaddle,
    turbo: Turbo,
    falling_heart: FallingHeart,
}

impl StrategyFactory {
    pub fn new(tuning: &Tuning, assets: &Assets) -> Self {
        Self {
            special_behavior_threshold: tuning.special_behavior_threshold,
            combined_initial_effects: tuning.combined_initial_effects,
            combined_max_effects: tuning.combined_max_effects,
            extra_balls: ExtraBalls {
                count: MOCK_BALL_COUNT,
                radius: tuning.mock_ball_radius,
                speed: tuning.mock_ball_speed,
                visual: assets.mock_ball,
            },
            extra_paddle: ExtraPaddle {
                center: Vec2::new(tuning.window_width, tuning.window_height) / 2.0,
                size: Vec2::new(tuning.extra_paddle_width, tuning.extra_paddle_height),
                visual: assets.paddle,
            },
            turbo: Turbo {
                speed_factor: tuning.turbo_speed_factor,
                budget: tuning.turbo_collision_budget,
                visual: assets.turbo_ball,
            },
            falling_heart: FallingHeart {
                size: tuning.heart_size,
                speed: tuning.falling_heart_speed,
                visual: assets.heart,
            },
        }
    }

    /// Decorate `base` (a fresh terminal strategy) with random effects
    ///
    /// Whatever is drawn, the returned chain ends at `base`.
    pub fn create_strategy<R: Rng + ?Sized>(&self, base: BoxedStrategy, rng: &mut R) -> BoxedStrategy {
        if rng.random::<f64>() >= self.special_behavior_threshold {
            return base;
        }
        let kind = random_kind(rng, true);
        let strategy = self.build(kind, base, rng);
        log::debug!("Brick strategy: {:?}", chain_kinds(strategy.as_ref()));
        strategy
    }

    fn build<R: Rng + ?Sized>(&self, kind: StrategyKind, base: BoxedStrategy, rng: &mut R) -> BoxedStrategy {
        match kind {
            StrategyKind::Combined => self.build_combined(base, rng),
            _ => self.decorate(kind, base),
        }
    }

    /// Wrap `base` in a single effect decorator (other kinds return `base`)
    pub fn decorate(&self, kind: StrategyKind, base: BoxedStrategy) -> BoxedStrategy {
        match kind {
            StrategyKind::ExtraBalls => Box::new(Decorated::new(self.extra_balls, base)),
            StrategyKind::ExtraPaddle => Box::new(Decorated::new(self.extra_paddle, base)),
            StrategyKind::Turbo => Box::new(Decorated::new(self.turbo, base)),
            StrategyKind::FallingHeart => Box::new(Decorated::new(self.falling_heart, base)),
            StrategyKind::Basic | StrategyKind::Combined => base,
        }
    }

    fn build_combined<R: Rng + ?Sized>(&self, base: BoxedStrategy, rng: &mut R) -> BoxedStrategy {
        let mut required = self.combined_initial_effects;
        let mut applied = 0;
        let mut chain = base;

        while applied < required {
            let kind = random_kind(rng, required < self.combined_max_effects);
            if kind == StrategyKind::Combined {
                required += 1;
                continue;
            }
            chain = self.decorate(kind, chain);
            applied += 1;
        }
        Box::new(Combined::new(chain))
    }
}

/// Uniform draw over the single effects, plus Combined when allowed
fn random_kind<R: Rng + ?Sized>(rng: &mut R, include_combined: bool) -> StrategyKind {
    let effects = StrategyKind::EFFECTS.len();
    let choices = if include_combined { effects + 1 } else { effects };
    match rng.random_range(0..choices) {
        i if i < effects => StrategyKind::EFFECTS[i],
        _ => StrategyKind::Combined,
    }
}
