//! Game state and shared simulation types
//!
//! [`Playfield`] holds everything a brick strategy may touch during a
//! collision. [`GameState`] adds the per-brick strategy chains on top.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::TurboState;
use super::entity::{Assets, Entity, EntityId, EntityKind, Layer, Sound, World};
use super::factory::StrategyFactory;
use super::health::HealthBar;
use super::paddle::ExtraPaddleSlot;
use super::strategy::{Basic, BoxedStrategy, CollisionStrategy, Hit};
use crate::tuning::{Tuning, TuningResult};

/// Bricks still standing. Reaching zero wins the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickCounter(u32);

impl BrickCounter {
    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 += 1;
    }

    /// Count one brick as destroyed. Never goes below zero.
    pub fn decrement(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        true
    }
}

/// Events for the frontend (audio, effects), drained after each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlaySound(Sound),
    BrickRemoved { id: EntityId },
    TurboStarted,
    TurboEnded,
    ExtraPaddleSpawned { id: EntityId },
    ExtraPaddleExpired { id: EntityId },
    LifeGained { lives: u32 },
    LifeLost { lives: u32 },
    BallReset,
}

/// Result of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    Playing,
    Won,
    Lost,
}

/// Shared mutable state of one playfield
#[derive(Debug, Clone)]
pub struct Playfield {
    pub tuning: Tuning,
    pub assets: Assets,
    pub world: World,
    pub bricks: BrickCounter,
    pub health: HealthBar,
    pub extra_paddle: ExtraPaddleSlot,
    pub main_ball: EntityId,
    pub main_paddle: EntityId,
    pub rng: Pcg32,
    pub events: Vec<GameEvent>,
}

impl Playfield {
    /// Walls, main ball, main paddle and health bar; no bricks yet
    pub fn new(tuning: Tuning, assets: Assets) -> Self {
        let seed = tuning.seed.unwrap_or_else(rand::random);
        Self::with_rng(tuning, assets, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(tuning: Tuning, assets: Assets, mut rng: Pcg32) -> Self {
        let mut world = World::new();
        let (w, h, border) = (tuning.window_width, tuning.window_height, tuning.border_width);

        // Left, right and top walls; the bottom is open
        for (center, size) in [
            (Vec2::new(border / 2.0, h / 2.0), Vec2::new(border, h)),
            (Vec2::new(w - border / 2.0, h / 2.0), Vec2::new(border, h)),
            (Vec2::new(w / 2.0, border / 2.0), Vec2::new(w, border)),
        ] {
            world.add(Entity::new(EntityKind::Wall, center, size, assets.wall), Layer::Default);
        }

        let health = HealthBar::new(&mut world, &tuning, assets.heart);

        let ball = Entity::new(
            EntityKind::Ball(TurboState::Inactive),
            Vec2::new(w, h) / 2.0,
            Vec2::splat(tuning.ball_radius),
            assets.ball,
        )
        .with_velocity(serve_velocity(&mut rng, tuning.ball_speed));
        let main_ball = world.add(ball, Layer::Default);

        let paddle = Entity::new(
            EntityKind::Paddle,
            Vec2::new(w / 2.0, h - tuning.paddle_offset_y),
            Vec2::new(tuning.paddle_width, tuning.paddle_height),
            assets.paddle,
        );
        let main_paddle = world.add(paddle, Layer::Default);

        Self {
            tuning,
            assets,
            world,
            bricks: BrickCounter::default(),
            health,
            extra_paddle: ExtraPaddleSlot::new(),
            main_ball,
            main_paddle,
            rng,
            events: Vec::new(),
        }
    }

    /// Put the main ball back in the center with a fresh diagonal velocity
    ///
    /// A lost ball also loses its turbo: the serve is always at base speed.
    pub fn reset_ball(&mut self) {
        let center = Vec2::new(self.tuning.window_width, self.tuning.window_height) / 2.0;
        let vel = serve_velocity(&mut self.rng, self.tuning.ball_speed);
        let Some(ball) = self.world.get_mut(self.main_ball) else {
            return;
        };
        if let EntityKind::Ball(turbo) = &mut ball.kind {
            if let TurboState::Active { saved_visual, .. } = *turbo {
                *turbo = TurboState::Inactive;
                ball.visual = saved_visual;
                log::info!("Turbo off (ball lost)");
                self.events.push(GameEvent::TurboEnded);
            }
        }
        ball.center = center;
        ball.vel = vel;
        self.events.push(GameEvent::BallReset);
    }
}

/// Diagonal velocity with a random sign on each axis
fn serve_velocity<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> Vec2 {
    let x = if rng.random::<bool>() { speed } else { -speed };
    let y = if rng.random::<bool>() { speed } else { -speed };
    Vec2::new(x, y)
}

/// A playfield plus the strategy chain of every brick
#[derive(Debug)]
pub struct GameState {
    pub playfield: Playfield,
    pub outcome: GameOutcome,
    /// Simulation tick counter
    pub time_ticks: u64,
    factory: StrategyFactory,
    strategies: BTreeMap<EntityId, BoxedStrategy>,
}

impl GameState {
    /// Validate the tuning and build a full level
    pub fn new(tuning: Tuning) -> TuningResult<Self> {
        Self::with_assets(tuning, Assets::default())
    }

    pub fn with_assets(tuning: Tuning, assets: Assets) -> TuningResult<Self> {
        tuning.validate()?;
        let mut state = Self::empty(Playfield::new(tuning, assets));
        super::tick::build_level(&mut state);
        Ok(state)
    }

    /// A playfield with no bricks (hosts and tests add their own)
    pub fn empty(playfield: Playfield) -> Self {
        let factory = StrategyFactory::new(&playfield.tuning, &playfield.assets);
        Self {
            playfield,
            outcome: GameOutcome::Playing,
            time_ticks: 0,
            factory,
            strategies: BTreeMap::new(),
        }
    }

    /// Add a brick with a randomly decorated strategy
    pub fn add_brick(&mut self, center: Vec2, size: Vec2) -> EntityId {
        let strategy = self
            .factory
            .create_strategy(Box::new(Basic), &mut self.playfield.rng);
        self.add_brick_with(center, size, strategy)
    }

    /// Add a brick with the given strategy chain
    pub fn add_brick_with(&mut self, center: Vec2, size: Vec2, strategy: BoxedStrategy) -> EntityId {
        let brick = Entity::new(EntityKind::Brick, center, size, self.playfield.assets.brick);
        let id = self.playfield.world.add(brick, Layer::Static);
        self.playfield.bricks.increment();
        self.strategies.insert(id, strategy);
        id
    }

    pub fn strategy(&self, brick: EntityId) -> Option<&dyn CollisionStrategy> {
        self.strategies.get(&brick).map(|s| s.as_ref())
    }

    /// Run a brick's strategy for a strike by `other`
    ///
    /// Returns false if the brick has no strategy (unknown, or already
    /// destroyed). The chain is dropped once its brick leaves the world.
    pub fn strike_brick(&mut self, brick: EntityId, brick_center: Vec2, other: EntityId) -> bool {
        let Some(strategy) = self.strategies.get(&brick) else {
            return false;
        };
        let hit = Hit {
            brick,
            brick_center,
            other,
        };
        strategy.on_collision(&mut self.playfield, &hit);
        if !self.playfield.world.contains(brick) {
            self.strategies.remove(&brick);
        }
        true
    }

    pub fn brick_count(&self) -> u32 {
        self.playfield.bricks.value()
    }

    pub fn lives(&self) -> u32 {
        self.playfield.health.lives()
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.playfield.events)
    }

    /// Start over with a fresh level and the same tuning
    pub fn restart(&mut self) {
        // The extra paddle reference outlives the old playfield unless cleared
        self.playfield.extra_paddle.reset(&mut self.playfield.world);

        let tuning = self.playfield.tuning.clone();
        let assets = self.playfield.assets;
        let rng = self.playfield.rng.clone();
        self.playfield = Playfield::with_rng(tuning, assets, rng);
        self.strategies.clear();
        self.outcome = GameOutcome::Playing;
        self.time_ticks = 0;
        super::tick::build_level(self);
        log::info!("Game restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_brick_counter_never_negative() {
        let mut counter = BrickCounter::default();
        assert!(!counter.decrement());
        counter.increment();
        assert!(counter.decrement());
        assert!(!counter.decrement());
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn test_playfield_setup() {
        let field = Playfield::new(Tuning::seeded(1), Assets::default());
        let ball = field.world.get(field.main_ball).unwrap();
        assert_eq!(ball.center, Vec2::new(350.0, 250.0));
        assert!((ball.vel.x.abs() - 200.0).abs() < 1e-5);
        assert!((ball.vel.y.abs() - 200.0).abs() < 1e-5);

        let paddle = field.world.get(field.main_paddle).unwrap();
        assert_eq!(paddle.center, Vec2::new(350.0, 470.0));

        assert_eq!(field.world.iter().filter(|e| e.kind == EntityKind::Wall).count(), 3);
        assert_eq!(field.health.lives(), 3);
        assert_eq!(field.bricks.value(), 0);
    }

    #[test]
    fn test_single_basic_brick_end_to_end() {
        let field = Playfield::new(Tuning::seeded(5), Assets::default());
        let mut state = GameState::empty(field);
        let center = Vec2::new(100.0, 40.0);
        let brick = state.add_brick_with(center, Vec2::new(80.0, 15.0), Box::new(Basic));
        assert_eq!(state.brick_count(), 1);
        let entities_before = state.playfield.world.len();

        let ball = state.playfield.main_ball;
        assert!(state.strike_brick(brick, center, ball));
        assert_eq!(state.brick_count(), 0);
        assert!(!state.playfield.world.contains(brick));
        // Nothing spawned, only the brick is gone
        assert_eq!(state.playfield.world.len(), entities_before - 1);
        assert!(state.strategy(brick).is_none());
        assert_eq!(state.drain_events(), vec![GameEvent::BrickRemoved { id: brick }]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_new_validates_tuning() {
        let tuning = Tuning {
            brick_rows: 0,
            ..Tuning::seeded(1)
        };
        assert!(GameState::new(tuning).is_err());
    }

    #[test]
    fn test_restart_clears_extra_paddle() {
        let mut state = GameState::new(Tuning::seeded(9)).unwrap();
        let field = &mut state.playfield;
        let id = field
            .extra_paddle
            .spawn(&mut field.world, Vec2::new(350.0, 250.0), Vec2::new(100.0, 15.0), field.assets.paddle);
        assert!(id.is_some());

        state.restart();
        assert_eq!(state.playfield.extra_paddle.current(), None);
        assert_eq!(state.outcome, GameOutcome::Playing);
        assert_eq!(state.brick_count(), 40);
        assert_eq!(state.lives(), 3);
    }

    proptest! {
        #[test]
        fn prop_any_chain_removes_brick_once(seed in any::<u64>()) {
            let mut state = GameState::empty(Playfield::new(Tuning::seeded(seed), Assets::default()));
            let center = Vec2::new(350.0, 60.0);
            let brick = state.add_brick(center, Vec2::new(80.0, 15.0));
            let ball = state.playfield.main_ball;

            prop_assert!(state.strike_brick(brick, center, ball));
            prop_assert_eq!(state.brick_count(), 0);
            prop_assert!(!state.playfield.world.contains(brick));
            let removed = state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::BrickRemoved { .. }))
                .count();
            prop_assert_eq!(removed, 1);

            // A second strike finds nothing left to run
            prop_assert!(!state.strike_brick(brick, center, ball));
            prop_assert_eq!(state.brick_count(), 0);
        }
    }
}
