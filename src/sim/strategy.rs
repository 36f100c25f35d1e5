//! Brick collision strategies
//!
//! Every brick owns one strategy chain: zero or more effect decorators
//! wrapped around a terminal [`Basic`] strategy that removes the brick.
//! A decorator always runs its own effect and then delegates, so every
//! effect in the chain fires exactly once per strike and the brick is
//! removed (and counted) at most once.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{activate_turbo, spawn_mock_balls};
use super::entity::{EntityId, Layer, Visual};
use super::health::spawn_falling_heart;
use super::state::{GameEvent, Playfield};

/// One brick being struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub brick: EntityId,
    /// Last known center of the brick (it may already be gone)
    pub brick_center: Vec2,
    /// What struck the brick
    pub other: EntityId,
}

/// Strategy variants, as they appear in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Basic,
    ExtraBalls,
    ExtraPaddle,
    Turbo,
    FallingHeart,
    /// Marker around a chain of several effects
    Combined,
}

impl StrategyKind {
    /// Single-effect kinds, in draw order
    pub const EFFECTS: [StrategyKind; 4] = [
        StrategyKind::ExtraBalls,
        StrategyKind::ExtraPaddle,
        StrategyKind::Turbo,
        StrategyKind::FallingHeart,
    ];

    pub fn is_effect(&self) -> bool {
        Self::EFFECTS.contains(self)
    }
}

/// Behavior run when a brick is struck
pub trait CollisionStrategy: fmt::Debug {
    fn on_collision(&self, field: &mut Playfield, hit: &Hit);

    fn kind(&self) -> StrategyKind;

    /// The strategy this one delegates to (None for the terminal strategy)
    fn wrapped(&self) -> Option<&dyn CollisionStrategy> {
        None
    }
}

pub type BoxedStrategy = Box<dyn CollisionStrategy>;

/// Kinds along a chain, outermost first
pub fn chain_kinds(strategy: &dyn CollisionStrategy) -> Vec<StrategyKind> {
    let mut kinds = Vec::new();
    let mut current = Some(strategy);
    while let Some(s) = current {
        kinds.push(s.kind());
        current = s.wrapped();
    }
    kinds
}

/// Number of single-effect decorators in a chain
pub fn effect_count(strategy: &dyn CollisionStrategy) -> usize {
    chain_kinds(strategy).iter().filter(|k| k.is_effect()).count()
}

/// Terminal strategy: remove the brick and count it
#[derive(Debug, Clone, Copy, Default)]
pub struct Basic;

impl CollisionStrategy for Basic {
    fn on_collision(&self, field: &mut Playfield, hit: &Hit) {
        // A brick struck twice in one frame is only removed and counted once
        if field.world.remove_from(hit.brick, Layer::Static) {
            field.bricks.decrement();
            field.events.push(GameEvent::BrickRemoved { id: hit.brick });
            log::debug!("Brick {} removed, {} left", hit.brick, field.bricks.value());
        }
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Basic
    }
}

/// The extra behavior a decorator adds on top of the strategy it wraps
pub trait Effect: fmt::Debug {
    const KIND: StrategyKind;

    fn apply(&self, field: &mut Playfield, hit: &Hit);
}

/// An effect wrapped around another strategy
#[derive(Debug)]
pub struct Decorated<E: Effect> {
    effect: E,
    inner: BoxedStrategy,
}

impl<E: Effect> Decorated<E> {
    pub fn new(effect: E, inner: BoxedStrategy) -> Self {
        Self { effect, inner }
    }
}

impl<E: Effect> CollisionStrategy for Decorated<E> {
    fn on_collision(&self, field: &mut Playfield, hit: &Hit) {
        self.effect.apply(field, hit);
        self.inner.on_collision(field, hit);
    }

    fn kind(&self) -> StrategyKind {
        E::KIND
    }

    fn wrapped(&self) -> Option<&dyn CollisionStrategy> {
        Some(self.inner.as_ref())
    }
}

/// Marker around a chain built from several effects; adds no behavior
#[derive(Debug)]
pub struct Combined {
    chain: BoxedStrategy,
}

impl Combined {
    pub fn new(chain: BoxedStrategy) -> Self {
        Self { chain }
    }
}

impl CollisionStrategy for Combined {
    fn on_collision(&self, field: &mut Playfield, hit: &Hit) {
        self.chain.on_collision(field, hit);
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Combined
    }

    fn wrapped(&self) -> Option<&dyn CollisionStrategy> {
        Some(self.chain.as_ref())
    }
}

/// Spawn mock balls where the brick was
#[derive(Debug, Clone, Copy)]
pub struct ExtraBalls {
    pub count: usize,
    pub radius: f32,
    pub speed: f32,
    pub visual: Visual,
}

impl Effect for ExtraBalls {
    const KIND: StrategyKind = StrategyKind::ExtraBalls;

    fn apply(&self, field: &mut Playfield, hit: &Hit) {
        let ids = spawn_mock_balls(
            &mut field.world,
            &mut field.rng,
            hit.brick_center,
            self.count,
            self.radius,
            self.speed,
            self.visual,
        );
        log::debug!("Brick {} released {} mock balls", hit.brick, ids.len());
    }
}

/// Create the extra paddle unless one is already in play
#[derive(Debug, Clone, Copy)]
pub struct ExtraPaddle {
    pub center: Vec2,
    pub size: Vec2,
    pub visual: Visual,
}

impl Effect for ExtraPaddle {
    const KIND: StrategyKind = StrategyKind::ExtraPaddle;

    fn apply(&self, field: &mut Playfield, _hit: &Hit) {
        if let Some(id) = field
            .extra_paddle
            .spawn(&mut field.world, self.center, self.size, self.visual)
        {
            field.events.push(GameEvent::ExtraPaddleSpawned { id });
        }
    }
}

/// Boost the main ball when it is the one striking the brick
#[derive(Debug, Clone, Copy)]
pub struct Turbo {
    pub speed_factor: f32,
    pub budget: u32,
    pub visual: Visual,
}

impl Effect for Turbo {
    const KIND: StrategyKind = StrategyKind::Turbo;

    fn apply(&self, field: &mut Playfield, hit: &Hit) {
        if hit.other != field.main_ball {
            return;
        }
        let Some(ball) = field.world.get_mut(hit.other) else {
            return;
        };
        if activate_turbo(ball, self.speed_factor, self.budget, self.visual) {
            log::info!("Turbo on for {} collisions", self.budget);
            field.events.push(GameEvent::TurboStarted);
        }
    }
}

/// Drop a heart pickup from the brick
#[derive(Debug, Clone, Copy)]
pub struct FallingHeart {
    pub size: f32,
    pub speed: f32,
    pub visual: Visual,
}

impl Effect for FallingHeart {
    const KIND: StrategyKind = StrategyKind::FallingHeart;

    fn apply(&self, field: &mut Playfield, hit: &Hit) {
        let id = spawn_falling_heart(&mut field.world, hit.brick_center, self.size, self.speed, self.visual);
        log::debug!("Brick {} dropped heart {}", hit.brick, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::is_turbo;
    use crate::sim::entity::{Assets, Entity, EntityKind};
    use crate::tuning::Tuning;

    fn field() -> Playfield {
        Playfield::new(Tuning::seeded(11), Assets::default())
    }

    fn add_brick(field: &mut Playfield) -> Hit {
        let center = Vec2::new(200.0, 40.0);
        let brick = field.world.add(
            Entity::new(EntityKind::Brick, center, Vec2::new(80.0, 15.0), field.assets.brick),
            Layer::Static,
        );
        field.bricks.increment();
        Hit {
            brick,
            brick_center: center,
            other: field.main_ball,
        }
    }

    fn count(field: &Playfield, pred: impl Fn(&EntityKind) -> bool) -> usize {
        field.world.iter().filter(|e| pred(&e.kind)).count()
    }

    fn extra_balls(field: &Playfield) -> ExtraBalls {
        ExtraBalls {
            count: 2,
            radius: 15.0,
            speed: 200.0,
            visual: field.assets.mock_ball,
        }
    }

    fn turbo(field: &Playfield) -> Turbo {
        Turbo {
            speed_factor: 1.4,
            budget: 6,
            visual: field.assets.turbo_ball,
        }
    }

    #[test]
    fn test_basic_removes_once() {
        let mut field = field();
        let hit = add_brick(&mut field);
        assert_eq!(field.bricks.value(), 1);

        Basic.on_collision(&mut field, &hit);
        assert!(!field.world.contains(hit.brick));
        assert_eq!(field.bricks.value(), 0);

        // Second strike in the same frame
        Basic.on_collision(&mut field, &hit);
        assert_eq!(field.bricks.value(), 0);
        let removed = field
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickRemoved { .. }))
            .count();
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_basic_ignores_non_brick_layers() {
        let mut field = field();
        let mut hit = add_brick(&mut field);
        hit.brick = field.main_paddle;
        Basic.on_collision(&mut field, &hit);
        assert!(field.world.contains(field.main_paddle));
        assert_eq!(field.bricks.value(), 1);
    }

    #[test]
    fn test_extra_balls_spawns_two_at_brick() {
        let mut field = field();
        let hit = add_brick(&mut field);
        let strategy = Decorated::new(extra_balls(&field), Box::new(Basic));
        strategy.on_collision(&mut field, &hit);

        let mocks: Vec<_> = field
            .world
            .iter()
            .filter(|e| e.kind == EntityKind::MockBall)
            .collect();
        assert_eq!(mocks.len(), 2);
        assert!(mocks.iter().all(|m| m.center == hit.brick_center));
        assert_eq!(field.bricks.value(), 0);
    }

    #[test]
    fn test_effect_fires_even_if_brick_already_gone() {
        let mut field = field();
        let hit = add_brick(&mut field);
        field.world.remove(hit.brick);
        let strategy = Decorated::new(extra_balls(&field), Box::new(Basic));
        strategy.on_collision(&mut field, &hit);
        assert_eq!(count(&field, |k| *k == EntityKind::MockBall), 2);
        // Removal failed, so the counter is untouched
        assert_eq!(field.bricks.value(), 1);
    }

    #[test]
    fn test_extra_paddle_singleton_still_delegates() {
        let mut field = field();
        let effect = ExtraPaddle {
            center: Vec2::new(350.0, 250.0),
            size: Vec2::new(100.0, 15.0),
            visual: field.assets.paddle,
        };
        let first = add_brick(&mut field);
        let second = add_brick(&mut field);
        let a = Decorated::new(effect, Box::new(Basic));
        let b = Decorated::new(effect, Box::new(Basic));
        a.on_collision(&mut field, &first);
        b.on_collision(&mut field, &second);

        assert_eq!(count(&field, |k| matches!(k, EntityKind::ExtraPaddle { .. })), 1);
        // The guarded no-op still removed the second brick
        assert!(!field.world.contains(second.brick));
        assert_eq!(field.bricks.value(), 0);
    }

    #[test]
    fn test_turbo_only_for_main_ball() {
        let mut field = field();
        let mut hit = add_brick(&mut field);
        let mock = field.world.add(
            Entity::new(EntityKind::MockBall, Vec2::ZERO, Vec2::ONE, field.assets.mock_ball),
            Layer::Default,
        );
        hit.other = mock;
        Decorated::new(turbo(&field), Box::new(Basic)).on_collision(&mut field, &hit);
        assert!(!is_turbo(field.world.get(field.main_ball).unwrap()));
        assert!(!field.world.contains(hit.brick));
    }

    #[test]
    fn test_turbo_activates_main_ball() {
        let mut field = field();
        let hit = add_brick(&mut field);
        let before = field.world.get(field.main_ball).unwrap().vel;
        Decorated::new(turbo(&field), Box::new(Basic)).on_collision(&mut field, &hit);

        let ball = field.world.get(field.main_ball).unwrap();
        assert!(is_turbo(ball));
        assert_eq!(ball.visual, field.assets.turbo_ball);
        assert!((ball.vel - before * 1.4).length() < 1e-3);
        assert!(field.events.contains(&GameEvent::TurboStarted));
    }

    #[test]
    fn test_falling_heart_spawns_at_brick() {
        let mut field = field();
        let hit = add_brick(&mut field);
        let effect = FallingHeart {
            size: 20.0,
            speed: 100.0,
            visual: field.assets.heart,
        };
        Decorated::new(effect, Box::new(Basic)).on_collision(&mut field, &hit);
        let heart = field
            .world
            .iter()
            .find(|e| e.kind == EntityKind::FallingHeart)
            .unwrap();
        assert_eq!(heart.center, hit.brick_center);
        assert_eq!(heart.vel, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn test_combined_chain_fires_every_effect_once() {
        let mut field = field();
        let hit = add_brick(&mut field);
        let chain: BoxedStrategy = Box::new(Decorated::new(extra_balls(&field), Box::new(Basic)));
        let chain: BoxedStrategy = Box::new(Decorated::new(turbo(&field), chain));
        let chain: BoxedStrategy = Box::new(Decorated::new(extra_balls(&field), chain));
        let combined = Combined::new(chain);

        assert_eq!(
            chain_kinds(&combined),
            vec![
                StrategyKind::Combined,
                StrategyKind::ExtraBalls,
                StrategyKind::Turbo,
                StrategyKind::ExtraBalls,
                StrategyKind::Basic,
            ]
        );
        assert_eq!(effect_count(&combined), 3);

        combined.on_collision(&mut field, &hit);
        assert_eq!(count(&field, |k| *k == EntityKind::MockBall), 4);
        assert!(is_turbo(field.world.get(field.main_ball).unwrap()));
        assert_eq!(field.bricks.value(), 0);
    }

    #[test]
    fn test_basic_chain_kinds() {
        assert_eq!(chain_kinds(&Basic), vec![StrategyKind::Basic]);
        assert_eq!(effect_count(&Basic), 0);
        assert!(!StrategyKind::Combined.is_effect());
        assert!(StrategyKind::Turbo.is_effect());
    }
}
