//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given a seed, a run is reproducible:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod entity;
pub mod factory;
pub mod health;
pub mod paddle;
pub mod state;
pub mod strategy;
pub mod tick;

pub use ball::{TurboState, activate_turbo, is_turbo};
pub use collision::{Contact, aabb_contact, find_contacts};
pub use entity::{Assets, Entity, EntityId, EntityKind, Layer, Sound, Visual, World};
pub use factory::StrategyFactory;
pub use health::HealthBar;
pub use paddle::ExtraPaddleSlot;
pub use state::{BrickCounter, GameEvent, GameOutcome, GameState, Playfield};
pub use strategy::{Basic, BoxedStrategy, CollisionStrategy, Hit, StrategyKind, chain_kinds};
pub use tick::{TickInput, build_level, tick};
