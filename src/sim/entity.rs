//! Entities and the entity collection
//!
//! The frontend owns rendering and audio; the simulation only references
//! assets through opaque [`Visual`] and [`Sound`] handles.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::TurboState;

/// Stable entity identifier, allocated by the [`World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque image handle, swappable at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Visual(pub u32);

/// Opaque sound handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sound(pub u32);

/// Asset handles the frontend resolves to images and sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub ball: Visual,
    pub turbo_ball: Visual,
    pub mock_ball: Visual,
    pub paddle: Visual,
    pub brick: Visual,
    pub heart: Visual,
    pub wall: Visual,
    pub collision_sound: Sound,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            ball: Visual(0),
            turbo_ball: Visual(1),
            mock_ball: Visual(2),
            paddle: Visual(3),
            brick: Visual(4),
            heart: Visual(5),
            wall: Visual(6),
            collision_sound: Sound(0),
        }
    }
}

/// Collection layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layer {
    #[default]
    Default,
    /// Bricks
    Static,
    /// Health bar hearts
    Ui,
}

/// What an entity is, plus any per-kind state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// The main ball
    Ball(TurboState),
    /// Extra ball spawned by a brick; leaves play through the top or bottom
    MockBall,
    Paddle,
    /// Transient second paddle with a collision budget
    ExtraPaddle { collisions: u32 },
    Brick,
    /// Pickup falling from a broken brick
    FallingHeart,
    /// Health bar display heart
    Heart,
    Wall,
}

impl EntityKind {
    /// True for anything that bounces off surfaces
    pub fn is_ball(&self) -> bool {
        matches!(self, EntityKind::Ball(_) | EntityKind::MockBall)
    }

    /// True for both the main and the extra paddle
    pub fn is_paddle(&self) -> bool {
        matches!(self, EntityKind::Paddle | EntityKind::ExtraPaddle { .. })
    }
}

/// An axis-aligned game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub layer: Layer,
    pub center: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub visual: Visual,
}

impl Entity {
    /// New stationary entity; the id and layer are assigned by [`World::add`]
    pub fn new(kind: EntityKind, center: Vec2, size: Vec2, visual: Visual) -> Self {
        Self {
            id: EntityId(0),
            kind,
            layer: Layer::Default,
            center,
            size,
            vel: Vec2::ZERO,
            visual,
        }
    }

    /// Same entity moving at `vel`
    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }
}

/// The entity collection
///
/// Entities are kept sorted by id so iteration order is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: Vec<Entity>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Add an entity on a layer, returning its new id
    pub fn add(&mut self, mut entity: Entity, layer: Layer) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        entity.id = id;
        entity.layer = layer;
        self.entities.push(entity);
        id
    }

    /// Remove an entity from whatever layer it lives on. False if absent.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.entities.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove an entity only if it lives on `layer`. False if absent there.
    pub fn remove_from(&mut self, id: EntityId, layer: Layer) -> bool {
        match self.index_of(id) {
            Some(idx) if self.entities[idx].layer == layer => {
                self.entities.remove(idx);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|idx| &self.entities[idx])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |idx| &mut self.entities[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Entities on one layer
    pub fn iter_layer(&self, layer: Layer) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.layer == layer)
    }

    /// Ids of all entities matching a predicate (snapshot, safe to mutate after)
    pub fn ids_where(&self, mut pred: impl FnMut(&Entity) -> bool) -> Vec<EntityId> {
        self.entities.iter().filter(|e| pred(e)).map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }
}
