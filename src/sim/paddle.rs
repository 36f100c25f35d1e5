//! Paddle movement and the extra-paddle singleton

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, Layer, Visual, World};

/// Set a paddle's horizontal velocity from a steering direction
///
/// `dir` < 0 steers left, > 0 right. A paddle already touching a bound
/// cannot keep moving into it.
pub fn steer_paddle(paddle: &mut Entity, dir: f32, speed: f32, left_bound: f32, right_bound: f32) {
    let mut movement = 0.0;
    if dir < 0.0 && paddle.min().x > left_bound {
        movement -= 1.0;
    }
    if dir > 0.0 && paddle.max().x < right_bound {
        movement += 1.0;
    }
    paddle.vel = Vec2::new(movement * speed, 0.0);
}

/// Keep a paddle fully inside the horizontal bounds
pub fn clamp_paddle(paddle: &mut Entity, left_bound: f32, right_bound: f32) {
    let half = paddle.size.x / 2.0;
    if right_bound - left_bound < paddle.size.x {
        return;
    }
    paddle.center.x = paddle.center.x.clamp(left_bound + half, right_bound - half);
}

/// Handle to the one extra paddle allowed at a time
///
/// Owned by the game session rather than stored globally, so a restart
/// can clear it explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraPaddleSlot {
    current: Option<EntityId>,
}

impl ExtraPaddleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live extra paddle, if any
    pub fn current(&self) -> Option<EntityId> {
        self.current
    }

    /// Whether a live extra paddle exists. A reference to an entity that is
    /// no longer in the world counts as absent.
    pub fn is_present(&self, world: &World) -> bool {
        self.current.is_some_and(|id| world.contains(id))
    }

    /// Create the extra paddle unless one already exists
    pub fn spawn(&mut self, world: &mut World, center: Vec2, size: Vec2, visual: Visual) -> Option<EntityId> {
        if self.is_present(world) {
            return None;
        }
        let paddle = Entity::new(EntityKind::ExtraPaddle { collisions: 0 }, center, size, visual);
        let id = world.add(paddle, Layer::Default);
        self.current = Some(id);
        log::info!("Extra paddle {} spawned", id);
        Some(id)
    }

    /// Count one collision on the extra paddle
    ///
    /// Returns true if the budget is used up and the paddle was removed.
    pub fn register_collision(&mut self, world: &mut World, id: EntityId, max_collisions: u32) -> bool {
        if self.current != Some(id) {
            return false;
        }
        let Some(Entity {
            kind: EntityKind::ExtraPaddle { collisions },
            ..
        }) = world.get_mut(id)
        else {
            return false;
        };

        *collisions += 1;
        if *collisions < max_collisions {
            return false;
        }
        log::info!("Extra paddle {} expired after {} collisions", id, collisions);
        self.reset(world)
    }

    /// Remove the extra paddle (if any) and clear the reference
    pub fn reset(&mut self, world: &mut World) -> bool {
        match self.current.take() {
            Some(id) => world.remove(id),
            None => false,
        }
    }
}
