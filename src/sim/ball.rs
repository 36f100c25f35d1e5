//! Main ball turbo mode and mock balls
//!
//! Turbo is a one-shot boost: velocity is scaled up and the ball image
//! swapped until the ball has bounced `budget` more times.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind, Layer, Visual, World};
use crate::{reflect, velocity_from_angle};

/// Turbo state of the main ball
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TurboState {
    /// Normal speed; collisions are not counted
    #[default]
    Inactive,
    /// Boosted until `collisions` reaches `budget`
    Active {
        speed_factor: f32,
        budget: u32,
        collisions: u32,
        /// Image to restore when turbo ends
        saved_visual: Visual,
    },
}

impl TurboState {
    pub fn is_active(&self) -> bool {
        matches!(self, TurboState::Active { .. })
    }

    /// Enter turbo. Returns false (and changes nothing) if already active.
    pub fn activate(
        &mut self,
        vel: &mut Vec2,
        visual: &mut Visual,
        speed_factor: f32,
        budget: u32,
        turbo_visual: Visual,
    ) -> bool {
        if self.is_active() {
            return false;
        }
        *vel *= speed_factor;
        *self = TurboState::Active {
            speed_factor,
            budget,
            collisions: 0,
            saved_visual: *visual,
        };
        *visual = turbo_visual;
        true
    }

    /// Count one collision while active. Returns true if turbo just ended.
    pub fn register_collision(&mut self, vel: &mut Vec2, visual: &mut Visual) -> bool {
        let TurboState::Active {
            speed_factor,
            budget,
            collisions,
            saved_visual,
        } = self
        else {
            return false;
        };

        *collisions += 1;
        if *collisions < *budget {
            return false;
        }

        *vel /= *speed_factor;
        *visual = *saved_visual;
        *self = TurboState::Inactive;
        true
    }
}

/// Put a main ball into turbo. False if `ball` is not a main ball or is already boosted.
pub fn activate_turbo(ball: &mut Entity, speed_factor: f32, budget: u32, turbo_visual: Visual) -> bool {
    let Entity {
        kind: EntityKind::Ball(turbo),
        vel,
        visual,
        ..
    } = ball
    else {
        return false;
    };
    turbo.activate(vel, visual, speed_factor, budget, turbo_visual)
}

/// Whether a main ball is currently boosted
pub fn is_turbo(ball: &Entity) -> bool {
    matches!(&ball.kind, EntityKind::Ball(turbo) if turbo.is_active())
}

/// Bounce a ball (main or mock) off a surface with the given normal
///
/// The normal points away from the surface, toward the ball. A main ball
/// also counts the collision toward its turbo budget. Returns true if this
/// collision ended turbo.
pub fn on_ball_collision(ball: &mut Entity, normal: Vec2) -> bool {
    if ball.vel.dot(normal) < 0.0 {
        ball.vel = reflect(ball.vel, normal);
    }
    match ball {
        Entity {
            kind: EntityKind::Ball(turbo),
            vel,
            visual,
            ..
        } => turbo.register_collision(vel, visual),
        _ => false,
    }
}

/// Spawn `count` mock balls at `center`, each heading in an independent
/// random direction across a half turn
pub fn spawn_mock_balls<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    center: Vec2,
    count: usize,
    radius: f32,
    speed: f32,
    visual: Visual,
) -> Vec<EntityId> {
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..PI);
            let ball = Entity::new(EntityKind::MockBall, center, Vec2::splat(radius), visual)
                .with_velocity(velocity_from_angle(speed, angle));
            world.add(ball, Layer::Default)
        })
        .collect()
}

/// Mock balls leave play once their center is above or below the playfield
pub fn mock_ball_escaped(ball: &Entity, window_height: f32) -> bool {
    ball.center.y < 0.0 || ball.center.y > window_height
}
