//! Contact detection between axis-aligned entities
//!
//! Only moving pickups and balls look for contacts; everything else is hit.

use glam::Vec2;

use super::entity::{Entity, EntityId, EntityKind};
use super::health::heart_can_collide;
use super::state::Playfield;

/// Two entities touching this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The moving entity (ball or falling heart)
    pub a: EntityId,
    /// What it touched
    pub b: EntityId,
    /// Surface normal of `b` at the contact, pointing toward `a`
    pub normal: Vec2,
    /// Overlap along the normal (for position correction)
    pub penetration: f32,
}

/// Overlap test between two boxes
///
/// Returns the separating normal (pointing from `b` toward `a`, along the
/// axis of least overlap) and the penetration depth.
pub fn aabb_contact(a: &Entity, b: &Entity) -> Option<(Vec2, f32)> {
    let delta = a.center - b.center;
    let overlap = (a.size + b.size) / 2.0 - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }
    let sign = |d: f32| if d < 0.0 { -1.0 } else { 1.0 };
    if overlap.x < overlap.y {
        Some((Vec2::new(sign(delta.x), 0.0), overlap.x))
    } else {
        Some((Vec2::new(0.0, sign(delta.y)), overlap.y))
    }
}

/// Whether `mover` reacts to touching `other`
pub fn should_collide(field: &Playfield, mover: &Entity, other: &Entity) -> bool {
    if mover.id == other.id {
        return false;
    }
    match mover.kind {
        EntityKind::Ball(_) | EntityKind::MockBall => match other.kind {
            EntityKind::Wall | EntityKind::Brick | EntityKind::Paddle | EntityKind::ExtraPaddle { .. } => true,
            // Report each ball pair once
            EntityKind::Ball(_) | EntityKind::MockBall => mover.id < other.id,
            EntityKind::FallingHeart | EntityKind::Heart => false,
        },
        EntityKind::FallingHeart => heart_can_collide(&field.health, other.id, field.main_paddle),
        _ => false,
    }
}

/// All contacts in the current frame, ordered by mover id then other id
pub fn find_contacts(field: &Playfield) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for mover in field
        .world
        .iter()
        .filter(|e| e.kind.is_ball() || e.kind == EntityKind::FallingHeart)
    {
        for other in field.world.iter() {
            if !should_collide(field, mover, other) {
                continue;
            }
            if let Some((normal, penetration)) = aabb_contact(mover, other) {
                contacts.push(Contact {
                    a: mover.id,
                    b: other.id,
                    normal,
                    penetration,
                });
            }
        }
    }
    contacts
}
