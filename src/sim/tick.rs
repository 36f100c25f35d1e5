//! Fixed timestep simulation tick
//!
//! One call advances the playfield by one frame: paddles steer, everything
//! moves, escaped entities are culled, contacts are dispatched, and finally
//! the round outcome is evaluated.

use glam::Vec2;

use super::ball::{mock_ball_escaped, on_ball_collision};
use super::collision::{Contact, find_contacts};
use super::entity::{EntityId, EntityKind};
use super::health::collect_falling_heart;
use super::paddle::{clamp_paddle, steer_paddle};
use super::state::{GameEvent, GameOutcome, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Paddle steering: negative = left, positive = right, 0 = hold
    pub paddle_dir: f32,
}

/// Lay out the brick grid below the top wall, one strategy per brick
pub fn build_level(state: &mut GameState) {
    let tuning = state.playfield.tuning.clone();
    let brick_size = Vec2::new(tuning.brick_width(), tuning.brick_height);
    let top = tuning.brick_margin + tuning.paddle_height;

    for row in 0..tuning.brick_rows {
        for col in 0..tuning.brick_cols {
            let top_left = Vec2::new(
                tuning.border_width + col as f32 * (brick_size.x + tuning.brick_margin),
                top + row as f32 * (brick_size.y + tuning.brick_margin),
            );
            state.add_brick(top_left + brick_size / 2.0, brick_size);
        }
    }
    log::info!(
        "Level built: {}x{} bricks, {} lives",
        tuning.brick_rows,
        tuning.brick_cols,
        state.lives()
    );
}

/// Advance the game by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> GameOutcome {
    if state.outcome != GameOutcome::Playing {
        return state.outcome;
    }
    state.time_ticks += 1;

    move_entities(state, input, dt);
    cull_escaped(state);

    for contact in find_contacts(&state.playfield) {
        handle_contact(state, &contact);
    }

    state.outcome = check_outcome(state);
    state.outcome
}

fn move_entities(state: &mut GameState, input: &TickInput, dt: f32) {
    let field = &mut state.playfield;
    let left = field.tuning.border_width;
    let right = field.tuning.window_width - field.tuning.border_width;
    let speed = field.tuning.paddle_speed;

    for entity in field.world.iter_mut() {
        if entity.kind.is_paddle() {
            steer_paddle(entity, input.paddle_dir, speed, left, right);
        }
        entity.center += entity.vel * dt;
        if entity.kind.is_paddle() {
            clamp_paddle(entity, left, right);
        }
    }
}

/// Mock balls leave through the top or bottom; hearts that miss the paddle
/// fall out of the world
fn cull_escaped(state: &mut GameState) {
    let field = &mut state.playfield;
    let height = field.tuning.window_height;
    let escaped = field.world.ids_where(|e| match e.kind {
        EntityKind::MockBall => mock_ball_escaped(e, height),
        EntityKind::FallingHeart => e.min().y > height,
        _ => false,
    });
    for id in escaped {
        field.world.remove(id);
    }
}

fn handle_contact(state: &mut GameState, contact: &Contact) {
    let field = &mut state.playfield;
    // Earlier contacts this frame may have removed either side
    let (Some(a), Some(b)) = (field.world.get(contact.a), field.world.get(contact.b)) else {
        return;
    };
    let (a_kind, b_kind, b_center) = (a.kind.clone(), b.kind.clone(), b.center);
    log::debug!("Contact {} -> {} ({:?})", contact.a, contact.b, b_kind);

    if a_kind == EntityKind::FallingHeart {
        let main_paddle = field.main_paddle;
        if collect_falling_heart(&mut field.world, &mut field.health, contact.a, contact.b, main_paddle) {
            field.events.push(GameEvent::LifeGained {
                lives: field.health.lives(),
            });
        }
        return;
    }

    // The ball's own bounce runs before whatever it struck reacts
    bounce(state, contact.a, contact.normal, contact.penetration);
    let field = &mut state.playfield;

    match b_kind {
        EntityKind::Ball(_) | EntityKind::MockBall => {
            bounce(state, contact.b, -contact.normal, 0.0);
        }
        EntityKind::ExtraPaddle { .. } => {
            let max = field.tuning.extra_paddle_max_collisions;
            if field.extra_paddle.register_collision(&mut field.world, contact.b, max) {
                field.events.push(GameEvent::ExtraPaddleExpired { id: contact.b });
            }
        }
        EntityKind::Brick => {
            state.strike_brick(contact.b, b_center, contact.a);
        }
        _ => {}
    }
}

fn bounce(state: &mut GameState, ball: EntityId, normal: Vec2, penetration: f32) {
    let field = &mut state.playfield;
    let Some(entity) = field.world.get_mut(ball) else {
        return;
    };
    entity.center += normal * penetration;
    let turbo_ended = on_ball_collision(entity, normal);
    field.events.push(GameEvent::PlaySound(field.assets.collision_sound));
    if turbo_ended {
        log::info!("Turbo off");
        field.events.push(GameEvent::TurboEnded);
    }
}

fn check_outcome(state: &mut GameState) -> GameOutcome {
    let field = &mut state.playfield;
    if field.bricks.value() == 0 {
        log::info!("All bricks cleared after {} ticks", state.time_ticks);
        return GameOutcome::Won;
    }

    let fell = field
        .world
        .get(field.main_ball)
        .is_some_and(|ball| ball.center.y > field.tuning.window_height);
    if !fell {
        return GameOutcome::Playing;
    }

    field.health.remove_life(&mut field.world);
    let lives = field.health.lives();
    field.events.push(GameEvent::LifeLost { lives });
    log::info!("Ball lost, {} lives left", lives);
    if lives == 0 {
        return GameOutcome::Lost;
    }
    field.reset_ball();
    GameOutcome::Playing
}
