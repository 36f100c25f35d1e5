//! Bricker - brick-breaker gameplay core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, brick strategies, power-ups, frame tick)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio playback, input polling and windowing belong to the
//! frontend. It reads entity visuals from the [`sim::World`] and drains
//! [`sim::GameEvent`]s after every tick.

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError, TuningResult};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions
    pub const WINDOW_WIDTH: f32 = 700.0;
    pub const WINDOW_HEIGHT: f32 = 500.0;
    pub const BORDER_WIDTH: f32 = 10.0;

    /// Main paddle
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Distance of the paddle center from the bottom edge
    pub const PADDLE_OFFSET_Y: f32 = 30.0;
    pub const PADDLE_SPEED: f32 = 400.0;

    /// Main ball
    pub const BALL_SPEED: f32 = 200.0;
    pub const BALL_RADIUS: f32 = 20.0;

    /// Brick grid
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_COLS: u32 = 8;
    pub const BRICK_MARGIN: f32 = 5.0;
    pub const BRICK_HEIGHT: f32 = 15.0;

    /// Health bar
    pub const INITIAL_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 4;
    pub const HEART_SIZE: f32 = 20.0;
    /// Left edge of the first displayed heart
    pub const FIRST_HEART_X: f32 = 12.0;
    pub const HEART_SPACING: f32 = 30.0;
    /// Top edge of the displayed hearts
    pub const HEALTH_BAR_Y: f32 = 15.0;

    /// Extra balls power-up (two mock balls per strike)
    pub const MOCK_BALL_COUNT: usize = 2;
    pub const MOCK_BALL_RADIUS: f32 = 15.0;
    pub const MOCK_BALL_SPEED: f32 = 200.0;

    /// Falling heart pickup (downward speed, pixels/s)
    pub const FALLING_HEART_SPEED: f32 = 100.0;

    /// Turbo power-up
    pub const TURBO_SPEED_FACTOR: f32 = 1.4;
    pub const TURBO_COLLISION_BUDGET: u32 = 6;

    /// Extra paddle power-up
    pub const EXTRA_PADDLE_WIDTH: f32 = 100.0;
    pub const EXTRA_PADDLE_HEIGHT: f32 = 15.0;
    pub const EXTRA_PADDLE_MAX_COLLISIONS: u32 = 4;

    /// Strategy construction
    pub const SPECIAL_BEHAVIOR_THRESHOLD: f64 = 0.5;
    pub const COMBINED_INITIAL_EFFECTS: u32 = 2;
    pub const COMBINED_MAX_EFFECTS: u32 = 3;
}

/// Reflect a velocity across a surface normal (normal must be unit length)
#[inline]
pub fn reflect(vel: Vec2, normal: Vec2) -> Vec2 {
    vel - 2.0 * vel.dot(normal) * normal
}

/// Velocity of the given speed pointing along `angle` (radians)
#[inline]
pub fn velocity_from_angle(speed: f32, angle: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_horizontal_wall() {
        // Ball moving down-right hits a floor whose normal points up
        let reflected = reflect(Vec2::new(3.0, 4.0), Vec2::new(0.0, -1.0));
        assert!((reflected.x - 3.0).abs() < 1e-5);
        assert!((reflected.y + 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_velocity_from_angle_keeps_speed() {
        for i in 0..8 {
            let angle = i as f32 * 0.4;
            let vel = velocity_from_angle(200.0, angle);
            assert!((vel.length() - 200.0).abs() < 1e-3);
        }
    }
}
