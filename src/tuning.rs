//! Data-driven game balance
//!
//! Every gameplay number the simulation uses lives here so a run can be
//! re-tuned (or made reproducible via `seed`) from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Result type alias for tuning operations
pub type TuningResult<T> = Result<T, TuningError>;

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// RNG seed (None = seeded from the OS, runs are not reproducible)
    pub seed: Option<u64>,

    // === Playfield ===
    pub window_width: f32,
    pub window_height: f32,
    pub border_width: f32,

    // === Paddle / ball ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_offset_y: f32,
    pub paddle_speed: f32,
    pub ball_speed: f32,
    pub ball_radius: f32,

    // === Brick grid ===
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_margin: f32,
    pub brick_height: f32,

    // === Health bar ===
    pub initial_lives: u32,
    pub max_lives: u32,
    pub heart_size: f32,
    pub first_heart_x: f32,
    pub heart_spacing: f32,
    pub health_bar_y: f32,

    // === Power-ups ===
    pub mock_ball_radius: f32,
    pub mock_ball_speed: f32,
    pub falling_heart_speed: f32,
    pub turbo_speed_factor: f32,
    pub turbo_collision_budget: u32,
    pub extra_paddle_width: f32,
    pub extra_paddle_height: f32,
    pub extra_paddle_max_collisions: u32,

    // === Strategy construction ===
    /// Draws at or above this value leave a brick undecorated
    pub special_behavior_threshold: f64,
    pub combined_initial_effects: u32,
    pub combined_max_effects: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: None,

            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            border_width: BORDER_WIDTH,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_offset_y: PADDLE_OFFSET_Y,
            paddle_speed: PADDLE_SPEED,
            ball_speed: BALL_SPEED,
            ball_radius: BALL_RADIUS,

            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_margin: BRICK_MARGIN,
            brick_height: BRICK_HEIGHT,

            initial_lives: INITIAL_LIVES,
            max_lives: MAX_LIVES,
            heart_size: HEART_SIZE,
            first_heart_x: FIRST_HEART_X,
            heart_spacing: HEART_SPACING,
            health_bar_y: HEALTH_BAR_Y,

            mock_ball_radius: MOCK_BALL_RADIUS,
            mock_ball_speed: MOCK_BALL_SPEED,
            falling_heart_speed: FALLING_HEART_SPEED,
            turbo_speed_factor: TURBO_SPEED_FACTOR,
            turbo_collision_budget: TURBO_COLLISION_BUDGET,
            extra_paddle_width: EXTRA_PADDLE_WIDTH,
            extra_paddle_height: EXTRA_PADDLE_HEIGHT,
            extra_paddle_max_collisions: EXTRA_PADDLE_MAX_COLLISIONS,

            special_behavior_threshold: SPECIAL_BEHAVIOR_THRESHOLD,
            combined_initial_effects: COMBINED_INITIAL_EFFECTS,
            combined_max_effects: COMBINED_MAX_EFFECTS,
        }
    }
}

impl Tuning {
    /// Default tuning with a fixed seed (reproducible runs, tests)
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> TuningResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> TuningResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject configurations the simulation cannot honor
    pub fn validate(&self) -> TuningResult<()> {
        if self.brick_rows == 0 || self.brick_cols == 0 {
            return Err(TuningError::Invalid("brick grid must not be empty".into()));
        }
        if self.initial_lives == 0 || self.initial_lives >= self.max_lives {
            return Err(TuningError::Invalid(format!(
                "initial_lives must be in 1..{} (got {})",
                self.max_lives, self.initial_lives
            )));
        }
        if !(0.0..=1.0).contains(&self.special_behavior_threshold) {
            return Err(TuningError::Invalid(format!(
                "special_behavior_threshold must be in [0, 1] (got {})",
                self.special_behavior_threshold
            )));
        }
        if self.turbo_speed_factor <= 0.0 {
            return Err(TuningError::Invalid("turbo_speed_factor must be positive".into()));
        }
        if self.turbo_collision_budget == 0 || self.extra_paddle_max_collisions == 0 {
            return Err(TuningError::Invalid("collision budgets must be positive".into()));
        }
        if self.combined_initial_effects < 2
            || self.combined_initial_effects > self.combined_max_effects
        {
            return Err(TuningError::Invalid(format!(
                "combined effects need 2 <= initial ({}) <= max ({})",
                self.combined_initial_effects, self.combined_max_effects
            )));
        }
        if self.brick_width() <= 0.0 {
            return Err(TuningError::Invalid("bricks do not fit the playfield".into()));
        }
        Ok(())
    }

    /// Width of one brick so `brick_cols` bricks fill the space between the walls
    pub fn brick_width(&self) -> f32 {
        let cols = self.brick_cols as f32;
        (self.window_width - 2.0 * self.border_width - self.brick_margin * (cols - 1.0)) / cols
    }
}
