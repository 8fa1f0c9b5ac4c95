//! Game tuning and the block durability palette
//!
//! Loaded from JSON; every field falls back to the `consts` default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Maps block durability to a packed `0xRRGGBB` display color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPalette {
    /// Index 0 is the color of a block with durability 1
    colors: Vec<u32>,
}

impl Default for BlockPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                0xFF0D72, 0x0DC2FF, 0x0DFF72, 0xF538FF, 0xFF8E0D, 0xFFE138, 0x3877FF,
            ],
        }
    }
}

impl BlockPalette {
    pub fn new(colors: Vec<u32>) -> Result<Self, ConfigError> {
        let palette = Self { colors };
        palette.validate()?;
        Ok(palette)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::Invalid("palette has no colors".into()));
        }
        if let Some(c) = self.colors.iter().find(|c| **c > 0xFF_FFFF) {
            return Err(ConfigError::Invalid(format!(
                "palette color {c:#x} is not 0xRRGGBB"
            )));
        }
        Ok(())
    }

    /// Highest durability that has a color
    pub fn max_durability(&self) -> u32 {
        self.colors.len() as u32
    }

    /// Color for a block with the given durability
    pub fn color_for(&self, durability: i32) -> Option<u32> {
        let idx = usize::try_from(durability).ok()?.checked_sub(1)?;
        self.colors.get(idx).copied()
    }
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed simulation step (seconds)
    pub fixed_step: f32,
    /// Clamp on the real frame delta before it enters the accumulator
    pub max_frame_delta: f32,
    pub arena_size: Vec2,
    pub paddle_size: Vec2,
    pub paddle_bottom_offset: f32,
    pub ball_radius: f32,
    pub launch_speed: f32,
    pub starting_retries: u32,
    pub palette: BlockPalette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_step: SIM_DT,
            max_frame_delta: MAX_FRAME_DELTA,
            arena_size: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            paddle_size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            ball_radius: BALL_RADIUS,
            launch_speed: LAUNCH_SPEED,
            starting_retries: STARTING_RETRIES,
            palette: BlockPalette::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config ({} palette colors)", config.palette.max_durability());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("fixed_step", self.fixed_step),
            ("max_frame_delta", self.max_frame_delta),
            ("arena_size.x", self.arena_size.x),
            ("arena_size.y", self.arena_size.y),
            ("paddle_size.x", self.paddle_size.x),
            ("paddle_size.y", self.paddle_size.y),
            ("ball_radius", self.ball_radius),
            ("launch_speed", self.launch_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.paddle_size.x > self.arena_size.x {
            return Err(ConfigError::Invalid("paddle is wider than the arena".into()));
        }
        if !(0.0..self.arena_size.y).contains(&self.paddle_bottom_offset) {
            return Err(ConfigError::Invalid(format!(
                "paddle_bottom_offset {} is outside the arena",
                self.paddle_bottom_offset
            )));
        }
        self.palette.validate()
    }
}
