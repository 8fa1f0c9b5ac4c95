//! Arkanoid - fixed-timestep breakout engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shapes, collisions, game state, tick rules)
//! - `clock`: Fixed-step accumulator driven by a variable-rate frame signal
//! - `game`: Controller wiring the simulation to loader/audio/render/input collaborators
//! - `levels`: Level text format and reference loaders
//! - `config`: Data-driven tuning and the durability palette

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod levels;
pub mod sim;

pub use clock::SimulationClock;
pub use config::{BlockPalette, GameConfig};
pub use error::{ConfigError, GameError, InvariantViolation, LoadError};
pub use game::{
    AudioSink, ControllerStatus, FrameView, GameController, InputCommand, InputSource, Renderer,
};
pub use levels::{BuiltinLevels, DirectoryLevels, LevelFuture, LevelLoader, parse_level};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 256.0;
    pub const ARENA_HEIGHT: f32 = 240.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 40.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    /// Distance from the arena bottom to the paddle top after a reset
    pub const PADDLE_BOTTOM_OFFSET: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 3.0;
    /// Upward speed given to a ball when fired off the paddle
    pub const LAUNCH_SPEED: f32 = 200.0;

    /// Retries granted at the start of a run
    pub const STARTING_RETRIES: u32 = 2;
}
