//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (blocks in level order, balls in spawn order)
//! - No rendering, audio or loading dependencies

pub mod collision;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{Axis, Obstacle, resolve, resolve_axis};
pub use shape::{Bounds, Circle, Rect, overlaps};
pub use state::{Ball, BallState, Block, GameEvent, GameState, Level, Paddle};
pub use tick::{LevelChange, TickInput, tick};
