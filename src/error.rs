//! Error taxonomy
//!
//! Nothing inside a single tick is recoverable: a load failure or a broken
//! invariant halts the controller and is handed back to the frame caller.

use thiserror::Error;

/// A level (or asset) failed to load
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("level {0} not found")]
    NotFound(usize),

    #[error("malformed level at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("block durability {durability} has no palette color (max {max})")]
    InvalidDurability { durability: u32, max: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Simulation state that must never be observed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("paddle holds ball {0} which is not in play")]
    HeldBallMissing(u32),

    #[error("paddle holds ball {0} which is not in the held state")]
    HeldBallNotHeld(u32),

    #[error("{0} balls are held at once")]
    MultipleHeldBalls(usize),

    #[error("block {0} survived the destroyed-block filter")]
    DestroyedBlockSurvived(u32),

    #[error("no balls in play")]
    NoBalls,
}

/// Configuration could not be loaded or is out of range
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Fatal controller error, returned from the frame that observed it
#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to load level {index}")]
    Load {
        index: usize,
        #[source]
        source: LoadError,
    },

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("controller is halted")]
    Halted,
}
