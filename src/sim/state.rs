//! Game state and core simulation types
//!
//! Everything the fixed tick mutates lives here. The renderer only reads it
//! between ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{Bounds, Circle, Rect};
use crate::config::GameConfig;
use crate::error::InvariantViolation;

/// Ball state - riding the paddle or moving on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Tracks the paddle center, ignores velocity and collisions
    Held,
    /// Moves by its velocity and collides
    Free,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub shape: Circle,
    pub vel: Vec2,
    pub state: BallState,
}

impl Ball {
    pub fn new(id: u32, radius: f32) -> Self {
        Self {
            id,
            shape: Circle::new(Vec2::ZERO, radius),
            vel: Vec2::ZERO,
            state: BallState::Held,
        }
    }

    /// Sit on top of the paddle, horizontally centered
    pub fn place_on(&mut self, paddle: &Paddle) {
        self.shape.pos.x = paddle.center().x;
        self.shape.pos.y = paddle.top() - self.shape.radius();
    }

    /// Leave the paddle: fixed upward speed plus half the paddle's sideways motion
    pub fn launch(&mut self, paddle_vel: Vec2, speed: f32) {
        self.vel = Vec2::new(paddle_vel.x / 2.0, -speed);
        self.state = BallState::Free;
    }

    /// Back onto the paddle with no velocity
    pub fn hold(&mut self, paddle: &Paddle) {
        self.vel = Vec2::ZERO;
        self.state = BallState::Held;
        self.place_on(paddle);
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.state == BallState::Free
    }
}

impl Bounds for Ball {
    fn top(&self) -> f32 {
        self.shape.top()
    }
    fn bottom(&self) -> f32 {
        self.shape.bottom()
    }
    fn left(&self) -> f32 {
        self.shape.left()
    }
    fn right(&self) -> f32 {
        self.shape.right()
    }
    fn center(&self) -> Vec2 {
        self.shape.center()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub shape: Rect,
    /// Derived from frame-to-frame movement, never set by input
    pub vel: Vec2,
    pub retries: u32,
    /// Ball currently riding the paddle
    pub held_ball: Option<u32>,
    #[serde(skip)]
    last_pos: Option<Vec2>,
}

impl Paddle {
    pub fn new(size: Vec2, retries: u32) -> Self {
        Self {
            shape: Rect::new(Vec2::ZERO, size),
            vel: Vec2::ZERO,
            retries,
            held_ball: None,
            last_pos: None,
        }
    }

    /// Recompute velocity from the movement since the previous call
    pub fn track_velocity(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let pos = self.shape.pos;
        self.vel = match self.last_pos {
            Some(last) => (pos - last) / dt,
            None => Vec2::ZERO,
        };
        self.last_pos = Some(pos);
    }

    /// Keep the paddle between the arena's side walls
    pub fn clamp_into(&mut self, arena: &Rect) {
        let max_x = (arena.right() - self.shape.size().x).max(arena.left());
        self.shape.pos.x = self.shape.pos.x.clamp(arena.left(), max_x);
    }
}

impl Bounds for Paddle {
    fn top(&self) -> f32 {
        self.shape.top()
    }
    fn bottom(&self) -> f32 {
        self.shape.bottom()
    }
    fn left(&self) -> f32 {
        self.shape.left()
    }
    fn right(&self) -> f32 {
        self.shape.right()
    }
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub shape: Rect,
    /// Remaining hits; the block leaves the level at the end of the tick it reaches 0
    pub durability: i32,
}

impl Block {
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.durability <= 0
    }
}

impl Bounds for Block {
    fn top(&self) -> f32 {
        self.shape.top()
    }
    fn bottom(&self) -> f32 {
        self.shape.bottom()
    }
    fn left(&self) -> f32 {
        self.shape.left()
    }
    fn right(&self) -> f32 {
        self.shape.right()
    }
}

/// Arena bounds plus the blocks still standing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub arena: Rect,
    pub blocks: Vec<Block>,
    next_block_id: u32,
}

impl Level {
    /// Empty level with the arena anchored at the origin
    pub fn new(arena_size: Vec2) -> Self {
        Self {
            arena: Rect::new(Vec2::ZERO, arena_size),
            blocks: Vec::new(),
            next_block_id: 1,
        }
    }

    pub fn add_block(&mut self, pos: Vec2, size: Vec2, durability: i32) -> u32 {
        let id = self.next_block_id;
        self.next_block_id += 1;
        self.blocks.push(Block {
            id,
            shape: Rect::new(pos, size),
            durability,
        });
        id
    }

    /// Drop every block whose durability ran out, returning how many went
    pub fn remove_destroyed(&mut self) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| !b.is_destroyed());
        before - self.blocks.len()
    }

    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Outcome notifications consumed by the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleBounce,
    BlockBounce,
    WallBounce,
    BallLost,
    LevelStart,
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PaddleBounce => "paddleBounce",
            GameEvent::BlockBounce => "blockBounce",
            GameEvent::WallBounce => "wallBounce",
            GameEvent::BallLost => "ballLost",
            GameEvent::LevelStart => "levelStart",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Index of the level currently in play
    pub level_index: usize,
    pub level: Level,
    pub paddle: Paddle,
    /// Active balls in spawn order
    pub balls: Vec<Ball>,
    pub ball_radius: f32,
    pub launch_speed: f32,
    pub starting_retries: u32,
    pub paddle_bottom_offset: f32,
    /// Outcomes raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh run on an empty arena; a real level is installed by the controller
    pub fn new(config: &GameConfig) -> Self {
        let mut state = Self {
            level_index: 0,
            level: Level::new(config.arena_size),
            paddle: Paddle::new(config.paddle_size, config.starting_retries),
            balls: Vec::new(),
            ball_radius: config.ball_radius,
            launch_speed: config.launch_speed,
            starting_retries: config.starting_retries,
            paddle_bottom_offset: config.paddle_bottom_offset,
            events: Vec::new(),
            next_id: 1,
        };

        // Start centered horizontally
        let arena = state.level.arena;
        state.paddle.shape.pos.x = arena.center().x - config.paddle_size.x / 2.0;
        state.reset();

        state
    }

    /// Allocate a new ball ID
    pub fn next_ball_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put the paddle back at its row and serve a single held ball
    pub fn reset(&mut self) {
        self.paddle.shape.pos.y = self.level.arena.bottom() - self.paddle_bottom_offset;
        self.paddle.clamp_into(&self.level.arena);
        self.balls.clear();
        self.paddle.held_ball = None;
        self.spawn_ball_held();
    }

    /// Spawn a ball riding the paddle
    pub fn spawn_ball_held(&mut self) -> u32 {
        let id = self.next_ball_id();
        let mut ball = Ball::new(id, self.ball_radius);
        ball.hold(&self.paddle);
        self.paddle.held_ball = Some(id);
        self.balls.push(ball);
        id
    }

    /// Add an extra ball already in flight
    pub fn spawn_ball_free(&mut self, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_ball_id();
        let mut ball = Ball::new(id, self.ball_radius);
        ball.shape.pos = pos;
        ball.vel = vel;
        ball.state = BallState::Free;
        self.balls.push(ball);
        id
    }

    /// Swap in a freshly loaded level and serve
    pub fn install_level(&mut self, index: usize, level: Level) {
        self.level_index = index;
        self.level = level;
        self.reset();
        self.events.push(GameEvent::LevelStart);
    }

    /// Release the held ball. Returns false if the paddle holds nothing.
    pub fn fire(&mut self) -> bool {
        let Some(id) = self.paddle.held_ball else {
            return false;
        };
        let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        ball.launch(self.paddle.vel, self.launch_speed);
        self.paddle.held_ball = None;
        log::debug!("Fired ball {} with vel {:?}", id, ball.vel);
        true
    }

    /// Check the cross-entity invariants that must hold between ticks
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.balls.is_empty() {
            return Err(InvariantViolation::NoBalls);
        }
        let held = self
            .balls
            .iter()
            .filter(|b| b.state == BallState::Held)
            .count();
        if held > 1 {
            return Err(InvariantViolation::MultipleHeldBalls(held));
        }
        if let Some(id) = self.paddle.held_ball {
            match self.balls.iter().find(|b| b.id == id) {
                None => return Err(InvariantViolation::HeldBallMissing(id)),
                Some(b) if b.state != BallState::Held => {
                    return Err(InvariantViolation::HeldBallNotHeld(id));
                }
                Some(_) => {}
            }
        }
        if let Some(b) = self.level.blocks.iter().find(|b| b.is_destroyed()) {
            return Err(InvariantViolation::DestroyedBlockSurvived(b.id));
        }
        Ok(())
    }
}
