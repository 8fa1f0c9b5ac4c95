//! Fixed timestep simulation tick
//!
//! Advances the game state by exactly one step. Level loading is not done
//! here; a tick only reports that a level change is due.

use super::collision::{self, Obstacle};
use super::shape::Bounds;
use super::state::{BallState, GameEvent, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Paddle left edge (from pointer position)
    pub paddle_x: Option<f32>,
    /// Release the held ball
    pub fire: bool,
}

/// Level change requested by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    /// Every block is gone
    Cleared { next: usize },
    /// Out of retries; the run starts over from the first level
    GameOver,
}

impl LevelChange {
    /// Level index to load
    pub fn target(&self) -> usize {
        match self {
            LevelChange::Cleared { next } => *next,
            LevelChange::GameOver => 0,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<LevelChange> {
    if let Some(x) = input.paddle_x {
        state.paddle.shape.pos.x = x;
    }
    state.paddle.clamp_into(&state.level.arena);

    if input.fire {
        state.fire();
    }

    // Move and collide
    for ball in state.balls.iter_mut() {
        match ball.state {
            BallState::Held => {
                ball.place_on(&state.paddle);
                if state.paddle.held_ball.is_none() {
                    state.paddle.held_ball = Some(ball.id);
                }
            }
            BallState::Free => {
                let hit = collision::resolve(ball, &mut state.level, &state.paddle, dt);
                match hit {
                    Some(Obstacle::Paddle) => state.events.push(GameEvent::PaddleBounce),
                    Some(Obstacle::Block { .. }) => state.events.push(GameEvent::BlockBounce),
                    None => {}
                }
            }
        }
    }

    // Blocks hit down to zero stay collidable until every ball has moved
    let destroyed = state.level.remove_destroyed();
    if destroyed > 0 {
        log::trace!("{} blocks destroyed, {} left", destroyed, state.level.blocks.len());
    }

    // Walls
    let arena = state.level.arena;
    let mut i = 0;
    while i < state.balls.len() {
        let ball = &mut state.balls[i];

        // Only while still rising, so a ball resting on the boundary doesn't flip back
        if ball.top() < arena.top() && ball.vel.y < 0.0 {
            ball.vel.y = -ball.vel.y;
            state.events.push(GameEvent::WallBounce);
        } else if ball.top() > arena.bottom() {
            state.events.push(GameEvent::BallLost);
            if state.balls.len() > 1 {
                let lost = state.balls.remove(i);
                log::debug!("Ball {} lost, {} still in play", lost.id, state.balls.len());
                continue;
            }
            return lose_life(state);
        }

        let into_left = ball.left() < arena.left() && ball.vel.x < 0.0;
        let into_right = ball.right() > arena.right() && ball.vel.x > 0.0;
        if into_left || into_right {
            ball.vel.x = -ball.vel.x;
            state.events.push(GameEvent::WallBounce);
        }

        i += 1;
    }

    if state.level.is_cleared() {
        let next = state.level_index + 1;
        log::info!("Level {} cleared", state.level_index);
        return Some(LevelChange::Cleared { next });
    }

    None
}

/// The last ball fell out: spend a retry or end the run
fn lose_life(state: &mut GameState) -> Option<LevelChange> {
    if state.paddle.retries == 0 {
        log::info!("Out of retries on level {}, restarting", state.level_index);
        state.paddle.retries = state.starting_retries;
        return Some(LevelChange::GameOver);
    }

    state.paddle.retries -= 1;
    log::debug!("Ball lost, {} retries left", state.paddle.retries);
    if let Some(ball) = state.balls.first_mut() {
        ball.hold(&state.paddle);
        state.paddle.held_ball = Some(ball.id);
    }
    None
}
