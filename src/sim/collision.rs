//! Per-axis sweep collision and response
//!
//! A free ball moves along one axis at a time. The first overlapping obstacle
//! in scan order (blocks in level order, then the paddle) wins, not the
//! closest. Horizontal runs first; vertical only runs when horizontal missed,
//! so corner hits resolve on a single axis.

use glam::Vec2;

use super::shape::{Bounds, overlaps};
use super::state::{Ball, Level, Paddle};

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    #[inline]
    fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    fn of_mut(self, v: &mut Vec2) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }

    /// (near, far) edges of a shape along this axis
    #[inline]
    fn edges<B: Bounds + ?Sized>(self, shape: &B) -> (f32, f32) {
        match self {
            Axis::X => (shape.left(), shape.right()),
            Axis::Y => (shape.top(), shape.bottom()),
        }
    }
}

/// What a ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstacle {
    Block { id: u32 },
    Paddle,
}

/// Move the ball along one axis and bounce it off the first obstacle it overlaps
pub fn resolve_axis(
    ball: &mut Ball,
    level: &mut Level,
    paddle: &Paddle,
    axis: Axis,
    dt: f32,
) -> Option<Obstacle> {
    let vel = axis.of(ball.vel);
    *axis.of_mut(&mut ball.shape.pos) += vel * dt;

    // Blocks at durability 0 still collide until the end-of-tick filter
    if let Some(block) = level.blocks.iter_mut().find(|b| overlaps(&*ball, &**b)) {
        block.durability -= 1;
        bounce(ball, axis.edges(&*block), axis);
        return Some(Obstacle::Block { id: block.id });
    }

    if overlaps(&*ball, paddle) {
        bounce(ball, axis.edges(paddle), axis);

        // Spin: pull the other axis half-way toward the paddle's motion
        let other = axis.other();
        let v = other.of(ball.vel);
        *other.of_mut(&mut ball.vel) += (other.of(paddle.vel) - v) / 2.0;
        return Some(Obstacle::Paddle);
    }

    None
}

/// Horizontal pass, then vertical if horizontal hit nothing
pub fn resolve(ball: &mut Ball, level: &mut Level, paddle: &Paddle, dt: f32) -> Option<Obstacle> {
    resolve_axis(ball, level, paddle, Axis::X, dt)
        .or_else(|| resolve_axis(ball, level, paddle, Axis::Y, dt))
}

/// Clamp the ball against the obstacle's facing edge and flip its velocity
fn bounce(ball: &mut Ball, (near, far): (f32, f32), axis: Axis) {
    let r = ball.shape.radius();
    let pos = axis.of_mut(&mut ball.shape.pos);
    let vel = axis.of_mut(&mut ball.vel);
    *pos = if *vel > 0.0 { near - r } else { far + r };
    *vel = -*vel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BallState;

    fn free_ball(pos: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::new(1, 3.0);
        ball.shape.pos = pos;
        ball.vel = vel;
        ball.state = BallState::Free;
        ball
    }

    fn far_paddle() -> Paddle {
        let mut paddle = Paddle::new(Vec2::new(40.0, 12.0), 2);
        paddle.shape.pos = Vec2::new(0.0, 500.0);
        paddle
    }

    fn arena() -> Level {
        Level::new(Vec2::new(256.0, 240.0))
    }

    #[test]
    fn test_no_obstacle_moves_freely() {
        let mut level = arena();
        let paddle = far_paddle();
        let mut ball = free_ball(Vec2::new(128.0, 100.0), Vec2::new(50.0, -50.0));

        let hit = resolve(&mut ball, &mut level, &paddle, 1.0 / 120.0);
        assert_eq!(hit, None);
        assert!((ball.shape.pos.x - 128.41667).abs() < 1e-3);
        assert!((ball.shape.pos.y - 99.58333).abs() < 1e-3);
        assert_eq!(ball.vel, Vec2::new(50.0, -50.0));
    }

    #[test]
    fn test_horizontal_hit_clamps_to_near_edge() {
        let mut level = arena();
        let id = level.add_block(Vec2::new(100.0, 90.0), Vec2::new(20.0, 20.0), 2);
        let paddle = far_paddle();
        let mut ball = free_ball(Vec2::new(96.5, 100.0), Vec2::new(120.0, 10.0));

        let hit = resolve(&mut ball, &mut level, &paddle, 1.0 / 120.0);
        assert_eq!(hit, Some(Obstacle::Block { id }));
        assert_eq!(ball.shape.pos.x, 97.0);
        assert_eq!(ball.vel.x, -120.0);
        // Vertical pass skipped
        assert_eq!(ball.shape.pos.y, 100.0);
        assert_eq!(ball.vel.y, 10.0);
        assert_eq!(level.blocks[0].durability, 1);
    }

    #[test]
    fn test_vertical_hit_moving_up_clamps_to_far_edge() {
        let mut level = arena();
        level.add_block(Vec2::new(90.0, 80.0), Vec2::new(20.0, 10.0), 1);
        let paddle = far_paddle();
        let mut ball = free_ball(Vec2::new(100.0, 93.5), Vec2::new(0.0, -120.0));

        let hit = resolve(&mut ball, &mut level, &paddle, 1.0 / 120.0);
        assert!(matches!(hit, Some(Obstacle::Block { .. })));
        assert_eq!(ball.shape.pos.y, 93.0);
        assert_eq!(ball.vel.y, 120.0);
        assert_eq!(level.blocks[0].durability, 0);
    }

    #[test]
    fn test_first_block_in_order_wins() {
        let mut level = arena();
        // Both blocks overlap after the step; the second is nearer but scanned later
        let first = level.add_block(Vec2::new(95.0, 60.0), Vec2::new(20.0, 20.0), 1);
        let second = level.add_block(Vec2::new(95.0, 79.0), Vec2::new(20.0, 2.0), 1);
        let paddle = far_paddle();
        let mut ball = free_ball(Vec2::new(100.0, 85.0), Vec2::new(0.0, -480.0));

        let hit = resolve(&mut ball, &mut level, &paddle, 1.0 / 120.0);
        assert_eq!(hit, Some(Obstacle::Block { id: first }));
        assert_eq!(ball.shape.pos.y, 83.0);
        assert_eq!(level.blocks[1].id, second);
        assert_eq!(level.blocks[1].durability, 1);
    }

    #[test]
    fn test_paddle_side_hit_transfers_spin() {
        let mut level = arena();
        let mut paddle = Paddle::new(Vec2::new(40.0, 12.0), 2);
        paddle.shape.pos = Vec2::new(80.0, 220.0);
        paddle.vel = Vec2::new(100.0, 40.0);
        let mut ball = free_ball(Vec2::new(76.5, 226.0), Vec2::new(120.0, 10.0));

        let hit = resolve(&mut ball, &mut level, &paddle, 1.0 / 120.0);
        assert_eq!(hit, Some(Obstacle::Paddle));
        assert_eq!(ball.shape.pos.x, 77.0);
        assert_eq!(ball.vel.x, -120.0);
        assert_eq!(ball.vel.y, 10.0 + (40.0 - 10.0) / 2.0);
    }

    #[test]
    fn test_paddle_vertical_hit() {
        let mut level = arena();
        let mut paddle = Paddle::new(Vec2::new(40.0, 12.0), 2);
        paddle.shape.pos = Vec2::new(80.0, 220.0);
        paddle.vel = Vec2::new(100.0, 0.0);
        let mut ball = free_ball(Vec2::new(100.0, 216.5), Vec2::new(0.0, 120.0));

        let hit = resolve(&mut ball, &mut level, &paddle, 1.0 / 120.0);
        assert_eq!(hit, Some(Obstacle::Paddle));
        assert_eq!(ball.shape.pos.y, 217.0);
        assert_eq!(ball.vel.y, -120.0);
        assert_eq!(ball.vel.x, 50.0);
    }
}
