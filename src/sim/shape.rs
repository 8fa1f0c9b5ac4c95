//! Axis-aligned shapes and the overlap test
//!
//! Edges are always derived from the stored position and size, never cached.
//! Circles are tested against their bounding square.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Anything with axis-aligned edges
pub trait Bounds {
    fn top(&self) -> f32;
    fn bottom(&self) -> f32;
    fn left(&self) -> f32;
    fn right(&self) -> f32;

    /// Center of the bounding box
    fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }
}

/// Strict AABB intersection; touching edges do not overlap
#[inline]
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Bounds + ?Sized,
    B: Bounds + ?Sized,
{
    a.bottom() > b.top() && a.right() > b.left() && a.left() < b.right() && a.top() < b.bottom()
}

/// Rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size: size.max(Vec2::ZERO),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }
}

impl Bounds for Rect {
    #[inline]
    fn top(&self) -> f32 {
        self.pos.y
    }
    #[inline]
    fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
    #[inline]
    fn left(&self) -> f32 {
        self.pos.x
    }
    #[inline]
    fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Circle anchored at its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub pos: Vec2,
    radius: f32,
}

impl Circle {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius: radius.max(0.0),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Diameter on both axes
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }
}

impl Bounds for Circle {
    #[inline]
    fn top(&self) -> f32 {
        self.pos.y - self.radius
    }
    #[inline]
    fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
    #[inline]
    fn left(&self) -> f32 {
        self.pos.x - self.radius
    }
    #[inline]
    fn right(&self) -> f32 {
        self.pos.x + self.radius
    }
    #[inline]
    fn center(&self) -> Vec2 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(40.0, 12.0));
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 32.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 50.0);
        assert_eq!(r.center(), Vec2::new(30.0, 26.0));
    }

    #[test]
    fn test_circle_edges_follow_position() {
        let mut c = Circle::new(Vec2::new(5.0, 5.0), 3.0);
        assert_eq!(c.left(), 2.0);
        c.pos.x = 10.0;
        assert_eq!(c.left(), 7.0);
        assert_eq!(c.right(), 13.0);
        assert_eq!(c.size(), Vec2::splat(6.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!overlaps(&a, &b));

        let c = Rect::new(Vec2::new(9.5, 0.0), Vec2::new(10.0, 10.0));
        assert!(overlaps(&a, &c));
    }

    #[test]
    fn test_circle_uses_bounding_square() {
        // Corner of the bounding square overlaps even though the true circle does not
        let block = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        let ball = Circle::new(Vec2::new(7.5, 7.5), 3.0);
        assert!(overlaps(&ball, &block));
    }

    #[test]
    fn test_negative_size_is_clamped() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(-5.0, 3.0));
        assert_eq!(r.size(), Vec2::new(0.0, 3.0));
    }
}
