//! Axis-aligned rectangle geometry for the hazard field
//!
//! Screen coordinates: Y grows downward, so `top()` is the smallest Y and
//! the water "rises" as its level decreases. Every entity in the field
//! (rooftops, lightning flashes, the drone's bounding box) is a `Rect`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (position + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Top edge (smallest Y - highest on screen)
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Bottom edge (largest Y)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Check if a point lies inside the rectangle (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Check if two rectangles overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Clamp a point to the rectangle shrunk by `margin` on all sides
    pub fn clamp_point(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left() + margin, self.right() - margin),
            p.y.clamp(self.top() + margin, self.bottom() - margin),
        )
    }
}
