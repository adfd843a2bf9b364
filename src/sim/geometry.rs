//! Axis-aligned boxes and the shared overlap test
//!
//! Every collision site in the simulation goes through [`overlaps`] so the
//! player, projectile and obstacle checks can never disagree on edge cases.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{TuningError, positive};

/// Logical playfield size, supplied by the environment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions must be finite and positive
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("field.width", self.width)?;
        positive("field.height", self.height)
    }
}

impl Default for Field {
    fn default() -> Self {
        use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
        Self::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

/// Axis-aligned bounding box, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    /// Negative or NaN extents collapse to zero
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size: size.max(Vec2::ZERO),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Horizontal center of the box
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x * 0.5
    }
}

/// Inclusive-edge overlap test: boxes that merely touch count as overlapping
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.left() <= b.right() && a.right() >= b.left() && a.top() <= b.bottom() && a.bottom() >= b.top()
}
