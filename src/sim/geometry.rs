//! Axis-aligned rectangle geometry
//!
//! Every sprite is treated as a square anchored at its top-left corner.
//! All overlap tests use strict comparisons, so boxes that merely share an
//! edge do not collide.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BOUNDARY_INSET, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Stand-in for an unbounded rectangle edge
pub const OPEN: i32 = 100_000;

/// An axis-aligned rectangle given by its edges (left/top inclusive corner,
/// right/bottom exclusive corner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Square box of side `size` at top-left `pos`
    pub fn square(pos: IVec2, size: i32) -> Self {
        Self::new(pos.x, pos.y, pos.x + size, pos.y + size)
    }

    /// Strict AABB overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// The four screen-edge walls, each `BOUNDARY_INSET` thick and open-ended outward
pub const SCREEN_BOUNDARY: [Rect; 4] = [
    // West
    Rect::new(-OPEN, -OPEN, BOUNDARY_INSET, OPEN),
    // East
    Rect::new(SCREEN_WIDTH - BOUNDARY_INSET, -OPEN, OPEN, OPEN),
    // North
    Rect::new(-OPEN, -OPEN, OPEN, BOUNDARY_INSET),
    // South
    Rect::new(-OPEN, SCREEN_HEIGHT - BOUNDARY_INSET, OPEN, OPEN),
];

/// AABB test between two square sprites
///
/// The caller supplies the size matching each sprite's current facing.
#[inline]
pub fn intersects(a: IVec2, a_size: i32, b: IVec2, b_size: i32) -> bool {
    Rect::square(a, a_size).overlaps(&Rect::square(b, b_size))
}

/// True if a square sprite touches a screen boundary or any of `zones`
pub fn is_out_of_bounds(zones: &[Rect], pos: IVec2, size: i32) -> bool {
    let sprite = Rect::square(pos, size);
    SCREEN_BOUNDARY
        .iter()
        .chain(zones.iter())
        .any(|wall| sprite.overlaps(wall))
}
