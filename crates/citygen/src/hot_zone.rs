//! The hot zone: the box around the central streets where the fancy
//! buildings go. Camera collaborators also use it to fly without clipping.

use bevy::prelude::*;

/// Axis-aligned box on the ground plane. `x` is world x, `y` is world z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotZone {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for HotZone {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl HotZone {
    /// Contains nothing; grows to fit the first point added.
    pub const EMPTY: HotZone = HotZone {
        min: Vec2::splat(f32::MAX),
        max: Vec2::splat(f32::MIN),
    };

    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self::EMPTY.with_point(a).with_point(b)
    }

    pub fn with_point(self, p: Vec2) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Inclusive containment test for a grid cell.
    pub fn contains_cell(&self, x: i32, z: i32) -> bool {
        let (x, z) = (x as f32, z as f32);
        x >= self.min.x && x <= self.max.x && z >= self.min.y && z <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}
