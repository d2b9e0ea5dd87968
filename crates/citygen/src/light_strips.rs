//! Street-light runs along sidewalks.
//!
//! A run starts at a sidewalk cell sitting on a road corner and extends
//! along the sidewalk until it meets a road. Runs are always walked in
//! increasing coordinate order; [`Facing`] only decides which side of the
//! run the strip is nudged toward.

use bevy::prelude::*;

use crate::claims::{ClaimGrid, CLAIM_ROAD, CLAIM_WALK};
use crate::config::{LIGHT_STRIP_MIN_LENGTH, LIGHT_STRIP_SIZE_ADJUST, LIGHT_STRIP_TIER};
use crate::layout::{LayoutSink, LightStripDescriptor};
use crate::palette::street_light_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    /// Per-cell step while walking the run.
    pub fn step(self) -> (i32, i32) {
        match self {
            Facing::North | Facing::South => (0, 1),
            Facing::East | Facing::West => (1, 0),
        }
    }
}

/// Emit a light strip starting at `(x, z)` if the sidewalk run is long
/// enough. Returns the run length so the scanner can skip past it.
pub fn place_light_strip(
    grid: &ClaimGrid,
    x: i32,
    z: i32,
    facing: Facing,
    sink: &mut impl LayoutSink,
) -> i32 {
    let size = grid.size() as i32;
    let (dx, dz) = facing.step();
    let (mut x2, mut z2) = (x, z);
    let mut length = 0;

    while x2 > 0 && x2 < size && z2 > 0 && z2 < size {
        if grid.has(x2, z2, CLAIM_ROAD) {
            break;
        }
        length += 1;
        x2 += dx;
        z2 += dz;
    }

    if length < LIGHT_STRIP_MIN_LENGTH {
        return length;
    }

    let width = (x2 - x).abs().max(1) as f32;
    let depth = (z2 - z).abs().max(1) as f32;
    let (x, z) = (x as f32, z as f32);
    let adjust = LIGHT_STRIP_SIZE_ADJUST;

    // Pushed off the road edge to avoid z-fighting with the asphalt.
    let (origin, width, depth) = match facing {
        Facing::East => (Vec2::new(x, z - adjust), width, depth + adjust),
        Facing::West => (Vec2::new(x, z), width, depth + adjust),
        Facing::North => (Vec2::new(x, z), width + adjust, depth),
        Facing::South => (Vec2::new(x - adjust, z), width + adjust, depth),
    };

    sink.emit_light_strip(LightStripDescriptor {
        origin,
        width,
        depth,
        tier: LIGHT_STRIP_TIER,
        color: street_light_color(),
    });
    length
}

/// Which side of a sidewalk cell has road, if exactly one does.
fn corner_side(grid: &ClaimGrid, before: (i32, i32), after: (i32, i32)) -> Option<bool> {
    let road_before = grid.has(before.0, before.1, CLAIM_ROAD);
    let road_after = grid.has(after.0, after.1, CLAIM_ROAD);
    match (road_before, road_after) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        // Both: a median. Neither: open sidewalk.
        _ => None,
    }
}

fn is_bare_sidewalk(grid: &ClaimGrid, x: i32, z: i32) -> bool {
    let cell = grid.cell(x, z);
    cell & CLAIM_WALK != 0 && cell & CLAIM_ROAD == 0
}

/// Scan the whole grid for sidewalk corners and line them with lights.
/// Returns the number of strips emitted.
pub fn place_lights(grid: &ClaimGrid, sink: &mut impl LayoutSink) -> usize {
    let size = grid.size() as i32;
    let mut strips = 0;

    // Roads to the east or west: runs go along z.
    for x in 1..size - 1 {
        let mut z = 0;
        while z < size {
            if is_bare_sidewalk(grid, x, z) {
                if let Some(road_west) = corner_side(grid, (x - 1, z), (x + 1, z)) {
                    let facing = if road_west { Facing::South } else { Facing::North };
                    let run = place_light_strip(grid, x, z, facing, sink);
                    if run >= LIGHT_STRIP_MIN_LENGTH {
                        strips += 1;
                    }
                    z += run;
                }
            }
            z += 1;
        }
    }

    // Roads to the north or south: runs go along x.
    for z in 1..size - 1 {
        let mut x = 1;
        while x < size - 1 {
            if is_bare_sidewalk(grid, x, z) {
                if let Some(road_north) = corner_side(grid, (x, z - 1), (x, z + 1)) {
                    let facing = if road_north { Facing::East } else { Facing::West };
                    let run = place_light_strip(grid, x, z, facing, sink);
                    if run >= LIGHT_STRIP_MIN_LENGTH {
                        strips += 1;
                    }
                    x += run;
                }
            }
            x += 1;
        }
    }

    strips
}
