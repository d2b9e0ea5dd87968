//! Road builder: lays street bands (sidewalk + two lane directions) across
//! the whole map at randomized intervals.

use bevy::prelude::*;

use crate::city_rng::CityRng;
use crate::claims::{ClaimGrid, CLAIM_ROAD, CLAIM_WALK, ROAD_EAST, ROAD_NORTH, ROAD_SOUTH, ROAD_WEST};
use crate::config::{
    CityConfig, MAIN_AVENUE_LEAD, MAIN_AVENUE_WIDTH, MAX_TRAFFIC_LANES, MIN_ROAD_CROSS_SECTION,
    STREET_SPACING_JITTER, STREET_SPACING_MIN, STREET_WIDTH_JITTER, STREET_WIDTH_MIN,
};
use crate::hot_zone::HotZone;

/// How a road's cross-section is divided up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneSplit {
    /// Sidewalk width on each side.
    pub sidewalk: i32,
    /// Lane band width for each direction.
    pub lanes: i32,
    /// Center divider width (0 or 1).
    pub divider: i32,
}

impl LaneSplit {
    /// `None` when the cross-section is too narrow for a road.
    pub fn for_cross_section(cross: i32) -> Option<LaneSplit> {
        if cross < MIN_ROAD_CROSS_SECTION {
            return None;
        }
        let divider = cross % 2;
        let lanes = cross - divider;
        // Lanes beyond the traffic limit become sidewalk.
        let sidewalk = (lanes - MAX_TRAFFIC_LANES).max(2);
        Some(LaneSplit {
            sidewalk: sidewalk / 2,
            lanes: (lanes - sidewalk) / 2,
            divider,
        })
    }

    pub fn total(&self) -> i32 {
        self.sidewalk * 2 + self.lanes * 2 + self.divider
    }
}

/// Lay one road over the rectangle. The longer side is the road's length.
pub fn build_road(grid: &mut ClaimGrid, x: i32, z: i32, width: i32, depth: i32) {
    let horizontal = width > depth;
    let cross = if horizontal { depth } else { width };
    let Some(split) = LaneSplit::for_cross_section(cross) else {
        return;
    };

    grid.claim(x, z, width, depth, CLAIM_WALK);

    let first = split.sidewalk;
    let second = split.sidewalk + split.lanes + split.divider;
    if horizontal {
        grid.claim(x, z + first, width, split.lanes, CLAIM_ROAD | ROAD_WEST);
        grid.claim(x, z + second, width, split.lanes, CLAIM_ROAD | ROAD_EAST);
    } else {
        grid.claim(x + first, z, split.lanes, depth, CLAIM_ROAD | ROAD_SOUTH);
        grid.claim(x + second, z, split.lanes, depth, CLAIM_ROAD | ROAD_NORTH);
    }
}

/// Centerlines of the streets that outline the hot zone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreetBounds {
    pub north: Option<f32>,
    pub south: Option<f32>,
    pub west: Option<f32>,
    pub east: Option<f32>,
}

impl StreetBounds {
    /// Box spanned by the tracked streets. Missing streets fall back to the
    /// quarter lines of the map.
    pub fn hot_zone(&self, config: &CityConfig) -> HotZone {
        let quarter = (config.world_half() / 2) as f32;
        let three_quarters = (config.world_half() + config.world_half() / 2) as f32;
        let west = self.west.unwrap_or(quarter);
        let north = self.north.unwrap_or(quarter);
        let east = self.east.unwrap_or(three_quarters);
        let south = self.south.unwrap_or(three_quarters);
        HotZone::from_corners(Vec2::new(west, north), Vec2::new(east, south))
    }
}

/// Run the road builder along both axes, one main avenue per axis.
pub fn place_roads(grid: &mut ClaimGrid, rng: &mut CityRng, config: &CityConfig) -> StreetBounds {
    let size = config.size_i32();
    let edge = config.edge_i32();
    let half = config.world_half();
    let mut bounds = StreetBounds::default();

    // East-west streets, stepping along z.
    let mut avenue_done = false;
    let mut z = edge;
    while z < size - edge {
        if !avenue_done && z > half - MAIN_AVENUE_LEAD {
            build_road(grid, 0, z, size, MAIN_AVENUE_WIDTH);
            z += MAIN_AVENUE_WIDTH + 1;
            avenue_done = true;
        } else {
            let depth = STREET_WIDTH_MIN + rng.below(STREET_WIDTH_JITTER);
            let center = (z + depth / 2) as f32;
            if z < half / 2 {
                bounds.north = Some(center);
            }
            if z < size - half / 2 {
                bounds.south = Some(center);
            }
            build_road(grid, 0, z, size, depth);
        }
        z += STREET_SPACING_MIN + rng.below(STREET_SPACING_JITTER);
    }

    // North-south streets, stepping along x.
    avenue_done = false;
    let mut x = edge;
    while x < size - edge {
        if !avenue_done && x > half - MAIN_AVENUE_LEAD {
            build_road(grid, x, 0, MAIN_AVENUE_WIDTH, size);
            x += MAIN_AVENUE_WIDTH + 1;
            avenue_done = true;
        } else {
            let width = STREET_WIDTH_MIN + rng.below(STREET_WIDTH_JITTER);
            let center = (x + width / 2) as f32;
            if x <= half / 2 {
                bounds.west = Some(center);
            }
            if x <= half + half / 2 {
                bounds.east = Some(center);
            }
            build_road(grid, x, 0, width, size);
        }
        x += STREET_SPACING_MIN + rng.below(STREET_SPACING_JITTER);
    }

    bounds
}
