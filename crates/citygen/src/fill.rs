//! Blanket fill: after roads and downtown are placed, every remaining gap
//! gets a small building or is written off as vacant land.

use crate::city_rng::CityRng;
use crate::claims::{ClaimGrid, CLAIM_BUILDING};
use crate::config::{
    CityConfig, FILL_COLUMN_STRIDE, FILL_EDGE_HEIGHT, FILL_EDGE_MARGIN, FILL_MIN_SIDE,
    FILL_ROW_STRIDE, FILL_SIZE_JITTER, FILL_SIZE_MIN,
};
use crate::hot_zone::HotZone;
use crate::layout::{BuildingDescriptor, BuildingStyle, LayoutSink};
use crate::palette::light_color;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    pub buildings: usize,
    /// Cells claimed without a building on them.
    pub vacant_cells: usize,
}

/// Height budget for a fill lot at `(x, z)` with the given footprint.
fn height_budget(x: i32, z: i32, width: i32, depth: i32, rng: &mut CityRng, config: &CityConfig) -> i32 {
    let size = config.size_i32();
    let near_edge = x < FILL_EDGE_MARGIN
        || z < FILL_EDGE_MARGIN
        || x > size - FILL_EDGE_MARGIN
        || z > size - FILL_EDGE_MARGIN;
    if near_edge {
        rng.below(FILL_EDGE_HEIGHT)
    } else if x < config.world_half() / 2 {
        width.min(depth) / 2
    } else {
        width.min(depth)
    }
}

/// Try shrinking candidate lots at `(x, z)` until one fits. Returns whether
/// a building went in.
fn fill_lot(
    x: i32,
    z: i32,
    grid: &mut ClaimGrid,
    rng: &mut CityRng,
    hot_zone: &HotZone,
    config: &CityConfig,
    sink: &mut impl LayoutSink,
) -> bool {
    let size = config.size_i32();
    let mut width = FILL_SIZE_MIN + rng.below(FILL_SIZE_JITTER);
    let mut depth = FILL_SIZE_MIN + rng.below(FILL_SIZE_JITTER);
    let budget = height_budget(x, z, width, depth, rng, config);

    // Lots never hang off the map.
    width = width.min(size - x);
    depth = depth.min(size - z);

    while width > FILL_MIN_SIDE && depth > FILL_MIN_SIDE {
        if grid.is_claimed(x, z, width, depth) {
            width -= 1;
            depth -= 1;
            continue;
        }

        grid.claim(x, z, width, depth, CLAIM_BUILDING);
        let color = light_color(rng.next());

        let building = if !hot_zone.contains_cell(x, z) {
            let height = BuildingStyle::Simple.base_height() + rng.below(budget) + rng.below(budget);
            BuildingDescriptor {
                style: BuildingStyle::Simple,
                x: x + 1,
                z: z + 1,
                height,
                width: width - 2,
                depth: depth - 2,
                seed: rng.next(),
                color,
            }
        } else {
            let height = 15 + rng.below(15);
            let (style, inset) = if rng.coin_flip() {
                (BuildingStyle::Tower, 2)
            } else {
                (BuildingStyle::Blocky, 4)
            };
            BuildingDescriptor {
                style,
                x: x + 1,
                z: z + 1,
                height,
                width: width - inset,
                depth: depth - inset,
                seed: rng.next(),
                color,
            }
        };
        sink.emit_building(building);
        return true;
    }
    false
}

/// Cover every still-unclaimed cell.
///
/// The scan visits cells in column order. Inside the edge band it strides
/// ahead, leaving gaps that the final sweep claims as vacant land.
pub fn fill_remaining(
    grid: &mut ClaimGrid,
    rng: &mut CityRng,
    hot_zone: &HotZone,
    config: &CityConfig,
    sink: &mut impl LayoutSink,
) -> FillReport {
    let size = config.size_i32();
    let edge = config.edge_i32();
    let in_edge_band = |v: i32| v < edge || v > size - edge;
    let mut report = FillReport::default();

    let mut x = 0;
    while x < size {
        let mut z = 0;
        while z < size {
            if grid.cell(x, z) == 0 && fill_lot(x, z, grid, rng, hot_zone, config, sink) {
                report.buildings += 1;
            }
            if in_edge_band(z) {
                z += FILL_ROW_STRIDE;
            }
            z += 1;
        }
        if in_edge_band(x) {
            x += FILL_COLUMN_STRIDE;
        }
        x += 1;
    }

    report.vacant_cells = claim_vacant(grid);
    report
}

/// Mark every unclaimed cell as building land. Returns how many there were.
pub fn claim_vacant(grid: &mut ClaimGrid) -> usize {
    let size = grid.size() as i32;
    let mut vacant = 0;
    for z in 0..size {
        for x in 0..size {
            if grid.cell(x, z) == 0 {
                grid.claim(x, z, 1, 1, CLAIM_BUILDING);
                vacant += 1;
            }
        }
    }
    vacant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::CLAIM_ROAD;
    use crate::layout::CityLayout;
    use bevy::prelude::Vec2;

    fn run(grid: &mut ClaimGrid, hot_zone: HotZone, config: &CityConfig) -> (FillReport, CityLayout) {
        let mut rng = CityRng::from_seed_u64(config.seed);
        let mut layout = CityLayout::default();
        let report = fill_remaining(grid, &mut rng, &hot_zone, config, &mut layout);
        (report, layout)
    }

    #[test]
    fn test_fill_covers_empty_grid() {
        let config = CityConfig::small(128);
        let mut grid = ClaimGrid::new(config.world_size);
        let (report, layout) = run(&mut grid, HotZone::EMPTY, &config);
        assert_eq!(grid.unclaimed_count(), 0);
        assert_eq!(report.buildings, layout.buildings.len());
        assert!(report.buildings > 0);
    }

    #[test]
    fn test_fill_outside_hot_zone_is_simple() {
        let config = CityConfig::small(128);
        let mut grid = ClaimGrid::new(config.world_size);
        let (_, layout) = run(&mut grid, HotZone::EMPTY, &config);
        assert_eq!(layout.count_style(BuildingStyle::Simple), layout.buildings.len());
        for b in &layout.buildings {
            assert!(b.width > 0 && b.depth > 0, "{b:?}");
            assert!(b.height >= BuildingStyle::Simple.base_height());
        }
    }

    #[test]
    fn test_fill_inside_hot_zone_is_fancy() {
        let config = CityConfig::small(128);
        let mut grid = ClaimGrid::new(config.world_size);
        let zone = HotZone::from_corners(Vec2::ZERO, Vec2::splat(128.0));
        let (_, layout) = run(&mut grid, zone, &config);
        assert!(!layout.buildings.is_empty());
        for b in &layout.buildings {
            assert!(matches!(b.style, BuildingStyle::Tower | BuildingStyle::Blocky), "{b:?}");
            assert!((15..30).contains(&b.height), "{b:?}");
        }
    }

    #[test]
    fn test_fill_never_overwrites_roads() {
        let config = CityConfig::small(96);
        let mut grid = ClaimGrid::new(config.world_size);
        grid.claim(0, 40, 96, 6, CLAIM_ROAD);
        run(&mut grid, HotZone::EMPTY, &config);
        for x in 0..96 {
            for z in 40..46 {
                assert!(!grid.has(x, z, CLAIM_BUILDING), "({x}, {z})");
            }
        }
        assert_eq!(grid.unclaimed_count(), 0);
    }

    #[test]
    fn test_fill_lots_stay_on_map() {
        let config = CityConfig::small(100);
        let mut grid = ClaimGrid::new(config.world_size);
        let (_, layout) = run(&mut grid, HotZone::EMPTY, &config);
        for b in &layout.buildings {
            assert!(b.x + b.width <= 100 && b.z + b.depth <= 100, "{b:?}");
        }
    }

    #[test]
    fn test_claim_vacant_counts_gaps() {
        let mut grid = ClaimGrid::new(16);
        grid.claim(0, 0, 16, 8, CLAIM_ROAD);
        assert_eq!(claim_vacant(&mut grid), 128);
        assert_eq!(grid.unclaimed_count(), 0);
        assert_eq!(claim_vacant(&mut grid), 0);
    }
}
