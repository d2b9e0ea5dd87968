//! Building placer: recursively cuts plots into lots and picks a style for
//! each, keeping tower, blocky and modern buildings in rough balance.

use crate::city_rng::CityRng;
use crate::claims::{ClaimGrid, CLAIM_BUILDING};
use crate::config::{
    CityConfig, DOWNTOWN_ATTEMPTS, HEIGHT_JITTER, MAX_PLOT_AREA, MIN_PLOT_AREA, MIN_PLOT_SIDE,
    MODERN_MIN_WIDTH, SKYSCRAPER_TARGET, SQUARE_TOLERANCE,
};
use crate::layout::{BuildingDescriptor, BuildingStyle, LayoutSink};
use crate::palette::light_color;
use crate::plots::{find_plot, Plot};

/// Per-cycle style tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleCounts {
    pub modern: u32,
    pub tower: u32,
    pub blocky: u32,
    pub skyscrapers: u32,
}

impl StyleCounts {
    /// Take the least-used of tower and blocky, modern last, and count it.
    pub fn next_balanced(&mut self) -> BuildingStyle {
        if self.tower < self.modern && self.tower < self.blocky {
            self.tower += 1;
            BuildingStyle::Tower
        } else if self.blocky < self.modern {
            self.blocky += 1;
            BuildingStyle::Blocky
        } else {
            self.modern += 1;
            BuildingStyle::Modern
        }
    }
}

/// Place buildings on `plot`, subdividing it first if it is too large.
/// Returns the number of buildings emitted.
pub fn place_building(
    plot: Plot,
    grid: &mut ClaimGrid,
    rng: &mut CityRng,
    counts: &mut StyleCounts,
    sink: &mut impl LayoutSink,
) -> usize {
    let color = light_color(rng.next());
    let seed = rng.next();

    if plot.width < MIN_PLOT_SIDE || plot.depth < MIN_PLOT_SIDE {
        return 0;
    }

    if plot.area() > MAX_PLOT_AREA {
        let (a, b) = if rng.coin_flip() {
            plot.split_width()
        } else {
            plot.split_depth()
        };
        return place_building(a, grid, rng, counts, sink) + place_building(b, grid, rng, counts, sink);
    }

    // Plot Finder only guarantees the cross through its seed is free.
    if plot.area() < MIN_PLOT_AREA || grid.is_claimed(plot.x, plot.z, plot.width, plot.depth) {
        return 0;
    }

    // Claimed up front so nothing else lands here, even when the style rule
    // below leaves part of the lot unused.
    grid.claim(plot.x, plot.z, plot.width, plot.depth, CLAIM_BUILDING);

    let square = (plot.width - plot.depth).abs() < SQUARE_TOLERANCE;
    let style = if square && plot.width > MODERN_MIN_WIDTH {
        counts.modern += 1;
        BuildingStyle::Modern
    } else {
        counts.next_balanced()
    };
    counts.skyscrapers += 1;

    sink.emit_building(BuildingDescriptor {
        style,
        x: plot.x,
        z: plot.z,
        height: style.base_height() + rng.below(HEIGHT_JITTER),
        width: plot.width,
        depth: plot.depth,
        seed,
        color,
    });
    1
}

/// Pack the middle of the map with skyscrapers.
///
/// Random cells in the central half seed the plot finder until enough
/// skyscrapers are counted or the attempts run out.
pub fn place_downtown(
    grid: &mut ClaimGrid,
    rng: &mut CityRng,
    counts: &mut StyleCounts,
    config: &CityConfig,
    sink: &mut impl LayoutSink,
) -> usize {
    let half = config.world_half() as u32;
    let quarter = half / 2;
    let mut placed = 0;
    let mut attempts = 0;

    while counts.skyscrapers < SKYSCRAPER_TARGET && attempts < DOWNTOWN_ATTEMPTS {
        let x = (quarter + rng.next() % half) as i32;
        let z = (quarter + rng.next() % half) as i32;
        if grid.cell(x, z) == 0 {
            let plot = find_plot(grid, x, z);
            placed += place_building(plot, grid, rng, counts, sink);
            counts.skyscrapers += 1;
        }
        attempts += 1;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::CLAIM_ROAD;
    use crate::layout::CityLayout;

    fn place(plot: Plot, grid: &mut ClaimGrid, counts: &mut StyleCounts) -> CityLayout {
        let mut rng = CityRng::from_seed_u64(42);
        let mut layout = CityLayout::default();
        place_building(plot, grid, &mut rng, counts, &mut layout);
        layout
    }

    #[test]
    fn test_thin_plot_dropped() {
        let mut grid = ClaimGrid::new(64);
        let mut counts = StyleCounts::default();
        let layout = place(Plot::new(0, 0, 9, 40), &mut grid, &mut counts);
        assert!(layout.buildings.is_empty());
        assert_eq!(grid.unclaimed_count(), 64 * 64);
    }

    #[test]
    fn test_minimum_plot_accepted() {
        let mut grid = ClaimGrid::new(64);
        let mut counts = StyleCounts::default();
        let layout = place(Plot::new(0, 0, 10, 10), &mut grid, &mut counts);
        assert_eq!(layout.buildings.len(), 1);
        assert_eq!(counts.skyscrapers, 1);
    }

    #[test]
    fn test_accepted_plot_is_claimed() {
        let mut grid = ClaimGrid::new(64);
        let mut counts = StyleCounts::default();
        let layout = place(Plot::new(5, 5, 20, 15), &mut grid, &mut counts);
        assert_eq!(layout.buildings.len(), 1);
        assert_eq!(grid.count_with(CLAIM_BUILDING), 300);
        let b = layout.buildings[0];
        assert_eq!((b.x, b.z, b.width, b.depth), (5, 5, 20, 15));
    }

    #[test]
    fn test_large_square_plot_is_modern() {
        let mut grid = ClaimGrid::new(64);
        let mut counts = StyleCounts::default();
        let layout = place(Plot::new(0, 0, 25, 28), &mut grid, &mut counts);
        assert_eq!(layout.buildings[0].style, BuildingStyle::Modern);
        assert_eq!(counts.modern, 1);
        let h = layout.buildings[0].height;
        assert!((45..55).contains(&h), "height {h}");
    }

    #[test]
    fn test_oversized_plot_is_subdivided() {
        let mut grid = ClaimGrid::new(128);
        let mut counts = StyleCounts::default();
        let layout = place(Plot::new(0, 0, 80, 60), &mut grid, &mut counts);
        assert!(layout.buildings.len() >= 2);
        for b in &layout.buildings {
            assert!(b.width * b.depth <= MAX_PLOT_AREA, "{b:?}");
            assert!(b.x >= 0 && b.x + b.width <= 80);
            assert!(b.z >= 0 && b.z + b.depth <= 60);
        }
        // Lots never overlap: claimed cells equal the summed footprints.
        let footprint: i32 = layout.buildings.iter().map(|b| b.width * b.depth).sum();
        assert_eq!(grid.count_with(CLAIM_BUILDING) as i32, footprint);
    }

    #[test]
    fn test_overlapping_lot_dropped() {
        let mut grid = ClaimGrid::new(64);
        grid.claim(30, 30, 2, 2, CLAIM_ROAD);
        let mut counts = StyleCounts::default();
        let layout = place(Plot::new(25, 25, 20, 20), &mut grid, &mut counts);
        assert!(layout.buildings.is_empty());
        assert_eq!(grid.count_with(CLAIM_BUILDING), 0);
    }

    #[test]
    fn test_balanced_styles_stay_within_one() {
        let mut counts = StyleCounts::default();
        for _ in 0..300 {
            counts.next_balanced();
            let max = counts.tower.max(counts.blocky).max(counts.modern);
            let min = counts.tower.min(counts.blocky).min(counts.modern);
            assert!(max - min <= 1, "{counts:?}");
        }
    }

    #[test]
    fn test_balanced_after_modern_shortcut_prefers_others() {
        let mut counts = StyleCounts {
            modern: 3,
            ..StyleCounts::default()
        };
        assert_eq!(counts.next_balanced(), BuildingStyle::Blocky);
        assert_eq!(counts.next_balanced(), BuildingStyle::Tower);
    }

    #[test]
    fn test_downtown_stays_in_center() {
        let config = CityConfig::small(256);
        let mut grid = ClaimGrid::new(config.world_size);
        // Fence off the center so plots stay bounded.
        grid.claim(0, 0, 256, 64, CLAIM_BUILDING);
        grid.claim(0, 192, 256, 64, CLAIM_BUILDING);
        grid.claim(0, 0, 64, 256, CLAIM_BUILDING);
        grid.claim(192, 0, 64, 256, CLAIM_BUILDING);
        let mut rng = CityRng::from_seed_u64(6);
        let mut counts = StyleCounts::default();
        let mut layout = CityLayout::default();
        let placed = place_downtown(&mut grid, &mut rng, &mut counts, &config, &mut layout);
        assert_eq!(placed, layout.buildings.len());
        assert!(placed > 0);
        for b in &layout.buildings {
            assert!(b.x >= 64 && b.x + b.width <= 192, "{b:?}");
            assert!(b.z >= 64 && b.z + b.depth <= 192, "{b:?}");
        }
    }
}
