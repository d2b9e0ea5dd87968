//! The regeneration pipeline and the state it owns.
//!
//! ```text
//! reset grid → roads → hot zone → lights → downtown → blanket fill
//! ```
//!
//! Every stage takes its slice of [`CityState`] by `&mut` and runs to
//! completion; nothing here yields or can be cancelled.

use bevy::prelude::*;

use crate::buildings::{place_downtown, StyleCounts};
use crate::city_rng::CityRng;
use crate::claims::ClaimGrid;
use crate::config::CityConfig;
use crate::events::{CityCleared, CityRegenerated};
use crate::fill::fill_remaining;
use crate::hot_zone::HotZone;
use crate::layout::{CityLayout, LayoutSink};
use crate::light_strips::place_lights;
use crate::palette::roll_bloom_color;
use crate::readiness::SceneReadiness;
use crate::roads::place_roads;

// ---------------------------------------------------------------------------
// CityState resource
// ---------------------------------------------------------------------------

/// The generator's working state: grid, random stream and per-cycle tallies.
#[derive(Resource, Debug, Clone)]
pub struct CityState {
    pub grid: ClaimGrid,
    pub rng: CityRng,
    pub counts: StyleCounts,
    pub hot_zone: HotZone,
    pub bloom_color: Color,
    /// Number of completed regenerations.
    pub generation: u64,
    logo_index: u32,
}

impl CityState {
    pub fn new(config: &CityConfig) -> Self {
        Self {
            grid: ClaimGrid::new(config.world_size),
            rng: CityRng::from_seed_u64(config.seed),
            counts: StyleCounts::default(),
            hot_zone: HotZone::EMPTY,
            bloom_color: Color::WHITE,
            generation: 0,
            logo_index: 0,
        }
    }

    /// Flags at a clamped coordinate.
    pub fn cell_flags_at(&self, x: i32, z: i32) -> u8 {
        self.grid.cell(x, z)
    }

    /// Hand out the next rooftop logo index. Restarts at 0 every cycle.
    pub fn next_logo_index(&mut self) -> u32 {
        let index = self.logo_index;
        self.logo_index += 1;
        index
    }
}

/// What one regeneration produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegenerationReport {
    pub generation: u64,
    pub seed: u64,
    pub downtown_buildings: usize,
    pub fill_buildings: usize,
    pub light_strips: usize,
    pub vacant_cells: usize,
    pub hot_zone: HotZone,
}

impl RegenerationReport {
    pub fn buildings(&self) -> usize {
        self.downtown_buildings + self.fill_buildings
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Wipe the grid and the per-cycle tallies.
fn reset_cycle(state: &mut CityState, config: &CityConfig) {
    if config.fixed_seed {
        state.rng.reseed(config.seed);
    }
    state.counts = StyleCounts::default();
    state.logo_index = 0;
    if state.grid.size() == config.world_size {
        state.grid.reset();
    } else {
        state.grid = ClaimGrid::new(config.world_size);
    }
}

/// Build a complete city into `state`, streaming descriptors into `sink`.
pub fn regenerate(
    state: &mut CityState,
    config: &CityConfig,
    sink: &mut impl LayoutSink,
) -> RegenerationReport {
    reset_cycle(state, config);
    state.bloom_color = roll_bloom_color(&mut state.rng);

    let streets = place_roads(&mut state.grid, &mut state.rng, config);
    state.hot_zone = streets.hot_zone(config);

    let light_strips = place_lights(&state.grid, sink);
    let downtown_buildings = place_downtown(
        &mut state.grid,
        &mut state.rng,
        &mut state.counts,
        config,
        sink,
    );
    let fill = fill_remaining(
        &mut state.grid,
        &mut state.rng,
        &state.hot_zone,
        config,
        sink,
    );

    state.generation += 1;
    let report = RegenerationReport {
        generation: state.generation,
        seed: config.seed,
        downtown_buildings,
        fill_buildings: fill.buildings,
        light_strips,
        vacant_cells: fill.vacant_cells,
        hot_zone: state.hot_zone,
    };

    info!(
        "city generation {} (seed {}): {} buildings ({} downtown), {} light strips, {} vacant cells, hot zone {:?}..{:?}",
        report.generation,
        report.seed,
        report.buildings(),
        report.downtown_buildings,
        report.light_strips,
        report.vacant_cells,
        report.hot_zone.min,
        report.hot_zone.max,
    );
    report
}

// ---------------------------------------------------------------------------
// ECS glue
// ---------------------------------------------------------------------------

/// Regenerate into the [`CityLayout`] resource and notify collaborators.
///
/// Readiness is cleared before anything is rebuilt, so the lifecycle keeps
/// the scene hidden until collaborators have caught up.
pub(crate) fn run_regeneration(
    state: &mut CityState,
    layout: &mut CityLayout,
    readiness: &mut SceneReadiness,
    config: &CityConfig,
    cleared: &mut EventWriter<CityCleared>,
    regenerated: &mut EventWriter<CityRegenerated>,
) -> RegenerationReport {
    cleared.send(CityCleared {
        generation: state.generation,
    });
    readiness.invalidate();
    layout.clear();

    let report = regenerate(state, config, layout);
    regenerated.send(CityRegenerated {
        generation: report.generation,
        seed: report.seed,
        buildings: layout.buildings.len(),
        light_strips: layout.light_strips.len(),
    });
    report
}

/// Startup: build the first city while the lifecycle holds full opacity.
pub(crate) fn generate_initial_city(
    config: Res<CityConfig>,
    mut state: ResMut<CityState>,
    mut layout: ResMut<CityLayout>,
    mut readiness: ResMut<SceneReadiness>,
    mut cleared: EventWriter<CityCleared>,
    mut regenerated: EventWriter<CityRegenerated>,
) {
    run_regeneration(
        &mut state,
        &mut layout,
        &mut readiness,
        &config,
        &mut cleared,
        &mut regenerated,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{CLAIM_BUILDING, CLAIM_ROAD, CLAIM_WALK};
    use crate::layout::BuildingStyle;

    fn small() -> CityConfig {
        CityConfig {
            fixed_seed: true,
            ..CityConfig::small(256)
        }
    }

    #[test]
    fn test_regenerate_covers_every_cell() {
        let config = small();
        let mut state = CityState::new(&config);
        let mut layout = CityLayout::default();
        regenerate(&mut state, &config, &mut layout);
        assert_eq!(state.grid.unclaimed_count(), 0);
    }

    #[test]
    fn test_buildings_never_share_road_cells() {
        let config = small();
        let mut state = CityState::new(&config);
        let mut layout = CityLayout::default();
        regenerate(&mut state, &config, &mut layout);
        for &cell in state.grid.cells() {
            if cell & CLAIM_BUILDING != 0 {
                assert_eq!(cell & (CLAIM_ROAD | CLAIM_WALK), 0, "cell {cell:#010b}");
            }
        }
    }

    #[test]
    fn test_report_matches_layout() {
        let config = small();
        let mut state = CityState::new(&config);
        let mut layout = CityLayout::default();
        let report = regenerate(&mut state, &config, &mut layout);
        assert_eq!(report.buildings(), layout.buildings.len());
        assert_eq!(report.light_strips, layout.light_strips.len());
        assert_eq!(report.generation, 1);
        assert!(!report.hot_zone.is_empty());
        assert!(layout.count_style(BuildingStyle::Simple) > 0);
    }

    #[test]
    fn test_fixed_seed_repeats_city() {
        let config = small();
        let mut state = CityState::new(&config);
        let mut first = CityLayout::default();
        regenerate(&mut state, &config, &mut first);
        let grid = state.grid.clone();
        let mut second = CityLayout::default();
        regenerate(&mut state, &config, &mut second);
        assert_eq!(grid, state.grid);
        assert_eq!(first.buildings, second.buildings);
        assert_eq!(first.light_strips, second.light_strips);
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn test_free_running_seed_changes_city() {
        let config = CityConfig {
            fixed_seed: false,
            ..small()
        };
        let mut state = CityState::new(&config);
        let mut first = CityLayout::default();
        regenerate(&mut state, &config, &mut first);
        let mut second = CityLayout::default();
        regenerate(&mut state, &config, &mut second);
        assert_ne!(first.buildings, second.buildings);
    }

    #[test]
    fn test_logo_index_restarts_each_cycle() {
        let config = small();
        let mut state = CityState::new(&config);
        assert_eq!(state.next_logo_index(), 0);
        assert_eq!(state.next_logo_index(), 1);
        regenerate(&mut state, &config, &mut CityLayout::default());
        assert_eq!(state.next_logo_index(), 0);
    }

    #[test]
    fn test_grid_resized_when_config_changes() {
        let mut state = CityState::new(&small());
        let bigger = CityConfig {
            fixed_seed: true,
            ..CityConfig::small(320)
        };
        regenerate(&mut state, &bigger, &mut CityLayout::default());
        assert_eq!(state.grid.size(), 320);
        assert_eq!(state.grid.unclaimed_count(), 0);
    }
}
