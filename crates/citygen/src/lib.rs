//! Procedural city-layout generator.
//!
//! A [`ClaimGrid`](claims::ClaimGrid) is filled by a fixed pipeline (roads,
//! street lights, downtown skyscrapers, blanket fill) and the results are
//! streamed to a [`LayoutSink`](layout::LayoutSink). [`CityGenPlugin`] wires
//! the pipeline behind a fade lifecycle so that a looping display only ever
//! rebuilds the city while it is hidden.

use bevy::prelude::*;

pub mod ascii_map;
pub mod buildings;
pub mod city_rng;
pub mod city_sets;
pub mod claims;
pub mod config;
pub mod config_error;
pub mod events;
pub mod fill;
pub mod hot_zone;
pub mod layout;
pub mod lifecycle;
pub mod light_strips;
pub mod palette;
pub mod plots;
pub mod readiness;
pub mod regenerate;
pub mod roads;
pub mod state_hash;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use config::CityConfig;
use events::{CityCleared, CityRegenerated, RegenerateRequested};
use layout::CityLayout;
use lifecycle::FadeLifecycle;
use readiness::SceneReadiness;
use regenerate::CityState;
use state_hash::LayoutHash;

pub use city_sets::CityGenSet;

/// Registers the generator, its lifecycle and the collaborator interface.
///
/// Uses a `CityConfig` resource if one was inserted before the plugin and
/// it validates, otherwise the defaults. The first city is built during `Startup` behind
/// full opacity.
pub struct CityGenPlugin;

impl Plugin for CityGenPlugin {
    fn build(&self, app: &mut App) {
        let config = match app.world().get_resource::<CityConfig>().cloned() {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    warn!("rejecting city config ({e}), using defaults");
                    CityConfig::default()
                }
            },
            None => CityConfig::default(),
        };

        app.insert_resource(CityState::new(&config))
            .insert_resource(FadeLifecycle::obscured(&config))
            .insert_resource(config)
            .init_resource::<CityLayout>()
            .init_resource::<SceneReadiness>()
            .init_resource::<LayoutHash>()
            .add_event::<RegenerateRequested>()
            .add_event::<CityCleared>()
            .add_event::<CityRegenerated>();

        city_sets::configure_city_sets(app);

        app.add_systems(Startup, regenerate::generate_initial_city)
            .add_systems(
                Update,
                lifecycle::drive_lifecycle.in_set(CityGenSet::Lifecycle),
            )
            .add_systems(
                Update,
                state_hash::update_layout_hash.in_set(CityGenSet::Publish),
            );
    }
}
