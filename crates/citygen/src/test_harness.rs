//! # TestCity — headless integration test harness
//!
//! Wraps `bevy::app::App` + `CityGenPlugin` with a manual frame clock so
//! lifecycle timing is exact and repeatable.

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::claims::ClaimGrid;
use crate::config::CityConfig;
use crate::events::{CityRegenerated, RegenerateRequested};
use crate::layout::CityLayout;
use crate::lifecycle::{FadeLifecycle, FadeState};
use crate::readiness::SceneReadiness;
use crate::regenerate::CityState;
use crate::state_hash::LayoutHash;
use crate::{CityGenPlugin, CityGenSet};

/// Every `tick()` advances the clock by this much.
pub const FRAME: Duration = Duration::from_millis(100);

/// A headless Bevy App wrapping `CityGenPlugin` for integration testing.
pub struct TestCity {
    pub app: App,
}

impl Default for TestCity {
    fn default() -> Self {
        Self::new()
    }
}

/// Collaborators that rebuild in zero time: readiness comes back the same
/// frame the city is regenerated.
fn instant_collaborators(
    mut regenerated: EventReader<CityRegenerated>,
    mut readiness: ResMut<SceneReadiness>,
) {
    if regenerated.read().count() > 0 {
        readiness.mark_textures_ready();
        readiness.mark_entities_ready();
    }
}

impl TestCity {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Config used by `new()`: a 256-cell world with a fixed seed and short
    /// fades so lifecycle tests finish in a few dozen frames.
    pub fn test_config() -> CityConfig {
        CityConfig {
            fixed_seed: true,
            fade_time_ms: 500,
            reset_interval_ms: 60_000,
            ..CityConfig::small(256)
        }
    }

    pub fn new() -> Self {
        Self::with_config(Self::test_config())
    }

    /// Build the app around `config`. The first city is generated during
    /// the initial update.
    pub fn with_config(config: CityConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        app.insert_resource(config);
        app.add_plugins(CityGenPlugin);

        // Startup systems run here.
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Setup (builder pattern — consumes and returns Self)
    // -----------------------------------------------------------------------

    /// Mark collaborators ready whenever a new city is published.
    pub fn with_instant_collaborators(mut self) -> Self {
        self.app
            .add_systems(Update, instant_collaborators.after(CityGenSet::Lifecycle));
        // The startup city was published before the system existed.
        self.set_readiness(true, true);
        self
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn set_readiness(&mut self, textures: bool, entities: bool) {
        let mut readiness = self.app.world_mut().resource_mut::<SceneReadiness>();
        readiness.textures = textures;
        readiness.entities = entities;
    }

    /// Queue a rebuild request; it is handled on the next `tick()`.
    pub fn request_regeneration(&mut self) {
        self.app.world_mut().send_event(RegenerateRequested);
    }

    /// Advance `n` frames.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Tick until `done` holds or `max_frames` have run. Returns whether
    /// `done` was reached.
    pub fn tick_until(&mut self, max_frames: u32, mut done: impl FnMut(&TestCity) -> bool) -> bool {
        for _ in 0..max_frames {
            if done(self) {
                return true;
            }
            self.app.update();
        }
        done(self)
    }

    /// Tick until the lifecycle settles in `Idle`.
    pub fn tick_until_idle(&mut self, max_frames: u32) -> bool {
        self.tick_until(max_frames, |city| city.fade_state() == FadeState::Idle)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn config(&self) -> &CityConfig {
        self.resource::<CityConfig>()
    }

    pub fn state(&self) -> &CityState {
        self.resource::<CityState>()
    }

    pub fn grid(&self) -> &ClaimGrid {
        &self.state().grid
    }

    pub fn layout(&self) -> &CityLayout {
        self.resource::<CityLayout>()
    }

    pub fn lifecycle(&self) -> &FadeLifecycle {
        self.resource::<FadeLifecycle>()
    }

    pub fn fade_state(&self) -> FadeState {
        self.lifecycle().state()
    }

    pub fn readiness(&self) -> SceneReadiness {
        *self.resource::<SceneReadiness>()
    }

    pub fn layout_hash(&self) -> &LayoutHash {
        self.resource::<LayoutHash>()
    }

    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    /// Virtual clock in milliseconds, as the lifecycle sees it.
    pub fn now_ms(&self) -> u64 {
        self.resource::<Time<Virtual>>().elapsed().as_millis() as u64
    }
}
