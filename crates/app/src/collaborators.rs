//! Stand-ins for the geometry collaborators a renderer would provide.
//!
//! They take a few frames to "rebuild" textures and entities after every
//! regeneration, which exercises the lifecycle's wait state the way real
//! asset uploads would.

use bevy::prelude::*;

use citygen::events::{CityCleared, CityRegenerated};
use citygen::layout::{BuildingStyle, CityLayout};
use citygen::readiness::SceneReadiness;
use citygen::regenerate::CityState;
use citygen::state_hash::LayoutHash;
use citygen::CityGenSet;

/// Frames a texture rebuild takes.
const TEXTURE_FRAMES: u32 = 4;
/// Frames an entity rebuild takes.
const ENTITY_FRAMES: u32 = 8;

/// Outstanding rebuild work.
#[derive(Resource, Default, Debug)]
pub struct RebuildProgress {
    /// Frames until textures are ready.
    pub textures_in: Option<u32>,
    /// Frames until entities are ready.
    pub entities_in: Option<u32>,
    pub rooftop_logos: u32,
}

fn clear_scene(mut cleared: EventReader<CityCleared>, mut progress: ResMut<RebuildProgress>) {
    for event in cleared.read() {
        debug!(
            "clearing entities, lights and cars of generation {}",
            event.generation
        );
        progress.rooftop_logos = 0;
    }
}

/// Queue a rebuild for every new city.
fn start_rebuild(
    mut regenerated: EventReader<CityRegenerated>,
    layout: Res<CityLayout>,
    hash: Res<LayoutHash>,
    mut state: ResMut<CityState>,
    mut progress: ResMut<RebuildProgress>,
) {
    let Some(event) = regenerated.read().last() else {
        return;
    };

    // Every modern tower carries a logo.
    for _ in 0..layout.count_style(BuildingStyle::Modern) {
        state.next_logo_index();
        progress.rooftop_logos += 1;
    }

    info!(
        "rebuilding scene for generation {} (seed {}): {} buildings, {} light strips, {} logos, layout hash {:016x}",
        event.generation,
        event.seed,
        event.buildings,
        event.light_strips,
        progress.rooftop_logos,
        hash.hash,
    );
    progress.textures_in = Some(TEXTURE_FRAMES);
    progress.entities_in = Some(ENTITY_FRAMES);
}

fn countdown(slot: &mut Option<u32>) -> bool {
    match slot {
        Some(0) => {
            *slot = None;
            true
        }
        Some(frames) => {
            *frames -= 1;
            false
        }
        None => false,
    }
}

fn advance_rebuild(mut progress: ResMut<RebuildProgress>, mut readiness: ResMut<SceneReadiness>) {
    if countdown(&mut progress.textures_in) {
        readiness.mark_textures_ready();
        debug!("textures ready");
    }
    if countdown(&mut progress.entities_in) {
        readiness.mark_entities_ready();
        debug!("entities ready");
    }
}

pub struct StandInCollaboratorsPlugin;

impl Plugin for StandInCollaboratorsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RebuildProgress>().add_systems(
            Update,
            (clear_scene, start_rebuild, advance_rebuild)
                .chain()
                .after(CityGenSet::Publish),
        );
    }
}
