use bevy::prelude::*;

// =============================================================================
// Event Types
// =============================================================================

/// Ask for a fresh city. Sent by input handlers or anything else that wants
/// an immediate rebuild; the lifecycle decides when it actually happens.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RegenerateRequested;

/// Fired right before the grid is rewritten. Entity, light and car
/// collaborators drop everything they built from the previous city.
#[derive(Event, Debug, Clone, Copy)]
pub struct CityCleared {
    /// Generation that is being torn down.
    pub generation: u64,
}

/// Fired once a regeneration has finished. Collaborators read
/// [`CityLayout`](crate::layout::CityLayout) and rebuild their geometry.
#[derive(Event, Debug, Clone, Copy)]
pub struct CityRegenerated {
    pub generation: u64,
    pub seed: u64,
    pub buildings: usize,
    pub light_strips: usize,
}
