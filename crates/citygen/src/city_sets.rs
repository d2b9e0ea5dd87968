//! Per-frame ordering of the generator's systems.
//!
//! ```text
//! Lifecycle  →  Publish
//! ```
//!
//! * **Lifecycle** – Reads rebuild requests, advances the fade state machine
//!   and runs regeneration when it says so.
//! * **Publish** – Derived, read-only views of the finished city (layout
//!   hash). Collaborators that rebuild geometry from `CityRegenerated`
//!   should order themselves after this set.

use bevy::prelude::*;

/// Ordered phases for systems running in the `Update` schedule.
///
/// Configured as a chain: `Lifecycle` → `Publish`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CityGenSet {
    Lifecycle,
    Publish,
}

pub(crate) fn configure_city_sets(app: &mut App) {
    app.configure_sets(Update, (CityGenSet::Lifecycle, CityGenSet::Publish).chain());
}
