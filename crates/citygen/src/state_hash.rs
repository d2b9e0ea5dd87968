//! Deterministic layout hashing.
//!
//! Computes a 64-bit hash of a finished city, stored in the `LayoutHash`
//! resource after every regeneration. The hash covers, in order:
//!
//! 1. Claim grid cells in row-major order
//! 2. Every building descriptor, in emission order
//! 3. Every light-strip descriptor, in emission order
//!
//! Float values are converted to their bit representation before hashing.

use std::hash::{Hash, Hasher};

use bevy::prelude::*;

use crate::claims::ClaimGrid;
use crate::events::CityRegenerated;
use crate::layout::{CityLayout, LightStripDescriptor};
use crate::regenerate::CityState;

/// Hash of the most recent regeneration.
#[derive(Resource, Default, Clone, Debug)]
pub struct LayoutHash {
    pub generation: u64,
    /// The 64-bit FNV-1a hash of grid and descriptors.
    pub hash: u64,
}

// ---------------------------------------------------------------------------
// FNV-1a hasher (deterministic, no random seed)
// ---------------------------------------------------------------------------

/// Produces the same output on every platform and Rust version, unlike
/// `DefaultHasher`.
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001B3;

    fn new() -> Self {
        Self {
            state: Self::FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::FNV_PRIME);
        }
    }
}

fn hash_color(color: Color, hasher: &mut impl Hasher) {
    let srgba = color.to_srgba();
    for channel in [srgba.red, srgba.green, srgba.blue, srgba.alpha] {
        channel.to_bits().hash(hasher);
    }
}

fn hash_strip(strip: &LightStripDescriptor, hasher: &mut impl Hasher) {
    strip.origin.x.to_bits().hash(hasher);
    strip.origin.y.to_bits().hash(hasher);
    strip.width.to_bits().hash(hasher);
    strip.depth.to_bits().hash(hasher);
    strip.tier.hash(hasher);
    hash_color(strip.color, hasher);
}

/// Compute a deterministic hash of a generated city.
///
/// Callable from tests without the ECS system having run.
pub fn compute_layout_hash(grid: &ClaimGrid, layout: &CityLayout) -> u64 {
    let mut hasher = Fnv1aHasher::new();

    grid.size().hash(&mut hasher);
    hasher.write(grid.cells());

    for b in &layout.buildings {
        b.style.hash(&mut hasher);
        (b.x, b.z, b.width, b.depth, b.height).hash(&mut hasher);
        b.seed.hash(&mut hasher);
        hash_color(b.color, &mut hasher);
    }

    for strip in &layout.light_strips {
        hash_strip(strip, &mut hasher);
    }

    hasher.finish()
}

// ---------------------------------------------------------------------------
// ECS system
// ---------------------------------------------------------------------------

pub(crate) fn update_layout_hash(
    mut regenerated: EventReader<CityRegenerated>,
    state: Res<CityState>,
    layout: Res<CityLayout>,
    mut layout_hash: ResMut<LayoutHash>,
) {
    let Some(event) = regenerated.read().last() else {
        return;
    };
    layout_hash.generation = event.generation;
    layout_hash.hash = compute_layout_hash(&state.grid, &layout);
    debug!(
        "layout hash for generation {}: {:016x}",
        layout_hash.generation, layout_hash.hash
    );
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::CLAIM_ROAD;
    use crate::layout::{BuildingDescriptor, BuildingStyle, LayoutSink};

    fn building(seed: u32) -> BuildingDescriptor {
        BuildingDescriptor {
            style: BuildingStyle::Blocky,
            x: 3,
            z: 4,
            height: 42,
            width: 12,
            depth: 11,
            seed,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_fnv1a_deterministic() {
        let mut h1 = Fnv1aHasher::new();
        let mut h2 = Fnv1aHasher::new();
        42u64.hash(&mut h1);
        42u64.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_layout_hash_deterministic() {
        let grid = ClaimGrid::new(16);
        let mut layout = CityLayout::default();
        layout.emit_building(building(7));
        assert_eq!(
            compute_layout_hash(&grid, &layout),
            compute_layout_hash(&grid, &layout)
        );
    }

    #[test]
    fn test_layout_hash_differs_on_grid() {
        let layout = CityLayout::default();
        let empty = ClaimGrid::new(16);
        let mut claimed = ClaimGrid::new(16);
        claimed.claim(2, 2, 1, 1, CLAIM_ROAD);
        assert_ne!(
            compute_layout_hash(&empty, &layout),
            compute_layout_hash(&claimed, &layout)
        );
    }

    #[test]
    fn test_layout_hash_differs_on_building_seed() {
        let grid = ClaimGrid::new(16);
        let mut a = CityLayout::default();
        a.emit_building(building(7));
        let mut b = CityLayout::default();
        b.emit_building(building(8));
        assert_ne!(compute_layout_hash(&grid, &a), compute_layout_hash(&grid, &b));
    }

    #[test]
    fn test_layout_hash_differs_on_strip() {
        let grid = ClaimGrid::new(16);
        let strip = LightStripDescriptor {
            origin: Vec2::new(1.0, 2.0),
            width: 1.0,
            depth: 14.5,
            tier: 2,
            color: Color::WHITE,
        };
        let mut a = CityLayout::default();
        a.emit_light_strip(strip);
        let mut b = CityLayout::default();
        b.emit_light_strip(LightStripDescriptor {
            depth: 15.5,
            ..strip
        });
        assert_ne!(compute_layout_hash(&grid, &a), compute_layout_hash(&grid, &b));
    }
}
