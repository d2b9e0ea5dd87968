//! Descriptors emitted during regeneration and the sink that receives them.
//!
//! The generator never keeps what it emits. Geometry collaborators read the
//! [`CityLayout`] resource after a [`CityRegenerated`](crate::events::CityRegenerated)
//! event, or plug their own [`LayoutSink`] into [`regenerate`](crate::regenerate::regenerate).

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingStyle {
    Simple,
    Tower,
    Blocky,
    Modern,
}

impl BuildingStyle {
    /// Base height the randomized offset is layered on.
    pub fn base_height(self) -> i32 {
        match self {
            BuildingStyle::Simple => 5,
            BuildingStyle::Tower => 45,
            BuildingStyle::Blocky => 40,
            BuildingStyle::Modern => 45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingDescriptor {
    pub style: BuildingStyle,
    pub x: i32,
    pub z: i32,
    pub height: i32,
    pub width: i32,
    pub depth: i32,
    /// Seed for the procedural detail of the building geometry.
    pub seed: u32,
    pub color: Color,
}

/// A run of street lights along a sidewalk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightStripDescriptor {
    pub origin: Vec2,
    pub width: f32,
    pub depth: f32,
    pub tier: u32,
    pub color: Color,
}

/// Receives descriptors as the generator produces them.
pub trait LayoutSink {
    fn emit_building(&mut self, building: BuildingDescriptor);
    fn emit_light_strip(&mut self, strip: LightStripDescriptor);
}

/// Everything emitted by the most recent regeneration.
#[derive(Resource, Debug, Clone, Default)]
pub struct CityLayout {
    pub buildings: Vec<BuildingDescriptor>,
    pub light_strips: Vec<LightStripDescriptor>,
}

impl CityLayout {
    pub fn clear(&mut self) {
        self.buildings.clear();
        self.light_strips.clear();
    }

    pub fn count_style(&self, style: BuildingStyle) -> usize {
        self.buildings.iter().filter(|b| b.style == style).count()
    }
}

impl LayoutSink for CityLayout {
    fn emit_building(&mut self, building: BuildingDescriptor) {
        self.buildings.push(building);
    }

    fn emit_light_strip(&mut self, strip: LightStripDescriptor) {
        self.light_strips.push(strip);
    }
}
