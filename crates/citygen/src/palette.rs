//! Light colors for windows, street lights and the bloom tint.
//!
//! Hues are drawn from a narrow group: ambers, yellows and pale blues, plus a
//! few whites.

use bevy::prelude::*;

use crate::city_rng::CityRng;

/// (hue in turns, saturation, lightness)
const LIGHT_PALETTE: [(f32, f32, f32); 14] = [
    (0.04, 0.9, 0.93),   // amber/pink
    (0.055, 0.95, 0.93), // brighter amber
    (0.08, 0.7, 0.93),   // pale amber
    (0.07, 0.9, 0.93),   // pale orange
    (0.1, 0.9, 0.85),    // peach
    (0.13, 0.9, 0.93),   // pale yellow
    (0.15, 0.9, 0.93),   // yellow
    (0.17, 1.0, 0.85),   // saturated yellow
    (0.55, 0.9, 0.93),   // cyan
    (0.6, 0.9, 0.93),    // pale blue
    (0.65, 0.9, 0.93),   // paler blue
    (0.65, 0.4, 0.99),   // white
    (0.65, 0.0, 0.8),    // dim white
    (0.65, 0.0, 0.6),    // dimmest white
];

pub const PALETTE_LEN: u32 = LIGHT_PALETTE.len() as u32;

/// Light-strip color: a warm sodium orange.
pub fn street_light_color() -> Color {
    hsl_turns(0.09, 0.99, 0.85)
}

fn hsl_turns(hue: f32, saturation: f32, lightness: f32) -> Color {
    Color::hsl(hue * 360.0, saturation, lightness)
}

/// Deterministic palette lookup; any index is valid.
pub fn light_color(index: u32) -> Color {
    let (h, s, l) = LIGHT_PALETTE[(index % PALETTE_LEN) as usize];
    hsl_turns(h, s, l)
}

/// A random palette hue with caller-chosen saturation and lightness.
pub fn random_light_color(rng: &mut CityRng, saturation: f32, lightness: f32) -> Color {
    let (h, _, _) = LIGHT_PALETTE[rng.below(PALETTE_LEN as i32) as usize];
    hsl_turns(h, saturation, lightness)
}

/// Pick this cycle's bloom tint.
pub fn roll_bloom_color(rng: &mut CityRng) -> Color {
    let saturation = 0.5 + rng.below(10) as f32 / 20.0;
    random_light_color(rng, saturation, 0.75)
}
