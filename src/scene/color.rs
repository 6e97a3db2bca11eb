//! Per-atom color, opacity, and radius resolution.
//!
//! Opacity is a priority cascade: a focused atom gets full opacity, a
//! highlighted atom high opacity, and when any focus is active every other
//! atom is pushed to low opacity so the focus stands out. The resolved
//! value is then multiplied by the global transparency parameter.

use std::hash::{Hash, Hasher};

use crate::model::{
    element_color, element_covalent_radius, Atom, SecondaryStructure,
};
use crate::options::{ColorMode, DisplayOptions, DisplayStyle, GeometryOptions};
use crate::selection::SelectionState;

/// Opacity of an atom inside the active focus target.
pub const OPACITY_FOCUSED: f32 = 1.0;
/// Opacity of a highlighted atom.
pub const OPACITY_HIGHLIGHTED: f32 = 0.95;
/// Opacity of unfocused atoms while any focus is active.
pub const OPACITY_DIMMED: f32 = 0.2;
/// Default opacity with no focus or highlight.
pub const OPACITY_DEFAULT: f32 = 0.85;

/// Radius multiplier applied to highlighted atoms.
pub const HIGHLIGHT_RADIUS_BOOST: f32 = 1.25;

/// Brightness multiplier applied to highlighted colors.
const HIGHLIGHT_BRIGHTEN: f32 = 1.35;

/// Secondary-structure palette (RGB, 0-1 range).
#[must_use]
pub fn secondary_structure_color(ss: SecondaryStructure) -> [f32; 3] {
    match ss {
        SecondaryStructure::Helix => [0.9, 0.3, 0.5],
        SecondaryStructure::Sheet => [0.95, 0.85, 0.3],
        SecondaryStructure::Coil => [0.6, 0.85, 0.6],
        SecondaryStructure::Unknown => [0.65, 0.65, 0.65],
    }
}

/// Hash a chain id into a stable hue-derived color.
///
/// The golden-ratio hue step spreads arbitrary chain ids across the wheel
/// so neighboring chains stay distinguishable.
#[must_use]
pub fn chain_color(chain: &str) -> [f32; 3] {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    chain.hash(&mut hasher);
    // Fibonacci multiplier (2^64 / phi); the high bits give an evenly
    // spread hue in [0, 1).
    let spread = hasher.finish().wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let hue = (spread >> 40) as f32 / (1u64 << 24) as f32;
    hue_to_rgb(hue)
}

/// Resolve an atom's base color for the given mode, before highlighting.
#[must_use]
pub fn resolve_color(
    atom: &Atom,
    mode: ColorMode,
    uniform: [f32; 3],
) -> [f32; 3] {
    match mode {
        ColorMode::Element => element_color(&atom.element),
        ColorMode::Chain => chain_color(&atom.chain),
        ColorMode::Uniform => uniform,
        ColorMode::SecondaryStructure => {
            secondary_structure_color(atom.secondary_structure)
        }
    }
}

/// Brighten a color for the highlighted state.
///
/// Any palette works here as long as the highlighted state stays visually
/// distinguishable from the non-highlighted one across all classes.
#[must_use]
pub fn highlight_color(color: [f32; 3]) -> [f32; 3] {
    color.map(|c| (c * HIGHLIGHT_BRIGHTEN).min(1.0))
}

/// Opacity cascade for one atom, multiplied by the global transparency.
#[must_use]
pub fn resolve_opacity(
    atom: &Atom,
    selection: &SelectionState,
    transparency: f32,
) -> f32 {
    let base = if selection.is_focused(atom) {
        OPACITY_FOCUSED
    } else if selection.is_highlighted(atom) {
        OPACITY_HIGHLIGHTED
    } else if selection.focus.is_some() {
        OPACITY_DIMMED
    } else {
        OPACITY_DEFAULT
    };
    base * transparency.clamp(0.0, 1.0)
}

/// Sphere radius for an atom under the given style.
#[must_use]
pub fn atom_radius(
    atom: &Atom,
    display: &DisplayOptions,
    geometry: &GeometryOptions,
    highlighted: bool,
) -> f32 {
    let style_scale = match display.style {
        DisplayStyle::Spheres | DisplayStyle::Ribbon => 1.0,
        DisplayStyle::Sticks => geometry.stick_sphere_scale,
        DisplayStyle::Cartoon => geometry.cartoon_sphere_scale,
        DisplayStyle::Surface => geometry.surface_sphere_scale,
    };
    let boost = if highlighted { HIGHLIGHT_RADIUS_BOOST } else { 1.0 };
    element_covalent_radius(&atom.element) * display.atom_size * style_scale
        * boost
}

fn hue_to_rgb(hue: f32) -> [f32; 3] {
    // Fixed saturation/value; only the hue varies per chain.
    let h = hue * 6.0;
    let i = h.floor() as i32 % 6;
    let f = h - h.floor();
    let (s, v) = (0.65_f32, 0.9_f32);
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
