use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mesh detail level selected by the renderer from projected screen size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LodTier {
    /// Full triangle count, near the camera.
    High,
    /// Roughly half resolution.
    Medium,
    /// Coarse silhouette for distant geometry.
    Low,
}

impl LodTier {
    /// The three tiers in descending detail order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
/// Geometry detail options for molecular rendering primitives.
pub struct GeometryOptions {
    /// Ribbon cross-section width in angstroms.
    #[schemars(title = "Ribbon Width")]
    pub ribbon_width: f32,
    /// Ribbon flatness; above 0.3 the cross-section gains thickness
    /// (flat quad instead of thin line).
    #[schemars(title = "Ribbon Flatness")]
    pub ribbon_flatness: f32,
    /// Bond cylinder radius in angstroms.
    #[schemars(title = "Bond Radius")]
    pub bond_radius: f32,
    /// Sphere radius multiplier for the sticks style.
    pub stick_sphere_scale: f32,
    /// Sphere radius multiplier for the cartoon style.
    pub cartoon_sphere_scale: f32,
    /// Sphere radius multiplier for the surface style.
    pub surface_sphere_scale: f32,
    /// Opacity applied to surface-style spheres before the global
    /// transparency multiplier.
    pub surface_opacity: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            ribbon_width: 1.4,
            ribbon_flatness: 0.5,
            bond_radius: 0.12,
            stick_sphere_scale: 0.45,
            cartoon_sphere_scale: 0.6,
            surface_sphere_scale: 1.8,
            surface_opacity: 0.55,
        }
    }
}

/// Spline segments per control-point span, chosen from backbone length.
///
/// Monotonic degradation: quality-first for small chains, performance-first
/// for very large ones.
#[must_use]
pub fn segments_per_span(backbone_len: usize) -> usize {
    if backbone_len > 500 {
        4
    } else if backbone_len >= 200 {
        6
    } else {
        8
    }
}

/// Latitude/longitude band counts for a UV sphere at a given tier.
#[must_use]
pub fn sphere_bands(tier: LodTier) -> (usize, usize) {
    match tier {
        LodTier::High => (24, 16),
        LodTier::Medium => (16, 10),
        LodTier::Low => (8, 6),
    }
}

/// Radial segment count for a cylinder at a given tier.
#[must_use]
pub fn cylinder_segments(tier: LodTier) -> usize {
    match tier {
        LodTier::High => 20,
        LodTier::Medium => 10,
        LodTier::Low => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_degrade_monotonically_with_size() {
        assert_eq!(segments_per_span(50), 8);
        assert_eq!(segments_per_span(199), 8);
        assert_eq!(segments_per_span(200), 6);
        assert_eq!(segments_per_span(500), 6);
        assert_eq!(segments_per_span(501), 4);
    }

    #[test]
    fn lod_tiers_strictly_decrease_in_detail() {
        let (hi_lat, hi_lon) = sphere_bands(LodTier::High);
        let (md_lat, md_lon) = sphere_bands(LodTier::Medium);
        let (lo_lat, lo_lon) = sphere_bands(LodTier::Low);
        assert!(hi_lat * hi_lon > md_lat * md_lon);
        assert!(md_lat * md_lon > lo_lat * lo_lon);
        assert!(
            cylinder_segments(LodTier::High)
                > cylinder_segments(LodTier::Medium)
        );
    }
}
