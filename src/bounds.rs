//! Axis-aligned bounds and camera framing.
//!
//! Bounds reduce atom positions to a center plus a single size (the largest
//! axis extent); camera distance derives from that size, a framing-context
//! multiplier, and the zoom level.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::model::{Atom, Structure};
use crate::selection::FocusTarget;

/// Fallback bounds size for an empty structure.
pub const DEFAULT_BOUNDS_SIZE: f32 = 10.0;

/// Shortest allowed camera distance.
pub const MIN_CAMERA_DISTANCE: f32 = 8.0;

/// Longest allowed camera distance.
pub const MAX_CAMERA_DISTANCE: f32 = 400.0;

/// Axis-aligned bounds summary: midpoint center and largest axis extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsInfo {
    /// Midpoint of the axis-aligned bounding box.
    pub center: Vec3,
    /// Largest extent across the three axes.
    pub size: f32,
}

impl Default for BoundsInfo {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: DEFAULT_BOUNDS_SIZE,
        }
    }
}

/// Presentation context the camera distance is derived for.
///
/// Close-up contexts use a smaller multiplier so the model fills more of
/// the viewport; free-roam viewing backs off further.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CameraFraming {
    /// Embedded/close-up presentation.
    CloseUp,
    /// Full interactive viewing.
    #[default]
    FreeRoam,
}

impl CameraFraming {
    fn multiplier(self) -> f32 {
        match self {
            Self::CloseUp => 1.5,
            Self::FreeRoam => 2.2,
        }
    }
}

/// Compute bounds over a set of atoms.
///
/// An empty input yields the fixed default framing rather than failing.
#[must_use]
pub fn compute_bounds(atoms: &[Atom]) -> BoundsInfo {
    compute_bounds_iter(atoms.iter())
}

/// Compute bounds for the subset of a structure inside a focus target,
/// falling back to whole-structure bounds when nothing matches.
#[must_use]
pub fn compute_focus_bounds(
    structure: &Structure,
    focus: &FocusTarget,
) -> BoundsInfo {
    let focused =
        compute_bounds_iter(structure.atoms.iter().filter(|a| focus.contains(a)));
    if structure.atoms.iter().any(|a| focus.contains(a)) {
        focused
    } else {
        compute_bounds(&structure.atoms)
    }
}

/// Camera distance from bounds size, framing context, and zoom level.
#[must_use]
pub fn camera_distance(
    size: f32,
    framing: CameraFraming,
    zoom_level: f32,
) -> f32 {
    let distance = (size * framing.multiplier())
        .clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
    distance / zoom_level.max(1e-3)
}

fn compute_bounds_iter<'a>(
    atoms: impl Iterator<Item = &'a Atom>,
) -> BoundsInfo {
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    let mut any = false;
    for atom in atoms {
        min = min.min(atom.position);
        max = max.max(atom.position);
        any = true;
    }
    if !any {
        return BoundsInfo::default();
    }
    let extent = max - min;
    BoundsInfo {
        center: (min + max) * 0.5,
        size: extent.x.max(extent.y).max(extent.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SecondaryStructure;

    fn atom_at(id: u32, pos: Vec3) -> Atom {
        Atom {
            id,
            element: "C".to_owned(),
            name: "CA".to_owned(),
            chain: "A".to_owned(),
            residue_name: "ALA".to_owned(),
            residue_seq: id as i32,
            position: pos,
            secondary_structure: SecondaryStructure::Unknown,
            is_backbone: true,
            is_ligand: false,
            is_pocket: false,
        }
    }

    #[test]
    fn bounds_of_triangle_fixture() {
        let atoms = vec![
            atom_at(1, Vec3::new(-1.0, 0.0, 0.0)),
            atom_at(2, Vec3::new(1.0, 0.0, 0.0)),
            atom_at(3, Vec3::new(0.0, 2.0, 0.0)),
        ];
        let b = compute_bounds(&atoms);
        assert_eq!(b.center, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(b.size, 2.0);
    }

    #[test]
    fn empty_structure_gets_default_framing() {
        let b = compute_bounds(&[]);
        assert_eq!(b.center, Vec3::ZERO);
        assert_eq!(b.size, DEFAULT_BOUNDS_SIZE);
    }

    #[test]
    fn ligand_focus_restricts_then_falls_back() {
        let mut ligand = atom_at(5, Vec3::new(50.0, 0.0, 0.0));
        ligand.is_ligand = true;
        ligand.residue_name = "HEM".to_owned();
        let structure = Structure {
            atoms: vec![atom_at(1, Vec3::ZERO), ligand],
            bonds: vec![],
            annotations: vec![],
        };

        let hit = compute_focus_bounds(
            &structure,
            &FocusTarget::Ligand("HEM".to_owned()),
        );
        assert_eq!(hit.center, Vec3::new(50.0, 0.0, 0.0));

        let miss = compute_focus_bounds(
            &structure,
            &FocusTarget::Ligand("ATP".to_owned()),
        );
        assert_eq!(miss, compute_bounds(&structure.atoms));
    }

    #[test]
    fn close_up_framing_sits_nearer_than_free_roam() {
        let close = camera_distance(40.0, CameraFraming::CloseUp, 1.0);
        let roam = camera_distance(40.0, CameraFraming::FreeRoam, 1.0);
        assert!(close < roam);
        // Zoom divides the final distance.
        assert!(camera_distance(40.0, CameraFraming::FreeRoam, 2.0) < roam);
    }

    #[test]
    fn distance_is_clamped_to_floor_and_ceiling() {
        assert_eq!(
            camera_distance(0.1, CameraFraming::FreeRoam, 1.0),
            MIN_CAMERA_DISTANCE
        );
        assert_eq!(
            camera_distance(1e6, CameraFraming::FreeRoam, 1.0),
            MAX_CAMERA_DISTANCE
        );
    }
}
