//! Ribbon mesh construction: spline the backbone markers, frame each point,
//! extrude a cross-section, and triangulate.
//!
//! The output is one strip per residue so each residue can carry its own
//! material (per-residue secondary-structure coloring without vertex-color
//! blending).

use glam::Vec3;
use log::trace;

use super::primitives::MeshData;
use super::spline::{catmull_rom, compute_frames, SplinePoint};

/// Above this flatness the cross-section gains thickness: a 4-point flat
/// quad instead of a 2-point thin line.
pub const FLATNESS_THRESHOLD: f32 = 0.3;

/// Fewer backbone markers than this and no ribbon geometry is produced.
pub const MIN_RIBBON_POINTS: usize = 3;

/// Ribbon thickness as a fraction of ribbon width in the flat case.
const THICKNESS_RATIO: f32 = 0.2;

/// One residue's slice of a chain ribbon.
#[derive(Debug, Clone)]
pub struct RibbonStrip {
    /// Residue index within the chain (0-based, marker order).
    pub residue: usize,
    /// Triangulated geometry for this residue's spline interval.
    pub mesh: MeshData,
}

/// Build a chain ribbon from per-residue backbone marker positions.
///
/// Returns `None` when fewer than [`MIN_RIBBON_POINTS`] markers are given;
/// the chain is skipped silently and other chains still render. With 3
/// markers the spline falls back to straight segments but still extrudes.
#[must_use]
pub fn build_ribbon(
    markers: &[Vec3],
    width: f32,
    flatness: f32,
    segments_per_span: usize,
) -> Option<Vec<RibbonStrip>> {
    if markers.len() < MIN_RIBBON_POINTS {
        trace!(
            "skipping ribbon: {} markers (need {MIN_RIBBON_POINTS})",
            markers.len()
        );
        return None;
    }

    let spline = catmull_rom(markers, segments_per_span);
    if spline.len() < 2 {
        return None;
    }
    let frames = compute_frames(&spline);

    let flat = flatness > FLATNESS_THRESHOLD;
    let half_width = width * 0.5;
    let half_thickness = width * THICKNESS_RATIO * 0.5;

    let total = frames.len();
    let n_residues = markers.len();
    let mut strips: Vec<RibbonStrip> = Vec::with_capacity(n_residues);

    for i in 0..total - 1 {
        // Map the segment's start point back to its residue.
        let residue = (i * (n_residues - 1)) / (total - 1).max(1);

        if strips.last().is_none_or(|s| s.residue != residue) {
            strips.push(RibbonStrip {
                residue,
                mesh: MeshData::default(),
            });
        }
        // `strips` is never empty here; a strip was just pushed if needed.
        let Some(strip) = strips.last_mut() else { continue };

        if flat {
            emit_flat_segment(
                &frames[i],
                &frames[i + 1],
                half_width,
                half_thickness,
                &mut strip.mesh,
            );
        } else {
            emit_thin_segment(
                &frames[i],
                &frames[i + 1],
                half_width,
                &mut strip.mesh,
            );
        }
    }

    Some(strips)
}

/// Two-point cross-section: one quad (2 triangles) per segment.
fn emit_thin_segment(
    a: &SplinePoint,
    b: &SplinePoint,
    half_width: f32,
    mesh: &mut MeshData,
) {
    let base = mesh.positions.len() as u32;
    for frame in [a, b] {
        let offset = frame.normal * half_width;
        mesh.positions.push(frame.pos + offset);
        mesh.positions.push(frame.pos - offset);
        mesh.normals.push(frame.binormal);
        mesh.normals.push(frame.binormal);
    }
    // a0 a1 / b0 b1
    mesh.indices
        .extend_from_slice(&[base, base + 2, base + 1]);
    mesh.indices
        .extend_from_slice(&[base + 1, base + 2, base + 3]);
}

/// Four-point cross-section: top and bottom faces (4 triangles) per segment.
fn emit_flat_segment(
    a: &SplinePoint,
    b: &SplinePoint,
    half_width: f32,
    half_thickness: f32,
    mesh: &mut MeshData,
) {
    let base = mesh.positions.len() as u32;
    for frame in [a, b] {
        let w = frame.normal * half_width;
        let t = frame.binormal * half_thickness;
        // 0: +w top, 1: -w top, 2: +w bottom, 3: -w bottom
        mesh.positions.push(frame.pos + w + t);
        mesh.positions.push(frame.pos - w + t);
        mesh.positions.push(frame.pos + w - t);
        mesh.positions.push(frame.pos - w - t);
        mesh.normals.push(frame.binormal);
        mesh.normals.push(frame.binormal);
        mesh.normals.push(-frame.binormal);
        mesh.normals.push(-frame.binormal);
    }
    let (a0, a1, a2, a3) = (base, base + 1, base + 2, base + 3);
    let (b0, b1, b2, b3) = (base + 4, base + 5, base + 6, base + 7);
    // Top face
    mesh.indices.extend_from_slice(&[a0, b0, a1]);
    mesh.indices.extend_from_slice(&[a1, b0, b1]);
    // Bottom face, reversed winding
    mesh.indices.extend_from_slice(&[a2, a3, b2]);
    mesh.indices.extend_from_slice(&[a3, b3, b2]);
}
