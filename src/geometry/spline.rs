//! Spline math and frame computation for ribbon geometry.
//!
//! Pure Vec3 -> Vec3 transforms with no scene or cache dependencies.

use glam::Vec3;

/// Tangent is considered colinear with the reference axis above this |dot|.
const COLINEAR_THRESHOLD: f32 = 0.95;

/// A point along the spline with position, tangent, and frame vectors.
#[derive(Debug, Clone, Copy)]
pub struct SplinePoint {
    /// Interpolated position.
    pub pos: Vec3,
    /// Unit tangent along the curve.
    pub tangent: Vec3,
    /// Cross-section width axis.
    pub normal: Vec3,
    /// Cross-section thickness axis (tangent x normal).
    pub binormal: Vec3,
}

/// Evaluate the Catmull-Rom cubic blend for one span at parameter `t`.
#[must_use]
pub fn catmull_rom_point(
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
    t: f32,
) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Catmull-Rom spline interpolation (passes through all control points).
///
/// Fewer than 4 control points cannot be splined and are returned
/// unmodified; the caller treats them as straight segments.
#[must_use]
pub fn catmull_rom(points: &[Vec3], segments_per_span: usize) -> Vec<Vec3> {
    let n = points.len();
    if n < 4 || segments_per_span == 0 {
        return points.to_vec();
    }

    let mut result = Vec::with_capacity((n - 1) * segments_per_span + 1);

    for i in 0..n - 1 {
        // Phantom endpoints mirror the boundary so the curve reaches the
        // first and last control points.
        let p0 = if i == 0 {
            points[0] * 2.0 - points[1]
        } else {
            points[i - 1]
        };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 >= n {
            points[n - 1] * 2.0 - points[n - 2]
        } else {
            points[i + 2]
        };

        for j in 0..segments_per_span {
            let t = j as f32 / segments_per_span as f32;
            result.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }

    result.push(points[n - 1]);
    result
}

/// Compute tangent/normal/binormal frames for a polyline of spline points.
///
/// Tangents use central differences (one-sided at the endpoints). Normals
/// come from world-up x tangent; when the tangent is near-colinear with
/// world-up, a secondary reference axis is substituted to avoid a
/// degenerate cross product.
#[must_use]
pub fn compute_frames(points: &[Vec3]) -> Vec<SplinePoint> {
    let n = points.len();
    let mut frames = Vec::with_capacity(n);

    for i in 0..n {
        let tangent = if n < 2 {
            Vec3::X
        } else if i == 0 {
            (points[1] - points[0]).normalize_or_zero()
        } else if i == n - 1 {
            (points[i] - points[i - 1]).normalize_or_zero()
        } else {
            (points[i + 1] - points[i - 1]).normalize_or_zero()
        };
        let tangent = if tangent == Vec3::ZERO { Vec3::X } else { tangent };

        let reference = if tangent.dot(Vec3::Y).abs() > COLINEAR_THRESHOLD {
            Vec3::X
        } else {
            Vec3::Y
        };
        let normal = reference.cross(tangent).normalize_or_zero();
        let normal = if normal == Vec3::ZERO { Vec3::Z } else { normal };
        let binormal = tangent.cross(normal).normalize_or_zero();

        frames.push(SplinePoint {
            pos: points[i],
            tangent,
            normal,
            binormal,
        });
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                Vec3::new(i as f32 * 3.8, (i % 2) as f32, (i % 3) as f32)
            })
            .collect()
    }

    #[test]
    fn interpolation_passes_through_control_points() {
        let points = zigzag(6);
        let spline = catmull_rom(&points, 8);
        assert_eq!(spline.len(), (points.len() - 1) * 8 + 1);
        for (i, p) in points.iter().enumerate() {
            let s = spline[i * 8];
            assert!((s - *p).length() < 1e-5, "missed control point {i}");
        }
    }

    #[test]
    fn spans_are_continuous_at_boundaries() {
        let p = zigzag(6);
        // Each iteration needs p[i+3]; the last interior span starts at
        // p.len() - 4.
        for i in 1..p.len() - 3 {
            let end_of_span =
                catmull_rom_point(p[i - 1], p[i], p[i + 1], p[i + 2], 1.0);
            let start_of_next =
                catmull_rom_point(p[i], p[i + 1], p[i + 2], p[i + 3], 0.0);
            assert!(
                (end_of_span - start_of_next).length() < 1e-4,
                "discontinuity after span {i}"
            );
        }
    }

    #[test]
    fn short_sequences_are_returned_unmodified() {
        let points = zigzag(3);
        assert_eq!(catmull_rom(&points, 8), points);
    }

    #[test]
    fn frames_are_orthonormal() {
        let spline = catmull_rom(&zigzag(5), 6);
        for f in compute_frames(&spline) {
            assert!((f.tangent.length() - 1.0).abs() < 1e-4);
            assert!((f.normal.length() - 1.0).abs() < 1e-4);
            assert!(f.tangent.dot(f.normal).abs() < 1e-4);
            assert!(f.tangent.dot(f.binormal).abs() < 1e-4);
        }
    }

    #[test]
    fn vertical_tangent_uses_secondary_reference_axis() {
        // Straight up: world-up x tangent would be degenerate.
        let points: Vec<Vec3> =
            (0..4).map(|i| Vec3::new(0.0, i as f32 * 3.8, 0.0)).collect();
        let frames = compute_frames(&points);
        for f in frames {
            assert!(f.normal.length() > 0.5, "degenerate normal");
        }
    }
}
