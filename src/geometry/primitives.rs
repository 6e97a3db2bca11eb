//! Triangulated primitive meshes: UV spheres and unit-height cylinders.
//!
//! Cylinders are generated at unit height so one cached mesh serves every
//! bond; callers stretch the height axis with a non-uniform scale to the
//! actual bond length.

use glam::Vec3;

use crate::options::{
    cylinder_segments, sphere_bands, LodTier,
};

/// A triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex unit normals.
    pub normals: Vec<Vec3>,
    /// Triangle indices into `positions`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has any triangles at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &MeshData) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// The same shape at three discrete detail levels. The renderer selects a
/// tier from projected screen size at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct LodMesh {
    /// Full-detail mesh.
    pub high: MeshData,
    /// Half-detail mesh.
    pub medium: MeshData,
    /// Coarse mesh for distant geometry.
    pub low: MeshData,
}

impl LodMesh {
    /// Mesh for a given detail tier.
    #[must_use]
    pub fn level(&self, tier: LodTier) -> &MeshData {
        match tier {
            LodTier::High => &self.high,
            LodTier::Medium => &self.medium,
            LodTier::Low => &self.low,
        }
    }
}

/// Build a sphere at all three LOD tiers.
#[must_use]
pub fn sphere_lod(radius: f32) -> LodMesh {
    let [high, medium, low] = LodTier::ALL.map(|tier| {
        let (lon, lat) = sphere_bands(tier);
        uv_sphere(radius, lon, lat)
    });
    LodMesh { high, medium, low }
}

/// Build a unit-height cylinder at all three LOD tiers.
#[must_use]
pub fn unit_cylinder_lod(radius: f32) -> LodMesh {
    let [high, medium, low] = LodTier::ALL
        .map(|tier| unit_cylinder(radius, cylinder_segments(tier)));
    LodMesh { high, medium, low }
}

/// Latitude/longitude sphere centered at the origin.
#[must_use]
pub fn uv_sphere(radius: f32, lon_bands: usize, lat_bands: usize) -> MeshData {
    let mut mesh = MeshData::default();

    for lat in 0..=lat_bands {
        let theta = lat as f32 * std::f32::consts::PI / lat_bands as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for lon in 0..=lon_bands {
            let phi =
                lon as f32 * 2.0 * std::f32::consts::PI / lon_bands as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            let n = Vec3::new(cos_p * sin_t, cos_t, sin_p * sin_t);
            mesh.positions.push(n * radius);
            mesh.normals.push(n);
        }
    }

    let stride = lon_bands as u32 + 1;
    for lat in 0..lat_bands as u32 {
        for lon in 0..lon_bands as u32 {
            let a = lat * stride + lon;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, b, a + 1]);
            mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }
    mesh
}

/// Capped cylinder of the given radius along the Y axis, spanning
/// `y in [-0.5, 0.5]`.
#[must_use]
pub fn unit_cylinder(radius: f32, radial_segments: usize) -> MeshData {
    let mut mesh = MeshData::default();
    let segs = radial_segments as u32;

    // Side rings (separate normals from the caps).
    for y in [-0.5_f32, 0.5] {
        for s in 0..=radial_segments {
            let phi =
                s as f32 * 2.0 * std::f32::consts::PI / radial_segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            let n = Vec3::new(cos_p, 0.0, sin_p);
            mesh.positions.push(Vec3::new(
                n.x * radius,
                y,
                n.z * radius,
            ));
            mesh.normals.push(n);
        }
    }
    let ring = segs + 1;
    for s in 0..segs {
        let a = s;
        let b = s + ring;
        mesh.indices.extend_from_slice(&[a, b, a + 1]);
        mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
    }

    // End caps with axial normals.
    for (y, axial) in [(-0.5_f32, Vec3::NEG_Y), (0.5, Vec3::Y)] {
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, y, 0.0));
        mesh.normals.push(axial);
        let edge = mesh.positions.len() as u32;
        for s in 0..radial_segments {
            let phi =
                s as f32 * 2.0 * std::f32::consts::PI / radial_segments as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            mesh.positions
                .push(Vec3::new(cos_p * radius, y, sin_p * radius));
            mesh.normals.push(axial);
        }
        for s in 0..segs {
            let next = (s + 1) % segs;
            if y < 0.0 {
                mesh.indices
                    .extend_from_slice(&[center, edge + s, edge + next]);
            } else {
                mesh.indices
                    .extend_from_slice(&[center, edge + next, edge + s]);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = uv_sphere(1.5, 12, 8);
        for p in &mesh.positions {
            assert!((p.length() - 1.5).abs() < 1e-4);
        }
        assert!(!mesh.is_empty());
    }

    #[test]
    fn lod_tiers_shrink_triangle_count() {
        let lod = sphere_lod(1.0);
        assert!(lod.high.triangle_count() > lod.medium.triangle_count());
        assert!(lod.medium.triangle_count() > lod.low.triangle_count());
    }

    #[test]
    fn cylinder_spans_unit_height() {
        let mesh = unit_cylinder(0.2, 8);
        let min_y = mesh.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert_eq!(min_y, -0.5);
        assert_eq!(max_y, 0.5);
    }

    #[test]
    fn append_offsets_indices() {
        let mut a = uv_sphere(1.0, 4, 3);
        let b = uv_sphere(1.0, 4, 3);
        let verts = a.positions.len() as u32;
        let tris = a.triangle_count();
        a.append(&b);
        assert_eq!(a.triangle_count(), tris * 2);
        assert!(a.indices.iter().any(|&i| i >= verts));
    }
}
