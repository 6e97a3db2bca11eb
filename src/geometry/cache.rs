//! Multi-tier geometry caches.
//!
//! The [`GeometryCache`] shares sphere/cylinder LOD meshes and materials
//! across every atom that differs only in position; its key space is small
//! and bounded by the discrete radius/color combinations that occur in
//! practice, so it never evicts. The [`RibbonCache`] stores per-chain base
//! ribbon nodes (geometry only, pre-highlight) and is bounded with genuine
//! insertion-order FIFO eviction.

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, trace};
use rustc_hash::FxHashMap;

use super::primitives::{sphere_lod, unit_cylinder_lod, LodMesh};
use crate::scene::{Material, SceneNode};

/// Maximum number of per-chain base ribbons kept alive.
pub const RIBBON_CACHE_CAPACITY: usize = 50;

/// Quantized shape key: radius in milli-angstroms plus 8-bit color.
///
/// Near-identical colors collapse onto one cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ShapeKey {
    radius_milli: u32,
    color: [u8; 3],
}

impl ShapeKey {
    fn new(radius: f32, color: [f32; 3]) -> Self {
        Self {
            radius_milli: (radius.max(0.0) * 1000.0).round() as u32,
            color: quantize(color),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MaterialKey {
    color: [u8; 3],
    opacity: u8,
    glossy: bool,
}

/// Shared store of reusable primitive meshes and materials.
#[derive(Debug, Default)]
pub struct GeometryCache {
    materials: FxHashMap<MaterialKey, Arc<Material>>,
    spheres: FxHashMap<ShapeKey, Arc<LodMesh>>,
    cylinders: FxHashMap<ShapeKey, Arc<LodMesh>>,
}

impl GeometryCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared diffuse material for a quantized color/opacity pair.
    pub fn material(&mut self, color: [f32; 3], opacity: f32) -> Arc<Material> {
        self.material_inner(color, opacity, false)
    }

    /// Shared glossy material (surface-style shading hints).
    pub fn glossy_material(
        &mut self,
        color: [f32; 3],
        opacity: f32,
    ) -> Arc<Material> {
        self.material_inner(color, opacity, true)
    }

    /// Sphere mesh with three LOD tiers for a (radius, color) key.
    ///
    /// Built once per key; subsequent calls return the same `Arc`.
    pub fn sphere(&mut self, radius: f32, color: [f32; 3]) -> Arc<LodMesh> {
        let key = ShapeKey::new(radius, color);
        Arc::clone(self.spheres.entry(key).or_insert_with(|| {
            trace!("building sphere mesh r={radius}");
            Arc::new(sphere_lod(radius))
        }))
    }

    /// Unit-height cylinder mesh with three LOD tiers.
    ///
    /// Callers stretch the height axis to the actual bond length, so one
    /// mesh serves every bond of the same radius/color.
    pub fn unit_cylinder(
        &mut self,
        radius: f32,
        color: [f32; 3],
    ) -> Arc<LodMesh> {
        let key = ShapeKey::new(radius, color);
        Arc::clone(self.cylinders.entry(key).or_insert_with(|| {
            trace!("building cylinder mesh r={radius}");
            Arc::new(unit_cylinder_lod(radius))
        }))
    }

    /// Number of distinct cached meshes (spheres plus cylinders).
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.spheres.len() + self.cylinders.len()
    }

    fn material_inner(
        &mut self,
        color: [f32; 3],
        opacity: f32,
        glossy: bool,
    ) -> Arc<Material> {
        let key = MaterialKey {
            color: quantize(color),
            opacity: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            glossy,
        };
        Arc::clone(self.materials.entry(key).or_insert_with(|| {
            Arc::new(if glossy {
                Material::glossy(color, opacity)
            } else {
                Material::diffuse(color, opacity)
            })
        }))
    }
}

/// Key for one chain's base ribbon mesh.
///
/// Highlight and focus state are deliberately excluded so toggling a
/// selection never invalidates built geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RibbonKey {
    chain: String,
    width_milli: u32,
    flatness_milli: u32,
    atom_count: usize,
    optimized: bool,
}

impl RibbonKey {
    /// Build a key from raw build parameters.
    #[must_use]
    pub fn new(
        chain: &str,
        width: f32,
        flatness: f32,
        atom_count: usize,
        optimized: bool,
    ) -> Self {
        Self {
            chain: chain.to_owned(),
            width_milli: (width.max(0.0) * 1000.0).round() as u32,
            flatness_milli: (flatness.max(0.0) * 1000.0).round() as u32,
            atom_count,
            optimized,
        }
    }
}

/// Bounded store of pre-highlight ribbon base nodes, FIFO-evicted.
#[derive(Debug, Default)]
pub struct RibbonCache {
    entries: FxHashMap<RibbonKey, SceneNode>,
    order: VecDeque<RibbonKey>,
}

impl RibbonCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the cached base node for a key, if present.
    ///
    /// Callers apply highlight coloring to the clone; the cached original
    /// stays pristine. Mesh buffers are shared through `Arc`, so the clone
    /// is cheap.
    #[must_use]
    pub fn get(&self, key: &RibbonKey) -> Option<SceneNode> {
        self.entries.get(key).cloned()
    }

    /// Insert a base node, evicting the oldest entry beyond capacity.
    pub fn put(&mut self, key: RibbonKey, node: SceneNode) {
        if self.entries.insert(key.clone(), node).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > RIBBON_CACHE_CAPACITY {
            // `order` mirrors `entries` insertion order exactly.
            let Some(oldest) = self.order.pop_front() else { break };
            debug!("ribbon cache evicting oldest entry");
            let _ = self.entries.remove(&oldest);
        }
    }

    /// Number of cached base ribbons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn quantize(color: [f32; 3]) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}
