//! Scene node tree: named, positioned drawable units handed to the
//! downstream renderer.
//!
//! Ownership is tree-structured and exclusive. Mesh data is shared through
//! `Arc` so cloning a node (ribbon-cache hits, highlight recoloring) never
//! duplicates vertex buffers.

use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::geometry::{LodMesh, MeshData};

/// Material descriptor for a drawable node.
///
/// `roughness`/`metallic` are shading hints for the downstream renderer;
/// the surface style lowers roughness for a glossier look.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base RGB color, 0-1 range.
    pub color: [f32; 3],
    /// Opacity in `[0, 1]`; below 1 the renderer should alpha-blend.
    pub opacity: f32,
    /// Surface roughness hint.
    pub roughness: f32,
    /// Metalness hint.
    pub metallic: f32,
}

impl Material {
    /// Plain diffuse material.
    #[must_use]
    pub fn diffuse(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity,
            roughness: 0.8,
            metallic: 0.0,
        }
    }

    /// Glossy variant used for surface-style spheres.
    #[must_use]
    pub fn glossy(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity,
            roughness: 0.25,
            metallic: 0.1,
        }
    }
}

/// Node-local transform applied before the parent's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub translation: Vec3,
    /// Rotation.
    pub rotation: Quat,
    /// Non-uniform scale. Unit cylinders stretch their height axis here.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Pure translation.
    #[must_use]
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }
}

/// Geometry attached to a node: either a cached LOD shape shared across
/// atoms, or an owned (per-chain) mesh such as a ribbon strip.
#[derive(Debug, Clone)]
pub enum NodeMesh {
    /// Shared sphere/cylinder from the geometry cache.
    Shared(Arc<LodMesh>),
    /// Chain-specific geometry (ribbon strips).
    Owned(Arc<MeshData>),
}

impl NodeMesh {
    /// Whether two node meshes reference the same underlying buffers.
    #[must_use]
    pub fn same_geometry(&self, other: &NodeMesh) -> bool {
        match (self, other) {
            (Self::Shared(a), Self::Shared(b)) => Arc::ptr_eq(a, b),
            (Self::Owned(a), Self::Owned(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A named drawable unit or group of units.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name. Atom nodes are named deterministically from their id so
    /// a screen-space pick resolves back to an atom.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Attached geometry, if this node draws anything itself.
    pub mesh: Option<NodeMesh>,
    /// Material for the attached geometry.
    pub material: Option<Arc<Material>>,
    /// Exclusively owned children.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty group node.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            material: None,
            children: Vec::new(),
        }
    }

    /// Leaf node with geometry and material.
    #[must_use]
    pub fn leaf(
        name: impl Into<String>,
        transform: Transform,
        mesh: NodeMesh,
        material: Arc<Material>,
    ) -> Self {
        Self {
            name: name.into(),
            transform,
            mesh: Some(mesh),
            material: Some(material),
            children: Vec::new(),
        }
    }

    /// Depth-first search by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Depth-first search by name, mutable.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Total number of nodes in this subtree, including self.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SceneNode::subtree_len).sum::<usize>()
    }
}

/// Deterministic node name for an atom id.
#[must_use]
pub fn atom_node_name(id: u32) -> String {
    format!("atom_{id}")
}

/// Resolve a picked node name back to an atom id.
#[must_use]
pub fn atom_id_from_node_name(name: &str) -> Option<u32> {
    name.strip_prefix("atom_")?.parse().ok()
}

/// Deterministic node name for a chain's ribbon.
#[must_use]
pub fn ribbon_node_name(chain: &str) -> String {
    format!("ribbon_chain_{chain}")
}
