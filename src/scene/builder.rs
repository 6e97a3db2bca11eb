//! Scene construction: sampling, per-style primitive generation, highlight
//! and focus material assignment, and assembly into a node hierarchy.
//!
//! The builder owns both caches explicitly (no global state); a single
//! builder instance is expected per structure, with concurrency discipline
//! enforced by the update controller rather than by locks.

use std::sync::Arc;

use glam::{Quat, Vec3};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use super::color::{
    atom_radius, chain_color, highlight_color, resolve_color,
    resolve_opacity, secondary_structure_color,
};
use super::node::{
    atom_node_name, ribbon_node_name, NodeMesh, SceneNode, Transform,
};
use super::DisplaySnapshot;
use crate::bounds::{
    camera_distance, compute_bounds, compute_focus_bounds, BoundsInfo,
};
use crate::geometry::{
    build_ribbon, GeometryCache, RibbonCache, RibbonKey, MIN_RIBBON_POINTS,
};
use crate::model::{Atom, Structure};
use crate::options::{segments_per_span, ColorMode, DisplayStyle};
use crate::sampling::{sample_chain_by_structure, sample_proportional};

/// Bonds shorter than this are considered degenerate and skipped.
const MIN_BOND_LENGTH: f32 = 1e-4;

/// Neutral bond cylinder color.
const BOND_COLOR: [f32; 3] = [0.78, 0.78, 0.78];

/// Advisory progress callback; receives phase strings such as
/// `"creating atoms"` or `"processing chain 2/4"`.
pub type ProgressCallback = Box<dyn Fn(&str) + Send>;

/// A built node hierarchy plus framing data, ready for the renderer.
#[derive(Debug, Clone)]
pub struct BuiltScene {
    /// Root of the node tree.
    pub root: SceneNode,
    /// Bounds of the structure (or of the focus subset when one is active).
    pub bounds: BoundsInfo,
    /// Derived camera distance.
    pub camera_distance: f32,
    /// Chain id to index of the chain's ribbon node in `root.children`.
    ribbon_nodes: FxHashMap<String, usize>,
}

impl BuiltScene {
    /// The ribbon node for a chain, if one was built.
    #[must_use]
    pub fn ribbon_node(&self, chain: &str) -> Option<&SceneNode> {
        self.ribbon_nodes
            .get(chain)
            .and_then(|&i| self.root.children.get(i))
    }

    fn ribbon_node_mut(&mut self, chain: &str) -> Option<&mut SceneNode> {
        self.ribbon_nodes
            .get(chain)
            .copied()
            .and_then(|i| self.root.children.get_mut(i))
    }
}

/// Orchestrates sampling, geometry generation, and material assignment.
pub struct SceneBuilder {
    geometry: GeometryCache,
    ribbons: RibbonCache,
    progress: Option<ProgressCallback>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    /// Builder with fresh caches.
    #[must_use]
    pub fn new() -> Self {
        Self {
            geometry: GeometryCache::new(),
            ribbons: RibbonCache::new(),
            progress: None,
        }
    }

    /// Attach an advisory progress callback.
    #[must_use]
    pub fn with_progress(
        mut self,
        callback: impl Fn(&str) + Send + 'static,
    ) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Build the full scene for a structure under a parameter snapshot.
    pub fn build(
        &mut self,
        structure: &Structure,
        snapshot: &DisplaySnapshot,
    ) -> BuiltScene {
        let mut root = SceneNode::group("structure");
        let mut ribbon_nodes = FxHashMap::default();

        match snapshot.display.style {
            DisplayStyle::Ribbon => self.build_ribbon_scene(
                structure,
                snapshot,
                &mut root,
                &mut ribbon_nodes,
            ),
            _ => self.build_atom_scene(structure, snapshot, &mut root),
        }

        let bounds = snapshot.selection.focus.as_ref().map_or_else(
            || compute_bounds(&structure.atoms),
            |focus| compute_focus_bounds(structure, focus),
        );
        let distance = camera_distance(
            bounds.size,
            snapshot.framing,
            snapshot.display.zoom_level,
        );

        BuiltScene {
            root,
            bounds,
            camera_distance: distance,
            ribbon_nodes,
        }
    }

    /// Recolor the ribbon nodes for the given chains in place, without
    /// touching geometry.
    ///
    /// Returns `false` when any targeted node is missing, in which case the
    /// caller falls back to a full rebuild (always correct, more expensive).
    pub fn apply_selective_highlight(
        &mut self,
        scene: &mut BuiltScene,
        structure: &Structure,
        snapshot: &DisplaySnapshot,
        chains: &[String],
    ) -> bool {
        if snapshot.display.style != DisplayStyle::Ribbon {
            return false;
        }
        for chain in chains {
            let markers = chain_markers(structure, chain, snapshot);
            let expected = ribbon_node_name(chain);
            let Some(node) = scene.ribbon_node_mut(chain) else {
                debug!("selective update: no ribbon node for chain {chain}");
                return false;
            };
            if node.name != expected {
                return false;
            }
            recolor_ribbon(
                &mut self.geometry,
                node,
                chain,
                &markers,
                snapshot,
            );
        }
        true
    }

    // ---- ribbon branch ---------------------------------------------------

    fn build_ribbon_scene(
        &mut self,
        structure: &Structure,
        snapshot: &DisplaySnapshot,
        root: &mut SceneNode,
        ribbon_nodes: &mut FxHashMap<String, usize>,
    ) {
        let chains = structure.chain_ids();
        let total = chains.len();
        let optimized =
            snapshot.sampling.should_sample(structure.atom_count());

        for (i, chain) in chains.iter().enumerate() {
            self.report(&format!("processing chain {}/{total}", i + 1));

            let markers = chain_markers(structure, chain, snapshot);
            if markers.len() < MIN_RIBBON_POINTS {
                debug!(
                    "chain {chain}: {} markers, skipping ribbon",
                    markers.len()
                );
                continue;
            }

            let key = RibbonKey::new(
                chain,
                snapshot.geometry.ribbon_width,
                snapshot.geometry.ribbon_flatness,
                markers.len(),
                optimized,
            );
            let base = self.ribbons.get(&key).or_else(|| {
                let node =
                    self.build_base_ribbon(chain, &markers, snapshot)?;
                self.ribbons.put(key, node.clone());
                Some(node)
            });
            let Some(mut node) = base else { continue };

            recolor_ribbon(
                &mut self.geometry,
                &mut node,
                chain,
                &markers,
                snapshot,
            );

            let _ = ribbon_nodes.insert(chain.clone(), root.children.len());
            root.children.push(node);
        }

        // Ribbon mode never omits non-backbone functional atoms.
        self.report("creating atoms");
        let ligands = self.functional_atom_group(
            "ligands",
            structure,
            snapshot,
            |a| a.is_ligand,
        );
        if let Some(group) = ligands {
            root.children.push(group);
        }
        let pockets = self.functional_atom_group(
            "pockets",
            structure,
            snapshot,
            |a| a.is_pocket && !a.is_ligand,
        );
        if let Some(group) = pockets {
            root.children.push(group);
        }
    }

    /// Base (pre-highlight) ribbon node for one chain: one strip child per
    /// residue, each with placeholder material replaced on every build.
    fn build_base_ribbon(
        &mut self,
        chain: &str,
        markers: &[Atom],
        snapshot: &DisplaySnapshot,
    ) -> Option<SceneNode> {
        let positions: Vec<Vec3> =
            markers.iter().map(|a| a.position).collect();
        let strips = build_ribbon(
            &positions,
            snapshot.geometry.ribbon_width,
            snapshot.geometry.ribbon_flatness,
            segments_per_span(markers.len()),
        )?;

        let mut node = SceneNode::group(ribbon_node_name(chain));
        for strip in strips {
            let ss = markers
                .get(strip.residue)
                .map(|a| a.secondary_structure)
                .unwrap_or_default();
            let material = self
                .geometry
                .material(secondary_structure_color(ss), 1.0);
            node.children.push(SceneNode::leaf(
                format!("res_{}", strip.residue),
                Transform::default(),
                NodeMesh::Owned(Arc::new(strip.mesh)),
                material,
            ));
        }
        Some(node)
    }

    /// Ligand or pocket atoms rendered as spheres. `None` when empty.
    fn functional_atom_group(
        &mut self,
        name: &str,
        structure: &Structure,
        snapshot: &DisplaySnapshot,
        filter: impl Fn(&Atom) -> bool,
    ) -> Option<SceneNode> {
        let mut group = SceneNode::group(name);
        for atom in structure.atoms.iter().filter(|a| filter(a)) {
            group.children.push(self.atom_sphere(atom, snapshot));
        }
        (!group.children.is_empty()).then_some(group)
    }

    // ---- sphere/stick/cartoon/surface branch -----------------------------

    fn build_atom_scene(
        &mut self,
        structure: &Structure,
        snapshot: &DisplaySnapshot,
        root: &mut SceneNode,
    ) {
        let atom_count = structure.atom_count();
        let sampled: Vec<Atom> =
            if snapshot.sampling.should_sample(atom_count) {
                let target = snapshot.sampling.target_count(atom_count);
                debug!("sampling structure {atom_count} -> {target} atoms");
                sample_proportional(&structure.atoms, target)
            } else {
                structure.atoms.clone()
            };

        let surviving: FxHashSet<u32> =
            sampled.iter().map(|a| a.id).collect();
        let by_id: FxHashMap<u32, &Atom> =
            sampled.iter().map(|a| (a.id, a)).collect();

        self.report("creating atoms");
        let mut atoms_group = SceneNode::group("atoms");
        for atom in sampled.iter().filter(|a| !a.is_ligand) {
            atoms_group.children.push(self.atom_sphere(atom, snapshot));
        }
        if !atoms_group.children.is_empty() {
            root.children.push(atoms_group);
        }

        self.report("creating bonds");
        let mut bonds_group = SceneNode::group("bonds");
        let mut ligand_group = SceneNode::group("ligands");
        for atom in sampled.iter().filter(|a| a.is_ligand) {
            ligand_group.children.push(self.atom_sphere(atom, snapshot));
        }

        for bond in structure.bonds_within(&surviving) {
            let (Some(a), Some(b)) =
                (by_id.get(&bond.atom_a), by_id.get(&bond.atom_b))
            else {
                continue;
            };
            let Some(node) = self.bond_cylinder(a, b, snapshot) else {
                continue;
            };
            if a.is_ligand || b.is_ligand {
                ligand_group.children.push(node);
            } else {
                bonds_group.children.push(node);
            }
        }

        if !bonds_group.children.is_empty() {
            root.children.push(bonds_group);
        }
        if !ligand_group.children.is_empty() {
            root.children.push(ligand_group);
        }
    }

    /// Sphere node for one atom, named for pick round-trips.
    fn atom_sphere(
        &mut self,
        atom: &Atom,
        snapshot: &DisplaySnapshot,
    ) -> SceneNode {
        let selection = &snapshot.selection;
        let highlighted =
            selection.is_highlighted(atom) || selection.is_focused(atom);

        let mut color = resolve_color(
            atom,
            snapshot.display.color_mode,
            snapshot.display.uniform_color,
        );
        if highlighted {
            color = highlight_color(color);
        }

        let mut opacity =
            resolve_opacity(atom, selection, snapshot.display.transparency);
        let surface = snapshot.display.style == DisplayStyle::Surface;
        if surface {
            opacity *= snapshot.geometry.surface_opacity;
        }

        let radius = atom_radius(
            atom,
            &snapshot.display,
            &snapshot.geometry,
            highlighted,
        );
        let mesh = self.geometry.sphere(radius, color);
        let material = if surface {
            self.geometry.glossy_material(color, opacity)
        } else {
            self.geometry.material(color, opacity)
        };

        SceneNode::leaf(
            atom_node_name(atom.id),
            Transform::at(atom.position),
            NodeMesh::Shared(mesh),
            material,
        )
    }

    /// Cylinder node for one bond: cached unit mesh, stretched along its
    /// height axis to the endpoint distance. Degenerate bonds yield `None`.
    fn bond_cylinder(
        &mut self,
        a: &Atom,
        b: &Atom,
        snapshot: &DisplaySnapshot,
    ) -> Option<SceneNode> {
        let delta = b.position - a.position;
        let length = delta.length();
        if length < MIN_BOND_LENGTH {
            return None;
        }

        let selection = &snapshot.selection;
        let opacity = resolve_opacity(a, selection, snapshot.display.transparency)
            .min(resolve_opacity(b, selection, snapshot.display.transparency));

        let mesh = self
            .geometry
            .unit_cylinder(snapshot.geometry.bond_radius, BOND_COLOR);
        let material = self.geometry.material(BOND_COLOR, opacity);

        let transform = Transform {
            translation: (a.position + b.position) * 0.5,
            rotation: Quat::from_rotation_arc(Vec3::Y, delta / length),
            scale: Vec3::new(1.0, length, 1.0),
        };
        Some(SceneNode::leaf(
            format!("bond_{}_{}", a.id, b.id),
            transform,
            NodeMesh::Shared(mesh),
            material,
        ))
    }

    fn report(&self, phase: &str) {
        debug!("{phase}");
        if let Some(callback) = &self.progress {
            callback(phase);
        }
    }
}

/// One backbone marker per residue for a chain, sorted by residue number,
/// down-sampled per secondary structure when chain optimization applies.
pub(crate) fn chain_markers(
    structure: &Structure,
    chain: &str,
    snapshot: &DisplaySnapshot,
) -> Vec<Atom> {
    let mut markers: Vec<Atom> = structure
        .atoms
        .iter()
        .filter(|a| a.chain == chain && a.is_backbone_marker())
        .cloned()
        .collect();
    markers.sort_by_key(|a| a.residue_seq);
    markers.dedup_by_key(|a| a.residue_seq);

    if snapshot.sampling.should_sample(structure.atom_count()) {
        let target = snapshot.sampling.target_count(markers.len());
        markers = sample_chain_by_structure(&markers, target);
    }
    markers
}

/// Apply highlight/focus-aware materials to every strip of a ribbon node.
///
/// Geometry is untouched; only materials are replaced, which is what makes
/// cache hits and selective updates cheap.
fn recolor_ribbon(
    cache: &mut GeometryCache,
    node: &mut SceneNode,
    chain: &str,
    markers: &[Atom],
    snapshot: &DisplaySnapshot,
) {
    let chain_highlighted = snapshot.selection.chains.contains(chain);

    for child in &mut node.children {
        let Some(residue) = child
            .name
            .strip_prefix("res_")
            .and_then(|s| s.parse::<usize>().ok())
        else {
            continue;
        };
        let Some(marker) = markers.get(residue) else { continue };

        let mut color = match snapshot.display.color_mode {
            ColorMode::SecondaryStructure => {
                secondary_structure_color(marker.secondary_structure)
            }
            ColorMode::Uniform => snapshot.display.uniform_color,
            ColorMode::Element | ColorMode::Chain => chain_color(chain),
        };
        if chain_highlighted || snapshot.selection.is_highlighted(marker) {
            color = highlight_color(color);
        }
        let opacity = resolve_opacity(
            marker,
            &snapshot.selection,
            snapshot.display.transparency,
        );
        child.material = Some(cache.material(color, opacity));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc as StdArc;

    use glam::Vec3;

    use super::*;
    use crate::model::{Bond, SecondaryStructure};
    use crate::selection::FocusTarget;

    fn marker(id: u32, chain: &str, seq: i32, pos: Vec3) -> Atom {
        Atom {
            id,
            element: "C".to_owned(),
            name: "CA".to_owned(),
            chain: chain.to_owned(),
            residue_name: "ALA".to_owned(),
            residue_seq: seq,
            position: pos,
            secondary_structure: SecondaryStructure::Helix,
            is_backbone: true,
            is_ligand: false,
            is_pocket: false,
        }
    }

    fn two_chain_structure() -> Structure {
        // Chain A: 4 backbone markers in a line; chain B: only 2.
        let mut atoms = Vec::new();
        for i in 0..4 {
            atoms.push(marker(
                i,
                "A",
                i as i32,
                Vec3::new(i as f32 * 3.8, 0.0, 0.0),
            ));
        }
        for i in 0..2 {
            atoms.push(marker(
                10 + i,
                "B",
                i as i32,
                Vec3::new(i as f32 * 3.8, 10.0, 0.0),
            ));
        }
        Structure {
            atoms,
            bonds: vec![],
            annotations: vec![],
        }
    }

    fn ribbon_snapshot() -> DisplaySnapshot {
        DisplaySnapshot::default() // default style is Ribbon
    }

    #[test]
    fn two_chain_ribbon_scenario() {
        let structure = two_chain_structure();
        let mut builder = SceneBuilder::new();
        let scene = builder.build(&structure, &ribbon_snapshot());

        // One ribbon node for chain A, none for chain B, no ligand/pocket
        // groups: exactly one child under the root.
        assert_eq!(scene.root.children.len(), 1);
        assert!(scene.ribbon_node("A").is_some());
        assert!(scene.ribbon_node("B").is_none());
        assert_eq!(
            scene.root.children[0].name,
            ribbon_node_name("A")
        );
    }

    #[test]
    fn ribbon_mode_always_renders_ligands_and_pockets() {
        let mut structure = two_chain_structure();
        let mut hem = marker(50, "A", 99, Vec3::new(5.0, 5.0, 5.0));
        hem.is_ligand = true;
        hem.is_backbone = false;
        hem.name = "FE".to_owned();
        hem.residue_name = "HEM".to_owned();
        structure.atoms.push(hem);

        let mut builder = SceneBuilder::new();
        let scene = builder.build(&structure, &ribbon_snapshot());
        let ligands = scene.root.find("ligands").unwrap();
        assert_eq!(ligands.children.len(), 1);
        assert_eq!(ligands.children[0].name, atom_node_name(50));
    }

    #[test]
    fn selective_highlight_preserves_geometry_identity() {
        let structure = two_chain_structure();
        let mut builder = SceneBuilder::new();
        let snapshot = ribbon_snapshot();
        let mut scene = builder.build(&structure, &snapshot);

        let before: Vec<_> = scene.ribbon_node("A").unwrap().children.iter()
            .map(|c| (c.mesh.clone(), c.material.clone()))
            .collect();

        let mut next = snapshot.clone();
        let _ = next.selection.chains.insert("A".to_owned());
        let ok = builder.apply_selective_highlight(
            &mut scene,
            &structure,
            &next,
            &["A".to_owned()],
        );
        assert!(ok);

        let after = &scene.ribbon_node("A").unwrap().children;
        assert_eq!(before.len(), after.len());
        for ((mesh, material), node) in before.iter().zip(after.iter()) {
            // Mesh buffers unchanged, materials replaced.
            let (Some(old), Some(new)) = (mesh, &node.mesh) else {
                panic!("strip lost its mesh");
            };
            assert!(old.same_geometry(new));
            let (Some(old_m), Some(new_m)) = (material, &node.material)
            else {
                panic!("strip lost its material");
            };
            assert_ne!(old_m.color, new_m.color);
        }
    }

    #[test]
    fn selective_highlight_fails_for_unknown_chain() {
        let structure = two_chain_structure();
        let mut builder = SceneBuilder::new();
        let snapshot = ribbon_snapshot();
        let mut scene = builder.build(&structure, &snapshot);
        // Chain B never produced a ribbon node.
        assert!(!builder.apply_selective_highlight(
            &mut scene,
            &structure,
            &snapshot,
            &["B".to_owned()],
        ));
    }

    #[test]
    fn rebuild_reuses_cached_ribbon_geometry() {
        let structure = two_chain_structure();
        let mut builder = SceneBuilder::new();
        let snapshot = ribbon_snapshot();

        let first = builder.build(&structure, &snapshot);
        let second = builder.build(&structure, &snapshot);

        let a = &first.ribbon_node("A").unwrap().children[0];
        let b = &second.ribbon_node("A").unwrap().children[0];
        let (Some(ma), Some(mb)) = (&a.mesh, &b.mesh) else {
            panic!("missing strip mesh");
        };
        assert!(ma.same_geometry(mb), "ribbon cache miss on identical key");
    }

    #[test]
    fn sticks_scene_builds_atoms_and_bonds() {
        let mut structure = two_chain_structure();
        structure.bonds = vec![
            Bond { atom_a: 0, atom_b: 1 },
            Bond { atom_a: 1, atom_b: 2 },
            // Dangling endpoint, silently excluded.
            Bond { atom_a: 2, atom_b: 77 },
        ];
        let mut snapshot = ribbon_snapshot();
        snapshot.display.style = DisplayStyle::Sticks;

        let mut builder = SceneBuilder::new();
        let scene = builder.build(&structure, &snapshot);
        assert_eq!(scene.root.find("atoms").unwrap().children.len(), 6);
        assert_eq!(scene.root.find("bonds").unwrap().children.len(), 2);
    }

    #[test]
    fn degenerate_bond_is_skipped() {
        let mut structure = two_chain_structure();
        // Two atoms at the same position.
        structure.atoms.push(marker(20, "A", 50, Vec3::ZERO));
        structure.atoms.push(marker(21, "A", 51, Vec3::ZERO));
        structure.bonds = vec![Bond { atom_a: 20, atom_b: 21 }];
        let mut snapshot = ribbon_snapshot();
        snapshot.display.style = DisplayStyle::Spheres;

        let mut builder = SceneBuilder::new();
        let scene = builder.build(&structure, &snapshot);
        assert!(scene.root.find("bonds").is_none());
    }

    #[test]
    fn focus_narrows_bounds_and_camera() {
        let structure = two_chain_structure();
        let mut snapshot = ribbon_snapshot();
        let mut builder = SceneBuilder::new();
        let whole = builder.build(&structure, &snapshot);

        snapshot.selection.focus =
            Some(FocusTarget::Atom(0));
        let focused = builder.build(&structure, &snapshot);
        assert!(focused.bounds.size < whole.bounds.size);
        assert_eq!(focused.bounds.center, Vec3::ZERO);
    }

    #[test]
    fn progress_phases_are_reported() {
        let count = StdArc::new(AtomicUsize::new(0));
        let seen = StdArc::clone(&count);
        let mut builder = SceneBuilder::new().with_progress(move |_| {
            let _ = seen.fetch_add(1, Ordering::Relaxed);
        });
        let _ = builder.build(&two_chain_structure(), &ribbon_snapshot());
        // Two chain phases plus the atom phase.
        assert!(count.load(Ordering::Relaxed) >= 3);
    }

    #[test]
    fn surface_style_uses_semi_transparent_glossy_spheres() {
        let structure = two_chain_structure();
        let mut snapshot = ribbon_snapshot();
        snapshot.display.style = DisplayStyle::Surface;
        let mut builder = SceneBuilder::new();
        let scene = builder.build(&structure, &snapshot);

        let atoms = scene.root.find("atoms").unwrap();
        let material = atoms.children[0].material.as_ref().unwrap();
        assert!(material.opacity < 1.0);
        assert!(material.roughness < 0.5);
    }
}
