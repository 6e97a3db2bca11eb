use glam::Vec3;
use rustc_hash::FxHashSet;

/// Secondary structure classification for a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecondaryStructure {
    /// Alpha helix.
    Helix,
    /// Beta sheet.
    Sheet,
    /// Loop/coil region.
    Coil,
    /// No classification available.
    #[default]
    Unknown,
}

/// A single atom, immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Identifier, unique within a structure.
    pub id: u32,
    /// Element symbol (e.g. `"C"`, `"N"`, `"FE"`).
    pub element: String,
    /// Atom name within its residue (e.g. `"CA"` for the backbone marker).
    pub name: String,
    /// Chain identifier.
    pub chain: String,
    /// Three-letter residue name (e.g. `"ALA"`, `"HEM"`).
    pub residue_name: String,
    /// Residue sequence number within the chain.
    pub residue_seq: i32,
    /// Position in angstroms. Assumed finite (validated by the parser).
    pub position: Vec3,
    /// Secondary structure classification of the parent residue.
    pub secondary_structure: SecondaryStructure,
    /// Whether this atom belongs to the polymer backbone.
    pub is_backbone: bool,
    /// Whether this atom belongs to a ligand/cofactor.
    pub is_ligand: bool,
    /// Whether this atom belongs to an annotated binding pocket.
    pub is_pocket: bool,
}

impl Atom {
    /// Whether this atom is the per-residue backbone marker (Cα-equivalent)
    /// used to drive ribbon spline construction.
    #[must_use]
    pub fn is_backbone_marker(&self) -> bool {
        self.is_backbone && self.name == "CA"
    }
}

/// A covalent bond between two atoms, referenced by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// First endpoint atom id.
    pub atom_a: u32,
    /// Second endpoint atom id.
    pub atom_b: u32,
}

/// An ordered collection of atoms plus bonds and free-text annotations.
///
/// Bonds whose endpoints are missing from `atoms` are tolerated; they are
/// filtered at render time rather than rejected at construction.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Atoms in parser order.
    pub atoms: Vec<Atom>,
    /// Covalent bonds between atom ids.
    pub bonds: Vec<Bond>,
    /// Free-text annotations (header records, remarks).
    pub annotations: Vec<String>,
}

impl Structure {
    /// Number of atoms.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Distinct chain identifiers in first-appearance order.
    #[must_use]
    pub fn chain_ids(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for atom in &self.atoms {
            if seen.insert(atom.chain.as_str()) {
                out.push(atom.chain.clone());
            }
        }
        out
    }

    /// Bonds whose endpoints are both present in the given id set.
    ///
    /// Sampling is expected to drop atoms, so dangling bonds are a normal
    /// condition, excluded silently.
    pub fn bonds_within<'a>(
        &'a self,
        ids: &'a FxHashSet<u32>,
    ) -> impl Iterator<Item = &'a Bond> {
        self.bonds
            .iter()
            .filter(move |b| ids.contains(&b.atom_a) && ids.contains(&b.atom_b))
    }
}
