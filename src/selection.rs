//! Highlight and focus selection state.
//!
//! Highlight sets and the focus target are independent: highlights brighten
//! members without dimming the rest, while an active focus dims everything
//! outside it. At most one [`FocusTarget`] is active at a time, enforced by
//! the `Option` in [`SelectionState`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::Atom;

/// The substructure the camera and opacity cascade center on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// Focus an entire chain by chain id.
    Chain(String),
    /// Focus all atoms of a ligand by residue name.
    Ligand(String),
    /// Focus all atoms of an annotated pocket by residue name.
    Pocket(String),
    /// Focus a single atom by id.
    Atom(u32),
}

impl FocusTarget {
    /// Whether the given atom belongs to this focus target.
    #[must_use]
    pub fn contains(&self, atom: &Atom) -> bool {
        match self {
            Self::Chain(id) => atom.chain == *id,
            Self::Ligand(name) => {
                atom.is_ligand && atom.residue_name == *name
            }
            Self::Pocket(name) => {
                atom.is_pocket && atom.residue_name == *name
            }
            Self::Atom(id) => atom.id == *id,
        }
    }
}

/// Highlighted chain/ligand/pocket sets plus the optional focus target.
///
/// `BTreeSet` keeps membership iteration deterministic, which keeps diffing
/// and cache keys stable across rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionState {
    /// Highlighted chain ids.
    pub chains: BTreeSet<String>,
    /// Highlighted ligand residue names.
    pub ligands: BTreeSet<String>,
    /// Highlighted pocket residue names.
    pub pockets: BTreeSet<String>,
    /// Active focus target, if any.
    pub focus: Option<FocusTarget>,
}

impl SelectionState {
    /// Whether the atom is a member of any highlight set.
    #[must_use]
    pub fn is_highlighted(&self, atom: &Atom) -> bool {
        self.chains.contains(&atom.chain)
            || (atom.is_ligand && self.ligands.contains(&atom.residue_name))
            || (atom.is_pocket && self.pockets.contains(&atom.residue_name))
    }

    /// Whether the atom is inside the active focus target.
    ///
    /// `false` when no focus is active.
    #[must_use]
    pub fn is_focused(&self, atom: &Atom) -> bool {
        self.focus.as_ref().is_some_and(|f| f.contains(atom))
    }

    /// Whether any selection (highlight or focus) is active at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
            && self.ligands.is_empty()
            && self.pockets.is_empty()
            && self.focus.is_none()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::model::SecondaryStructure;

    fn ligand_atom(name: &str) -> Atom {
        Atom {
            id: 7,
            element: "C".to_owned(),
            name: "C1".to_owned(),
            chain: "A".to_owned(),
            residue_name: name.to_owned(),
            residue_seq: 200,
            position: Vec3::ZERO,
            secondary_structure: SecondaryStructure::Unknown,
            is_backbone: false,
            is_ligand: true,
            is_pocket: false,
        }
    }

    #[test]
    fn ligand_focus_matches_by_residue_name() {
        let focus = FocusTarget::Ligand("HEM".to_owned());
        assert!(focus.contains(&ligand_atom("HEM")));
        assert!(!focus.contains(&ligand_atom("ATP")));
    }

    #[test]
    fn highlight_and_focus_are_independent() {
        let mut sel = SelectionState::default();
        let _ = sel.chains.insert("A".to_owned());
        let atom = ligand_atom("HEM");
        assert!(sel.is_highlighted(&atom)); // chain membership
        assert!(!sel.is_focused(&atom)); // no focus active
    }

    #[test]
    fn pocket_flag_gates_pocket_highlight() {
        let mut sel = SelectionState::default();
        let _ = sel.pockets.insert("HEM".to_owned());
        // Ligand atom with matching residue name but no pocket flag.
        assert!(!sel.is_highlighted(&ligand_atom("HEM")));
    }
}
