//! Deterministic atom down-sampling.
//!
//! All sampling is stride-based with integer truncation: no randomness,
//! order preserved, identical inputs always give identical outputs. The
//! proportional variants guarantee per-group floors so no chain (or
//! secondary-structure run) disappears entirely under aggressive
//! optimization.

use log::debug;
use rustc_hash::FxHashMap;

use crate::model::{Atom, SecondaryStructure};

/// Minimum atoms retained per chain by [`sample_proportional`].
pub const CHAIN_FLOOR: usize = 50;

/// Minimum atoms retained per secondary-structure group by
/// [`sample_chain_by_structure`].
pub const STRUCTURE_GROUP_FLOOR: usize = 10;

/// Pick `target` atoms at integer-truncated stride offsets.
///
/// Identity when `target >= atoms.len()`; empty when `target` is zero.
#[must_use]
pub fn sample_evenly(atoms: &[Atom], target: usize) -> Vec<Atom> {
    if target >= atoms.len() {
        return atoms.to_vec();
    }
    if target == 0 {
        return Vec::new();
    }
    let stride = atoms.len() as f32 / target as f32;
    (0..target)
        .map(|i| atoms[(i as f32 * stride) as usize].clone())
        .collect()
}

/// Down-sample to roughly `max_total` atoms while preserving per-chain
/// proportions.
///
/// Each chain's target is `round(chain_len * max_total / total)`, clamped
/// to a floor of [`CHAIN_FLOOR`] atoms (or the whole chain when smaller),
/// so the output may exceed `max_total` by floor rounding but never loses
/// a chain.
#[must_use]
pub fn sample_proportional(atoms: &[Atom], max_total: usize) -> Vec<Atom> {
    if atoms.len() <= max_total {
        return atoms.to_vec();
    }

    let groups = group_by_chain(atoms);
    let ratio = max_total as f32 / atoms.len() as f32;

    let mut out = Vec::with_capacity(max_total);
    for (chain, chain_atoms) in &groups {
        let target = ((chain_atoms.len() as f32 * ratio).round() as usize)
            .max(CHAIN_FLOOR.min(chain_atoms.len()));
        debug!(
            "sampling chain {chain}: {} -> {target} atoms",
            chain_atoms.len()
        );
        out.extend(sample_evenly(chain_atoms, target));
    }
    out
}

/// Ribbon-mode chain optimization: sample while preserving per-secondary-
/// structure proportions within one chain.
///
/// Each structural group keeps at least [`STRUCTURE_GROUP_FLOOR`] atoms so
/// short helices and sheets survive; any residual excess over `max_total`
/// is then removed by a final even pass over the concatenated result.
#[must_use]
pub fn sample_chain_by_structure(
    atoms: &[Atom],
    max_total: usize,
) -> Vec<Atom> {
    if atoms.len() <= max_total {
        return atoms.to_vec();
    }

    let mut groups: Vec<(SecondaryStructure, Vec<Atom>)> = Vec::new();
    for atom in atoms {
        match groups.last_mut() {
            Some((ss, run)) if *ss == atom.secondary_structure => {
                run.push(atom.clone());
            }
            _ => groups
                .push((atom.secondary_structure, vec![atom.clone()])),
        }
    }

    let ratio = max_total as f32 / atoms.len() as f32;
    let mut out = Vec::with_capacity(max_total);
    for (_, run) in &groups {
        let target = ((run.len() as f32 * ratio).round() as usize)
            .max(STRUCTURE_GROUP_FLOOR.min(run.len()));
        out.extend(sample_evenly(run, target));
    }

    // Floors can leave the concatenation above budget; trim evenly so the
    // overall shape is preserved.
    if out.len() > max_total {
        out = sample_evenly(&out, max_total);
    }
    out
}

/// Group atoms by chain id, preserving first-appearance chain order and
/// original atom order within each chain.
fn group_by_chain(atoms: &[Atom]) -> Vec<(String, Vec<Atom>)> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut groups: Vec<(String, Vec<Atom>)> = Vec::new();
    for atom in atoms {
        if let Some(&i) = index.get(atom.chain.as_str()) {
            groups[i].1.push(atom.clone());
        } else {
            let _ = index.insert(atom.chain.as_str(), groups.len());
            groups.push((atom.chain.clone(), vec![atom.clone()]));
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn atoms_on_chain(chain: &str, count: usize, id_base: u32) -> Vec<Atom> {
        (0..count)
            .map(|i| Atom {
                id: id_base + i as u32,
                element: "C".to_owned(),
                name: "CA".to_owned(),
                chain: chain.to_owned(),
                residue_name: "ALA".to_owned(),
                residue_seq: i as i32,
                position: Vec3::new(i as f32, 0.0, 0.0),
                secondary_structure: SecondaryStructure::Coil,
                is_backbone: true,
                is_ligand: false,
                is_pocket: false,
            })
            .collect()
    }

    #[test]
    fn even_sampling_returns_exact_count_in_order() {
        let atoms = atoms_on_chain("A", 100, 0);
        let sampled = sample_evenly(&atoms, 25);
        assert_eq!(sampled.len(), 25);
        for pair in sampled.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn even_sampling_is_identity_when_target_covers_input() {
        let atoms = atoms_on_chain("A", 10, 0);
        assert_eq!(sample_evenly(&atoms, 10).len(), 10);
        assert_eq!(sample_evenly(&atoms, 50).len(), 10);
    }

    #[test]
    fn even_sampling_zero_target_is_empty() {
        let atoms = atoms_on_chain("A", 10, 0);
        assert!(sample_evenly(&atoms, 0).is_empty());
    }

    #[test]
    fn proportional_sampling_keeps_every_chain() {
        let mut atoms = atoms_on_chain("A", 900, 0);
        atoms.extend(atoms_on_chain("B", 60, 1000));
        atoms.extend(atoms_on_chain("C", 40, 2000));
        let sampled = sample_proportional(&atoms, 200);

        for chain in ["A", "B", "C"] {
            let n = sampled.iter().filter(|a| a.chain == chain).count();
            assert!(n > 0, "chain {chain} vanished");
        }
        // Small chains keep their floor (or their full size when smaller).
        let b = sampled.iter().filter(|a| a.chain == "B").count();
        let c = sampled.iter().filter(|a| a.chain == "C").count();
        assert_eq!(b, CHAIN_FLOOR);
        assert_eq!(c, 40);
    }

    #[test]
    fn proportional_sampling_respects_budget_within_floors() {
        let mut atoms = atoms_on_chain("A", 1000, 0);
        atoms.extend(atoms_on_chain("B", 1000, 5000));
        let sampled = sample_proportional(&atoms, 400);
        // Both chains are large, so floors never engage and the budget
        // holds up to per-chain rounding.
        assert!(sampled.len() <= 402, "got {}", sampled.len());
    }

    #[test]
    fn structure_sampling_keeps_short_runs() {
        let mut atoms = atoms_on_chain("A", 600, 0);
        for atom in atoms.iter_mut().take(12) {
            atom.secondary_structure = SecondaryStructure::Helix;
        }
        let sampled = sample_chain_by_structure(&atoms, 100);
        assert!(sampled.len() <= 100);
        let helix = sampled
            .iter()
            .filter(|a| a.secondary_structure == SecondaryStructure::Helix)
            .count();
        assert!(helix > 0, "short helix run vanished");
    }
}
