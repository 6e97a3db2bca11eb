//! Incremental update decisions: diff two display snapshots and pick the
//! cheapest correct path.
//!
//! Two states: Stable and Rebuilding. Chain-highlight-only changes under
//! the ribbon style take the selective path (material recoloring on
//! already-built geometry); everything else falls back to a full rebuild.
//! A new rebuild request arriving while one is in flight is coalesced
//! (last request wins); results for a superseded epoch are discarded.

use std::collections::BTreeSet;

use log::debug;

use super::DisplaySnapshot;
use crate::options::DisplayStyle;

/// Numeric parameter deltas below this are treated as unchanged.
pub const NUMERIC_EPSILON: f32 = 1e-4;

/// What changed between two display snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    /// The loaded structure itself changed.
    pub structure: bool,
    /// Render style changed.
    pub style: bool,
    /// Color mode changed.
    pub color_mode: bool,
    /// Chains whose highlight membership changed (symmetric difference).
    pub chains: Vec<String>,
    /// Ligand highlight set changed.
    pub ligands: bool,
    /// Pocket highlight set changed.
    pub pockets: bool,
    /// Focus target changed.
    pub focus: bool,
    /// Any numeric parameter moved by more than [`NUMERIC_EPSILON`].
    pub numeric: bool,
}

impl DirtyFlags {
    /// Compute the flag set between two snapshots.
    #[must_use]
    pub fn diff(prev: &DisplaySnapshot, next: &DisplaySnapshot) -> Self {
        let chains = symmetric_difference(
            &prev.selection.chains,
            &next.selection.chains,
        );
        Self {
            structure: prev.structure_revision != next.structure_revision,
            style: prev.display.style != next.display.style,
            color_mode: prev.display.color_mode != next.display.color_mode,
            chains,
            ligands: prev.selection.ligands != next.selection.ligands,
            pockets: prev.selection.pockets != next.selection.pockets,
            focus: prev.selection.focus != next.selection.focus,
            numeric: numeric_changed(prev, next),
        }
    }

    /// Nothing changed at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.structure
            && !self.style
            && !self.color_mode
            && self.chains.is_empty()
            && !self.ligands
            && !self.pockets
            && !self.focus
            && !self.numeric
    }

    /// Only chain-highlight membership changed.
    #[must_use]
    pub fn only_chain_highlights(&self) -> bool {
        !self.chains.is_empty()
            && !self.structure
            && !self.style
            && !self.color_mode
            && !self.ligands
            && !self.pockets
            && !self.focus
            && !self.numeric
    }
}

/// The cheapest correct response to a snapshot change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    /// Nothing is dirty; keep the current scene.
    NoOp,
    /// Recolor the named chains' ribbon materials; geometry untouched.
    SelectiveHighlight(Vec<String>),
    /// Run the scene builder from scratch.
    FullRebuild,
}

/// Stable/Rebuilding state machine with epoch-token stale-result discard.
///
/// Single concurrent builder per structure is assumed; exclusion comes from
/// this state machine rather than from locks.
#[derive(Debug, Default)]
pub struct UpdateController {
    previous: Option<DisplaySnapshot>,
    epoch: u64,
    rebuilding: bool,
}

impl UpdateController {
    /// Controller with no prior snapshot (first decision is a rebuild).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide how to respond to a new snapshot, remembering it as the
    /// baseline for the next decision.
    pub fn decide(&mut self, next: &DisplaySnapshot) -> UpdateDecision {
        let decision = match &self.previous {
            None => UpdateDecision::FullRebuild,
            Some(prev) => {
                let flags = DirtyFlags::diff(prev, next);
                if flags.is_clean() {
                    UpdateDecision::NoOp
                } else if flags.only_chain_highlights()
                    && prev.display.style == DisplayStyle::Ribbon
                    && next.display.style == DisplayStyle::Ribbon
                {
                    UpdateDecision::SelectiveHighlight(flags.chains)
                } else {
                    UpdateDecision::FullRebuild
                }
            }
        };
        self.previous = Some(next.clone());
        decision
    }

    /// Enter the Rebuilding state and get the epoch token for this rebuild.
    ///
    /// Starting a new rebuild while one is in flight supersedes it: the
    /// older epoch's result will be discarded at completion time.
    pub fn begin_rebuild(&mut self) -> u64 {
        self.epoch += 1;
        self.rebuilding = true;
        self.epoch
    }

    /// Complete a rebuild. Returns `true` when the result is current and
    /// should be applied; `false` means a newer rebuild superseded it and
    /// the result must be dropped.
    pub fn finish_rebuild(&mut self, epoch: u64) -> bool {
        if epoch == self.epoch {
            self.rebuilding = false;
            true
        } else {
            debug!("discarding stale rebuild (epoch {epoch} < {})", self.epoch);
            false
        }
    }

    /// Whether a rebuild is currently in flight.
    #[must_use]
    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding
    }
}

fn symmetric_difference(
    a: &BTreeSet<String>,
    b: &BTreeSet<String>,
) -> Vec<String> {
    a.symmetric_difference(b).cloned().collect()
}

fn numeric_changed(prev: &DisplaySnapshot, next: &DisplaySnapshot) -> bool {
    let d = |a: f32, b: f32| (a - b).abs() > NUMERIC_EPSILON;
    let (pd, nd) = (&prev.display, &next.display);
    let (pg, ng) = (&prev.geometry, &next.geometry);
    d(pd.transparency, nd.transparency)
        || d(pd.atom_size, nd.atom_size)
        || d(pd.zoom_level, nd.zoom_level)
        || pd.uniform_color
            .iter()
            .zip(nd.uniform_color.iter())
            .any(|(&a, &b)| d(a, b))
        || d(pg.ribbon_width, ng.ribbon_width)
        || d(pg.ribbon_flatness, ng.ribbon_flatness)
        || d(pg.bond_radius, ng.bond_radius)
        || d(pg.stick_sphere_scale, ng.stick_sphere_scale)
        || d(pg.cartoon_sphere_scale, ng.cartoon_sphere_scale)
        || d(pg.surface_sphere_scale, ng.surface_sphere_scale)
        || d(pg.surface_opacity, ng.surface_opacity)
        || prev.sampling != next.sampling
        || prev.framing != next.framing
}
