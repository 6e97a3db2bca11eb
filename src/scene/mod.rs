//! Scene assembly: node model, builder, incremental updates, and the
//! background processor.

mod builder;
mod color;
mod node;
mod processor;
mod update;

pub use builder::{BuiltScene, ProgressCallback, SceneBuilder};
pub use color::{
    atom_radius, chain_color, highlight_color, resolve_color,
    resolve_opacity, secondary_structure_color, HIGHLIGHT_RADIUS_BOOST,
    OPACITY_DEFAULT, OPACITY_DIMMED, OPACITY_FOCUSED, OPACITY_HIGHLIGHTED,
};
pub use node::{
    atom_id_from_node_name, atom_node_name, ribbon_node_name, Material,
    NodeMesh, SceneNode, Transform,
};
pub use processor::{PreparedScene, SceneProcessor, SceneRequest};
pub use update::{
    DirtyFlags, UpdateController, UpdateDecision, NUMERIC_EPSILON,
};

use crate::bounds::CameraFraming;
use crate::options::{
    DisplayOptions, GeometryOptions, Options, SamplingOptions,
};
use crate::selection::SelectionState;

/// Immutable display-parameter snapshot passed by value into every build.
///
/// The update controller diffs two snapshots instead of observing live
/// mutation, so rebuild decisions are a pure function of their inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplaySnapshot {
    /// Monotonic revision of the loaded structure; bumps force a rebuild.
    pub structure_revision: u64,
    /// Style, color mode, and global scale parameters.
    pub display: DisplayOptions,
    /// Ribbon and primitive geometry parameters.
    pub geometry: GeometryOptions,
    /// Atom-count optimization configuration.
    pub sampling: SamplingOptions,
    /// Highlight sets and focus target.
    pub selection: SelectionState,
    /// Camera framing context.
    pub framing: CameraFraming,
}

impl DisplaySnapshot {
    /// Snapshot from an options container plus the current selection.
    #[must_use]
    pub fn from_options(
        options: &Options,
        selection: SelectionState,
        structure_revision: u64,
    ) -> Self {
        Self {
            structure_revision,
            display: options.display.clone(),
            geometry: options.geometry.clone(),
            sampling: options.sampling.clone(),
            selection,
            framing: CameraFraming::default(),
        }
    }
}
