use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Sampling", inline)]
#[serde(default)]
/// Per-structure atom-count optimization configuration.
///
/// Passed explicitly into every build rather than read from global state,
/// so rebuild decisions stay a pure function of their inputs.
pub struct SamplingOptions {
    /// Atom-count ceiling above which sampling kicks in.
    #[schemars(title = "Max Atoms")]
    pub max_atoms: usize,
    /// Whether adaptive sampling is enabled at all.
    #[schemars(title = "Optimization Enabled")]
    pub enabled: bool,
    /// Fraction of atoms retained when sampling applies.
    #[schemars(title = "Sampling Ratio")]
    pub ratio: f32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            max_atoms: 5000,
            enabled: true,
            ratio: 0.25,
        }
    }
}

impl SamplingOptions {
    /// Whether a structure of `atom_count` atoms should be down-sampled.
    #[must_use]
    pub fn should_sample(&self, atom_count: usize) -> bool {
        self.enabled && atom_count > self.max_atoms
    }

    /// Target atom count after sampling.
    #[must_use]
    pub fn target_count(&self, atom_count: usize) -> usize {
        ((atom_count as f32 * self.ratio) as usize).max(1)
    }
}
