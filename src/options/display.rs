use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which scene-builder branch executes.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    /// Full-radius sphere per atom.
    Spheres,
    /// Reduced-radius spheres plus thin bond cylinders.
    Sticks,
    /// Reduced-radius spheres, schematic look.
    Cartoon,
    /// Enlarged semi-transparent spheres approximating a surface.
    Surface,
    /// Per-chain spline-extruded ribbons plus ligand/pocket spheres.
    #[default]
    Ribbon,
}

/// How per-atom color is resolved.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Element-indexed CPK palette.
    #[default]
    Element,
    /// Chain id hashed into a hue.
    Chain,
    /// Caller-supplied constant color.
    Uniform,
    /// Helix/sheet/coil palette.
    SecondaryStructure,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Display style, coloring, and global scale parameters.
pub struct DisplayOptions {
    /// Render style.
    #[schemars(title = "Style")]
    pub style: DisplayStyle,
    /// Per-atom color resolution mode.
    #[schemars(title = "Color Mode")]
    pub color_mode: ColorMode,
    /// Constant color used when `color_mode` is `uniform`.
    #[schemars(title = "Uniform Color")]
    pub uniform_color: [f32; 3],
    /// Global opacity multiplier in `[0, 1]`.
    #[schemars(title = "Transparency")]
    pub transparency: f32,
    /// Global atom radius scale.
    #[schemars(title = "Atom Size")]
    pub atom_size: f32,
    /// Camera zoom divisor (larger zooms in).
    #[schemars(title = "Zoom Level")]
    pub zoom_level: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            style: DisplayStyle::default(),
            color_mode: ColorMode::default(),
            uniform_color: [0.55, 0.7, 0.9],
            transparency: 1.0,
            atom_size: 1.0,
            zoom_level: 1.0,
        }
    }
}
