//! Pure geometry construction and the caches that keep it reusable.
//!
//! Everything here is CPU-side: spline interpolation, ribbon cross-section
//! extrusion, and triangulated primitive meshes. No renderer types leak in.

mod cache;
mod primitives;
mod ribbon;
mod spline;

pub use cache::{
    GeometryCache, RibbonCache, RibbonKey, RIBBON_CACHE_CAPACITY,
};
pub use primitives::{
    sphere_lod, unit_cylinder, unit_cylinder_lod, uv_sphere, LodMesh,
    MeshData,
};
pub use ribbon::{
    build_ribbon, RibbonStrip, FLATNESS_THRESHOLD, MIN_RIBBON_POINTS,
};
pub use spline::{
    catmull_rom, catmull_rom_point, compute_frames, SplinePoint,
};
