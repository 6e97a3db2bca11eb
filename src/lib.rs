// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Pedantic allowances shared with Cargo.toml [lints]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::use_self)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::doc_markdown)]

//! Molecular-structure-to-renderable-geometry engine.
//!
//! Given a parsed atomic model ([`model::Structure`]) and a display-parameter
//! snapshot ([`scene::DisplaySnapshot`]), molscene produces a hierarchy of
//! drawable primitives (spheres, capped cylinders, ribbon meshes) for a
//! downstream scene-graph renderer, while keeping frame cost bounded through
//! level-of-detail meshes, geometry reuse, and adaptive atom sampling.
//!
//! # Key entry points
//!
//! - [`scene::SceneBuilder`] - turns a structure plus display parameters
//!   into a [`scene::BuiltScene`] node tree
//! - [`scene::UpdateController`] - diffs display snapshots and decides
//!   between no-op, selective highlight repaint, and full rebuild
//! - [`scene::SceneProcessor`] - background worker that runs builds off the
//!   presentation thread, coalescing requests and discarding stale results
//! - [`options::Options`] - runtime configuration (display, geometry,
//!   sampling) with TOML preset support
//!
//! # Architecture
//!
//! Scene construction is CPU-bound and runs on the background
//! [`scene::SceneProcessor`] thread; results are delivered through a
//! lock-free triple buffer tagged with an epoch token so a rebuild for a
//! superseded structure is discarded instead of applied. Sphere, cylinder,
//! and material meshes are shared through the [`geometry::GeometryCache`];
//! per-chain ribbon base meshes live in the bounded [`geometry::RibbonCache`]
//! keyed independently of highlight state, so toggling a selection never
//! invalidates built geometry.

pub mod bounds;
pub mod error;
pub mod geometry;
pub mod model;
pub mod options;
pub mod sampling;
pub mod scene;
pub mod selection;

pub use error::SceneError;
