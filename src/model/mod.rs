//! Immutable structure model: the input contract of the engine.
//!
//! A [`Structure`] is created once per load by an external parser and is
//! read-only thereafter. Display parameters mutate frequently; the model
//! never does.

mod elements;
mod structure;

pub use elements::{element_color, element_covalent_radius};
pub use structure::{Atom, Bond, SecondaryStructure, Structure};
