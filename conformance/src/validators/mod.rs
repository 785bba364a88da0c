//! Invariant validators, one module per pipeline stage.

pub mod algebra;
pub mod charges;
pub mod lattice;
pub mod mixing;
pub mod rules;
pub mod spectrum;
pub mod walk;
