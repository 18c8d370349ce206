//! Core data structures for molecules and curated bioactivity records.
//!
//! - [`types`] – Periodic table elements and bond orders.
//! - [`atom`] – Atoms with charge, hydrogen count, aromaticity and tetrahedral stereo.
//! - [`molecule`] – Molecular graphs, double-bond geometry and fragment handling.
//! - [`record`] – Dataset rows as they flow through the curation pipeline.
//!
//! The graph types are what [`crate::smiles`] parses into and writes from; the
//! record types are what the [`crate::curate`] stages consume and produce.

pub mod atom;
pub mod molecule;
pub mod record;
pub mod types;
