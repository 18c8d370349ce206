//! Curation of SMILES/IC50 bioactivity tables for QSAR modelling.
//!
//! Raw assay exports mix salt forms, redundant writings of the same
//! compound, qualified values such as `>1000`, and units that are only
//! hinted at in a column header. This crate turns such a table into one row
//! per unique structure with a single pIC50 value.
//!
//! # Features
//!
//! - **Column discovery** — Structure, identifier and potency columns are
//!   found by case-insensitive keyword matching on the headers
//! - **Structure standardization** — A self-contained SMILES toolkit parses,
//!   kekulizes, strips salts, perceives aromaticity and writes canonical
//!   isomeric SMILES
//! - **Deduplication** — One pass classifies every row and keeps the first
//!   valid measurement per canonical structure
//! - **Potency normalization** — Qualifiers are stripped, the unit is read
//!   from the header, and values become pIC50
//!
//! # Quick Start
//!
//! The main entry point is the [`curate`](fn@curate) function, which takes a [`Table`]
//! and a [`CurateConfig`] and produces a [`Curation`]:
//!
//! ```
//! use qsar_curate::{CurateConfig, CurateError, Table, curate};
//!
//! let mut table = Table::new(vec![
//!     "Compound_ID".to_string(),
//!     "SMILES".to_string(),
//!     "IC50 (nM)".to_string(),
//! ]);
//! table.push_row(vec!["cmpd-1".into(), "OCC".into(), ">1000".into()]);
//! table.push_row(vec!["cmpd-2".into(), "CCO".into(), "20".into()]);
//! table.push_row(vec!["cmpd-3".into(), "not_a_molecule".into(), "5".into()]);
//!
//! let curation = curate(&table, &CurateConfig::default())?;
//!
//! // The two ethanol rows collapse to the first; the bad structure is dropped.
//! assert_eq!(curation.records.len(), 1);
//! assert_eq!(curation.records[0].identifier, "cmpd-1");
//! assert_eq!(curation.records[0].structure, "CCO");
//! assert!((curation.records[0].pic50 - 6.0).abs() < 1e-9);
//! assert_eq!(curation.summary.removed(), 2);
//! # Ok::<(), CurateError>(())
//! ```
//!
//! Structures can also be canonicalized on their own:
//!
//! ```
//! use qsar_curate::smiles::{StandardizeOptions, standardize};
//!
//! let options = StandardizeOptions::default();
//! assert_eq!(
//!     standardize("C1=CC=CC=C1", &options)?,
//!     standardize("c1ccccc1", &options)?
//! );
//! assert_eq!(
//!     standardize("CC(=O)[O-].[Na+]", &options)?,
//!     standardize("[O-]C(C)=O", &options)?
//! );
//! # Ok::<(), qsar_curate::smiles::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`curate`](mod@curate) — The four pipeline stages and their configuration
//! - [`smiles`] — SMILES parsing, normalization and canonical writing
//! - [`io`] — Delimited table reading and curated table writing
//! - [`model`] — Elements, atoms, molecule graphs and dataset records

pub mod curate;
pub mod io;
pub mod model;
pub mod smiles;

pub use model::atom::{Atom, Chirality};
pub use model::molecule::{Bond, Molecule};
pub use model::record::{
    CuratedRecord, PotencyUnit, PotencyValue, Record, StandardizedRecord, StandardizedStructure,
};
pub use model::types::{BondOrder, Element, ParseElementError};

pub use curate::{
    ColumnKeywords, ColumnMap, ColumnRole, CurateConfig, Curation, RemovalSummary, RowClass,
    UnknownUnitPolicy, curate, curate_file,
};
pub use io::Table;

pub use curate::Error as CurateError;
