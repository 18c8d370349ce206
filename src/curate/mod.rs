//! The curation pipeline.
//!
//! A table passes through four stages, each a public function over
//! [`model`](crate::model) types:
//!
//! 1. [`resolve_columns`] picks the structure, identifier and potency columns;
//! 2. [`standardize_records`] canonicalizes every structure;
//! 3. [`deduplicate`] drops invalid rows and repeated structures;
//! 4. [`potency::normalize`] converts the surviving potencies to pIC50.
//!
//! [`curate`] chains them over an in-memory [`Table`], and [`curate_file`]
//! adds reading the input and writing the result.

mod config;
mod error;

pub mod columns;
pub mod dedup;
pub mod potency;
pub mod standardize;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::io::{self, Format, Table};
use crate::model::record::{CuratedRecord, Record};

pub use columns::{ColumnMap, ColumnRole, ResolvedColumn, UnmatchedRole, resolve_columns};
pub use config::{ColumnKeywords, CurateConfig, UnknownUnitPolicy};
pub use dedup::{RemovalSummary, RowClass, classify_rows, deduplicate};
pub use error::Error;
pub use potency::{
    ResolvedUnit, UnitLabel, UnitSource, classify_unit_header, parse_potency, pic50, resolve_unit,
};
pub use standardize::{standardize_records, standardize_structure};

/// Result of curating one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Curation {
    /// Columns the records were taken from.
    pub columns: ColumnMap,
    /// Unit the potencies were interpreted in.
    pub unit: ResolvedUnit,
    /// Output rows in input order.
    pub records: Vec<CuratedRecord>,
    pub summary: RemovalSummary,
}

impl Curation {
    /// Header under which identifiers are written back out.
    pub fn id_header(&self) -> &str {
        &self.columns.identifier.name
    }
}

/// Extracts one [`Record`] per table row using the resolved columns.
pub fn extract_records(table: &Table, columns: &ColumnMap) -> Vec<Record> {
    let cell = |row: &[String], column: &ResolvedColumn| {
        row.get(column.index).cloned().unwrap_or_default()
    };
    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| Record {
            row: idx,
            structure: cell(row, &columns.structure),
            identifier: cell(row, &columns.identifier),
            potency: cell(row, &columns.potency),
        })
        .collect()
}

/// Runs the four curation stages over `table`.
///
/// Column and unit resolution happen before any row is touched, so a run
/// that cannot succeed fails fast.
///
/// # Errors
///
/// Returns [`Error::MissingColumns`] if a role has no column, or
/// [`Error::UnitUndetermined`] if the unit is unknown under a failing policy.
pub fn curate(table: &Table, config: &CurateConfig) -> Result<Curation, Error> {
    let columns = resolve_columns(&table.headers, &config.columns)?;
    info!(
        structure = %columns.structure.name,
        identifier = %columns.identifier.name,
        potency = %columns.potency.name,
        "resolved columns"
    );

    let unit = resolve_unit(&columns.potency.name, config)?;
    info!(unit = %unit.unit, source = %unit.source, "potency unit");

    let records = extract_records(table, &columns);
    let standardized = standardize_records(records, &config.standardize_options());
    let (kept, summary) = deduplicate(standardized);
    info!(
        total = summary.total,
        kept = summary.kept,
        removed = summary.removed(),
        "removed duplicate and invalid entries"
    );

    let records = potency::normalize(kept, unit.unit);
    Ok(Curation {
        columns,
        unit,
        records,
        summary,
    })
}

/// Path a curation of `input` is written to: `output` when given, otherwise
/// next to the input with the configured suffix.
pub fn output_path_for(input: &Path, output: Option<&Path>, config: &CurateConfig) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| io::output_path(input, &config.output_suffix))
}

/// Writes the curated rows to `path`. The delimiter follows the extension.
pub fn write_curation(path: &Path, curation: &Curation) -> Result<(), Error> {
    io::write_curated(
        path,
        Format::from_path(path),
        curation.id_header(),
        &curation.records,
    )?;
    info!(path = %path.display(), rows = curation.records.len(), "wrote curated table");
    Ok(())
}

/// Reads `input`, curates it, and writes the result.
///
/// The output path is chosen by [`output_path_for`]. Nothing is written
/// unless curation succeeds.
pub fn curate_file(
    input: &Path,
    output: Option<&Path>,
    config: &CurateConfig,
) -> Result<(PathBuf, Curation), Error> {
    let table = io::read_table(input)?;
    info!(path = %input.display(), rows = table.row_count(), "loaded table");

    let curation = curate(&table, config)?;

    let output = output_path_for(input, output, config);
    write_curation(&output, &curation)?;
    Ok((output, curation))
}
