//! Reading bioactivity tables and writing curated results.
//!
//! Tables are comma- or tab-separated files with a header row. The delimiter
//! is chosen from the file extension ([`Format::from_path`]). Output is
//! written in one piece after curation has succeeded, so a failed run never
//! leaves a partial file behind.

use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub mod table;

pub use error::Error;
pub use table::Table;
pub use table::writer::{PIC50_HEADER, STRUCTURE_HEADER, format_pic50};

use crate::model::record::CuratedRecord;

/// Default marker inserted between an input file's stem and its extension.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_UNIVERSAL_CLEAN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Csv,
    Tsv,
}

impl Format {
    /// `.tsv` and `.tab` files are tab-separated; everything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("tsv" | "tab") => Format::Tsv,
            _ => Format::Csv,
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            Format::Csv => b',',
            Format::Tsv => b'\t',
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => write!(f, "CSV"),
            Format::Tsv => write!(f, "TSV"),
        }
    }
}

/// Loads the table at `path`, failing with [`Error::InputNotFound`] before
/// anything is read when the path does not name a file.
pub fn read_table(path: &Path) -> Result<Table, Error> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    table::reader::read(BufReader::new(file), Format::from_path(path))
}

/// Serializes the curated rows and writes them to `path` in a single call.
pub fn write_curated(
    path: &Path,
    format: Format,
    id_header: &str,
    records: &[CuratedRecord],
) -> Result<(), Error> {
    let mut buffer = Vec::new();
    table::writer::write(&mut buffer, format, id_header, records)?;
    fs::write(path, buffer)?;
    Ok(())
}

/// Output path for `input`: `suffix` is inserted before the extension, and a
/// path without an extension gets `.csv`.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_inserts_suffix_before_extension() {
        assert_eq!(
            output_path(Path::new("data/assay.csv"), DEFAULT_OUTPUT_SUFFIX),
            PathBuf::from("data/assay_UNIVERSAL_CLEAN.csv")
        );
        assert_eq!(
            output_path(Path::new("assay.v2.tsv"), "_clean"),
            PathBuf::from("assay.v2_clean.tsv")
        );
        assert_eq!(
            output_path(Path::new("assay"), DEFAULT_OUTPUT_SUFFIX),
            PathBuf::from("assay_UNIVERSAL_CLEAN.csv")
        );
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("a.CSV")), Format::Csv);
        assert_eq!(Format::from_path(Path::new("a.tsv")), Format::Tsv);
        assert_eq!(Format::from_path(Path::new("a.TAB")), Format::Tsv);
        assert_eq!(Format::from_path(Path::new("a")), Format::Csv);
        assert_eq!(Format::Tsv.to_string(), "TSV");
    }

    #[test]
    fn missing_input_is_reported() {
        let err = read_table(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn reads_and_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "ID,SMILES,IC50\nA,CCO,10\n").unwrap();
        let table = read_table(&input).unwrap();
        assert_eq!(table.rows.len(), 1);

        let output = output_path(&input, DEFAULT_OUTPUT_SUFFIX);
        let records = vec![CuratedRecord {
            row: 0,
            identifier: "A".into(),
            structure: "CCO".into(),
            pic50: 8.0,
        }];
        write_curated(&output, Format::Csv, "ID", &records).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "ID,SMILES_Standard,pIC50\nA,CCO,8.0\n"
        );
    }
}
