use std::io::Write;

use crate::io::{Format, error::Error};
use crate::model::record::CuratedRecord;

pub const STRUCTURE_HEADER: &str = "SMILES_Standard";
pub const PIC50_HEADER: &str = "pIC50";

/// Writes the curated projection: identifier, standardized structure, pIC50.
pub fn write<W: Write>(
    writer: W,
    format: Format,
    id_header: &str,
    records: &[CuratedRecord],
) -> Result<(), Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);

    csv_writer
        .write_record([id_header, STRUCTURE_HEADER, PIC50_HEADER])
        .map_err(|e| Error::from_csv(format, e))?;
    for record in records {
        csv_writer
            .write_record([
                record.identifier.as_str(),
                record.structure.as_str(),
                format_pic50(record.pic50).as_str(),
            ])
            .map_err(|e| Error::from_csv(format, e))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Shortest round-trip decimal; integral values keep one decimal place.
pub fn format_pic50(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
