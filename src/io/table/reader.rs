use std::io::Read;

use super::Table;
use crate::io::{Format, error::Error};

/// Reads a headed table. Cells are decoded as UTF-8, replacing invalid
/// sequences rather than failing the whole file.
pub fn read<R: Read>(reader: R, format: Format) -> Result<Table, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(|e| Error::from_csv(format, e))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::EmptyInput(format));
    }

    let mut table = Table::new(headers);
    for result in csv_reader.byte_records() {
        let record = result.map_err(|e| Error::from_csv(format, e))?;
        let row = record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();
        table.push_row(row);
    }
    Ok(table)
}
