use std::collections::HashMap;

use tracing::debug;

use crate::model::record::{Record, StandardizedRecord, StandardizedStructure};
use crate::smiles::{self, StandardizeOptions};

/// Canonicalizes one structure string. Failures become an absent structure.
pub fn standardize_structure(raw: &str, options: &StandardizeOptions) -> StandardizedStructure {
    match smiles::standardize(raw, options) {
        Ok(canonical) => StandardizedStructure::canonical(canonical),
        Err(err) => {
            debug!(structure = raw, error = %err, "structure did not standardize");
            StandardizedStructure::absent()
        }
    }
}

/// Attaches a standardized structure to every record, in order.
///
/// Identical input strings are canonicalized once.
pub fn standardize_records(
    records: Vec<Record>,
    options: &StandardizeOptions,
) -> Vec<StandardizedRecord> {
    let mut cache: HashMap<String, StandardizedStructure> = HashMap::new();
    records
        .into_iter()
        .map(|record| {
            let structure = cache
                .entry(record.structure.clone())
                .or_insert_with_key(|raw| standardize_structure(raw, options))
                .clone();
            StandardizedRecord { record, structure }
        })
        .collect()
}
