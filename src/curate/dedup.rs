use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use super::potency::parse_potency;
use crate::model::record::StandardizedRecord;

/// Fate of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    /// First valid row for its structure; kept.
    Unique,
    /// The structure did not standardize.
    InvalidStructure,
    /// The structure is fine but the potency does not parse.
    InvalidPotency,
    /// A valid row whose structure was already seen at `first_row`.
    Duplicate { first_row: usize },
}

impl RowClass {
    #[inline]
    pub fn is_kept(&self) -> bool {
        matches!(self, RowClass::Unique)
    }
}

/// Row counts by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    pub total: usize,
    pub kept: usize,
    pub invalid_structure: usize,
    pub invalid_potency: usize,
    pub duplicates: usize,
}

impl RemovalSummary {
    pub fn from_classes(classes: &[RowClass]) -> Self {
        let mut summary = Self::default();
        for class in classes {
            summary.count(*class);
        }
        summary
    }

    /// All rows that did not make it to the output.
    pub fn removed(&self) -> usize {
        self.invalid_structure + self.invalid_potency + self.duplicates
    }

    fn count(&mut self, class: RowClass) {
        self.total += 1;
        match class {
            RowClass::Unique => self.kept += 1,
            RowClass::InvalidStructure => self.invalid_structure += 1,
            RowClass::InvalidPotency => self.invalid_potency += 1,
            RowClass::Duplicate { .. } => self.duplicates += 1,
        }
    }
}

/// Classifies every record in one pass.
///
/// An absent structure takes precedence over a bad potency. Only rows that
/// are valid in both respects claim a structure, so an invalid row never
/// shadows a later valid one.
pub fn classify_rows(records: &[StandardizedRecord]) -> Vec<RowClass> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    records
        .iter()
        .map(|entry| {
            let Some(structure) = entry.structure.as_str() else {
                return RowClass::InvalidStructure;
            };
            if parse_potency(&entry.record.potency).is_none() {
                return RowClass::InvalidPotency;
            }
            match first_seen.entry(structure) {
                Entry::Occupied(first) => RowClass::Duplicate {
                    first_row: *first.get(),
                },
                Entry::Vacant(slot) => {
                    slot.insert(entry.record.row);
                    RowClass::Unique
                }
            }
        })
        .collect()
}

/// Keeps the first valid record per structure, preserving input order.
pub fn deduplicate(records: Vec<StandardizedRecord>) -> (Vec<StandardizedRecord>, RemovalSummary) {
    let classes = classify_rows(&records);
    let summary = RemovalSummary::from_classes(&classes);

    let kept = records
        .into_iter()
        .zip(classes)
        .filter_map(|(entry, class)| {
            if !class.is_kept() {
                debug!(row = entry.record.row, ?class, "dropping row");
            }
            class.is_kept().then_some(entry)
        })
        .collect();
    (kept, summary)
}
