use std::fmt;

use tracing::warn;

use super::config::{CurateConfig, UnknownUnitPolicy};
use super::error::Error;
use crate::model::record::{CuratedRecord, PotencyUnit, PotencyValue, StandardizedRecord};

/// Unit named by a potency header, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLabel {
    Micromolar,
    Nanomolar,
    Unknown,
}

impl UnitLabel {
    pub fn unit(&self) -> Option<PotencyUnit> {
        match self {
            UnitLabel::Micromolar => Some(PotencyUnit::Micromolar),
            UnitLabel::Nanomolar => Some(PotencyUnit::Nanomolar),
            UnitLabel::Unknown => None,
        }
    }
}

/// Where the dataset's unit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSource {
    /// Set explicitly in the configuration.
    Override,
    /// Read from the potency header.
    Header,
    /// The header named no unit and a fallback was assumed.
    Assumed,
}

impl fmt::Display for UnitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSource::Override => write!(f, "configured"),
            UnitSource::Header => write!(f, "from header"),
            UnitSource::Assumed => write!(f, "assumed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedUnit {
    pub unit: PotencyUnit,
    pub source: UnitSource,
}

/// Parses a raw potency cell.
///
/// Every `>` and `<` is removed and surrounding whitespace trimmed before
/// the text is read as a decimal number. The qualifier is not kept. Empty,
/// non-numeric, non-finite, zero and negative values yield `None`.
pub fn parse_potency(raw: &str) -> Option<PotencyValue> {
    let cleaned = raw.replace(['>', '<'], "");
    cleaned.trim().parse::<f64>().ok().and_then(PotencyValue::new)
}

/// Classifies a potency header. Micromolar markers are checked before
/// nanomolar ones, so a header mentioning both reads as micromolar.
pub fn classify_unit_header(header: &str) -> UnitLabel {
    let header = header.to_lowercase();
    if header.contains("um") || header.contains("micromolar") {
        UnitLabel::Micromolar
    } else if header.contains("nm") || header.contains("nanomolar") {
        UnitLabel::Nanomolar
    } else {
        UnitLabel::Unknown
    }
}

/// Determines the unit for a whole dataset from its potency header.
///
/// # Errors
///
/// Returns [`Error::UnitUndetermined`] when the header names no unit, no
/// override is configured, and the policy is [`UnknownUnitPolicy::Fail`].
pub fn resolve_unit(header: &str, config: &CurateConfig) -> Result<ResolvedUnit, Error> {
    if let Some(unit) = config.unit_override {
        return Ok(ResolvedUnit {
            unit,
            source: UnitSource::Override,
        });
    }
    if let Some(unit) = classify_unit_header(header).unit() {
        return Ok(ResolvedUnit {
            unit,
            source: UnitSource::Header,
        });
    }
    match config.unknown_unit {
        UnknownUnitPolicy::Assume(unit) => {
            warn!(header, %unit, "potency unit not found in column header, assuming {unit}");
            Ok(ResolvedUnit {
                unit,
                source: UnitSource::Assumed,
            })
        }
        UnknownUnitPolicy::Fail => Err(Error::unit_undetermined(header)),
    }
}

/// pIC50, the negative decimal logarithm of the molar concentration.
pub fn pic50(value: PotencyValue, unit: PotencyUnit) -> f64 {
    -unit.to_molar(value.get()).log10()
}

/// Converts surviving records to output rows.
///
/// Records whose structure is absent or whose potency does not parse are
/// skipped; after deduplication there are none.
pub fn normalize(records: Vec<StandardizedRecord>, unit: PotencyUnit) -> Vec<CuratedRecord> {
    records
        .into_iter()
        .filter_map(|StandardizedRecord { record, structure }| {
            let value = parse_potency(&record.potency)?;
            Some(CuratedRecord {
                row: record.row,
                identifier: record.identifier,
                structure: structure.into_inner()?,
                pic50: pic50(value, unit),
            })
        })
        .collect()
}
