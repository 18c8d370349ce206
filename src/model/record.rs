use std::fmt;

use serde::Deserialize;

/// One input row, as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Zero-based position in the input table.
    pub row: usize,
    pub structure: String,
    pub identifier: String,
    pub potency: String,
}

impl Record {
    pub fn new(
        row: usize,
        structure: impl Into<String>,
        identifier: impl Into<String>,
        potency: impl Into<String>,
    ) -> Self {
        Self {
            row,
            structure: structure.into(),
            identifier: identifier.into(),
            potency: potency.into(),
        }
    }
}

/// Canonical SMILES of a record's structure, or absent when it failed to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StandardizedStructure(Option<String>);

impl StandardizedStructure {
    pub fn canonical(smiles: impl Into<String>) -> Self {
        Self(Some(smiles.into()))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl From<Option<String>> for StandardizedStructure {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

/// A record together with its standardized structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardizedRecord {
    pub record: Record,
    pub structure: StandardizedStructure,
}

/// A finite, strictly positive concentration in the dataset's unit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PotencyValue(f64);

impl PotencyValue {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotencyUnit {
    #[serde(alias = "um", alias = "uM", alias = "µm")]
    Micromolar,
    #[serde(alias = "nm", alias = "nM")]
    Nanomolar,
}

impl PotencyUnit {
    /// How many of this unit make up one mol/L.
    pub fn per_molar(&self) -> f64 {
        match self {
            PotencyUnit::Micromolar => 1e6,
            PotencyUnit::Nanomolar => 1e9,
        }
    }

    /// Converts a concentration in this unit to mol/L.
    pub fn to_molar(&self, value: f64) -> f64 {
        value / self.per_molar()
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            PotencyUnit::Micromolar => "uM",
            PotencyUnit::Nanomolar => "nM",
        }
    }
}

impl fmt::Display for PotencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PotencyUnit::Micromolar => write!(f, "micromolar"),
            PotencyUnit::Nanomolar => write!(f, "nanomolar"),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct CuratedRecord {
    /// Zero-based position of the source row in the input table.
    pub row: usize,
    pub identifier: String,
    pub structure: String,
    pub pic50: f64,
}
