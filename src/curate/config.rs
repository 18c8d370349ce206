use serde::Deserialize;

use super::error::Error;
use crate::io::DEFAULT_OUTPUT_SUFFIX;
use crate::model::record::PotencyUnit;
use crate::smiles::StandardizeOptions;

/// Settings for one curation run.
///
/// Every field has a default, so an empty TOML document (or
/// [`CurateConfig::default`]) reproduces the standard behavior: columns
/// found by `smiles`/`id`/`ic50`, unit read from the potency header with a
/// nanomolar fallback, only the largest fragment kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurateConfig {
    /// Keywords used to locate the three input columns.
    #[serde(default)]
    pub columns: ColumnKeywords,

    /// Fixed potency unit. When set, the potency header is not inspected.
    #[serde(default, rename = "unit")]
    pub unit_override: Option<PotencyUnit>,

    /// What to do when the potency header names no unit.
    #[serde(default)]
    pub unknown_unit: UnknownUnitPolicy,

    /// Keep every fragment of a multi-component structure instead of only
    /// the largest one.
    #[serde(default)]
    pub keep_all_fragments: bool,

    /// Marker inserted before the extension of the derived output path.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

fn default_output_suffix() -> String {
    DEFAULT_OUTPUT_SUFFIX.to_string()
}

impl Default for CurateConfig {
    fn default() -> Self {
        Self {
            columns: ColumnKeywords::default(),
            unit_override: None,
            unknown_unit: UnknownUnitPolicy::default(),
            keep_all_fragments: false,
            output_suffix: default_output_suffix(),
        }
    }
}

impl CurateConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML, unknown keys, or
    /// values of the wrong shape.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn standardize_options(&self) -> StandardizeOptions {
        StandardizeOptions {
            keep_all_fragments: self.keep_all_fragments,
        }
    }
}

/// Case-insensitive substrings that identify each column role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnKeywords {
    #[serde(default = "default_structure_keyword")]
    pub structure: String,
    #[serde(default = "default_identifier_keyword")]
    pub identifier: String,
    #[serde(default = "default_potency_keyword")]
    pub potency: String,
}

fn default_structure_keyword() -> String {
    "smiles".to_string()
}
fn default_identifier_keyword() -> String {
    "id".to_string()
}
fn default_potency_keyword() -> String {
    "ic50".to_string()
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            structure: default_structure_keyword(),
            identifier: default_identifier_keyword(),
            potency: default_potency_keyword(),
        }
    }
}

/// Handling of a potency header that mentions neither unit.
///
/// In TOML this is written `unknown_unit = "fail"` or
/// `unknown_unit = { assume = "micromolar" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownUnitPolicy {
    /// Log a warning and treat values as being in the given unit.
    Assume(PotencyUnit),
    /// Abort the run with [`Error::UnitUndetermined`].
    Fail,
}

impl Default for UnknownUnitPolicy {
    fn default() -> Self {
        UnknownUnitPolicy::Assume(PotencyUnit::Nanomolar)
    }
}
