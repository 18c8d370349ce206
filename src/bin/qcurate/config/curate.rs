use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use qsar_curate::{CurateConfig, UnknownUnitPolicy};

use crate::cli::CurateArgs;

/// Reads a TOML configuration file.
pub fn load_config_file(path: &Path) -> Result<CurateConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    CurateConfig::from_toml_str(&text)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Starts from `--config` (or the defaults) and applies every flag that was
/// given on the command line.
pub fn build_curate_config(args: &CurateArgs) -> Result<CurateConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => CurateConfig::default(),
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut CurateConfig, args: &CurateArgs) {
    let columns = &args.columns;
    if let Some(keyword) = &columns.structure_keyword {
        config.columns.structure = keyword.clone();
    }
    if let Some(keyword) = &columns.identifier_keyword {
        config.columns.identifier = keyword.clone();
    }
    if let Some(keyword) = &columns.potency_keyword {
        config.columns.potency = keyword.clone();
    }

    if let Some(unit) = args.units.unit {
        config.unit_override = Some(unit.into());
    }
    if args.units.strict_units {
        config.unknown_unit = UnknownUnitPolicy::Fail;
    }

    if args.structure.keep_fragments {
        config.keep_all_fragments = true;
    }
    if let Some(suffix) = &args.suffix {
        config.output_suffix = suffix.clone();
    }
}
