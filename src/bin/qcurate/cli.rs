use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use qsar_curate::PotencyUnit;

#[derive(Parser)]
#[command(
    name = "qcurate",
    about = "Curate SMILES/IC50 bioactivity tables into deduplicated pIC50 datasets",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Standardize, deduplicate and convert a bioactivity table to pIC50
    #[command(visible_alias = "c")]
    Curate(CurateArgs),

    /// Print canonical SMILES for structures given as arguments or lines
    #[command(visible_alias = "s")]
    Canon(CanonArgs),
}

impl Command {
    pub fn diagnostics(&self) -> &DiagnosticOptions {
        match self {
            Command::Curate(args) => &args.diagnostics,
            Command::Canon(args) => &args.diagnostics,
        }
    }
}

/// Diagnostic output options shared by all commands.
#[derive(Args)]
pub struct DiagnosticOptions {
    /// Suppress progress output and summaries (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Log pipeline details to stderr (-v stage summaries, -vv every dropped row)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args)]
pub struct CurateArgs {
    /// Input table (.csv, or .tsv/.tab for tab-separated)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (default: INPUT with the suffix inserted before the extension)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suffix for the derived output file name
    #[arg(long, value_name = "SUFFIX", conflicts_with = "output")]
    pub suffix: Option<String>,

    /// Curation settings (TOML file); command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub columns: ColumnOptions,

    #[command(flatten)]
    pub units: UnitOptions,

    #[command(flatten)]
    pub structure: StructureOptions,

    #[command(flatten)]
    pub diagnostics: DiagnosticOptions,
}

/// Column discovery options.
#[derive(Args)]
#[command(next_help_heading = "Column Matching")]
pub struct ColumnOptions {
    /// Header keyword identifying the SMILES column [default: smiles]
    #[arg(long, value_name = "KEYWORD")]
    pub structure_keyword: Option<String>,

    /// Header keyword identifying the compound identifier column [default: id]
    #[arg(long = "id-keyword", value_name = "KEYWORD")]
    pub identifier_keyword: Option<String>,

    /// Header keyword identifying the potency column [default: ic50]
    #[arg(long, value_name = "KEYWORD")]
    pub potency_keyword: Option<String>,
}

/// Potency unit options.
#[derive(Args)]
#[command(next_help_heading = "Potency Units")]
pub struct UnitOptions {
    /// Potency unit, overriding detection from the column header
    #[arg(long, value_name = "UNIT")]
    pub unit: Option<UnitArg>,

    /// Fail instead of assuming nanomolar when the header names no unit
    #[arg(long, conflicts_with = "unit")]
    pub strict_units: bool,
}

/// Structure standardization options.
#[derive(Args)]
#[command(next_help_heading = "Structure Standardization")]
pub struct StructureOptions {
    /// Keep every disconnected fragment instead of only the largest
    #[arg(long)]
    pub keep_fragments: bool,
}

#[derive(Args)]
pub struct CanonArgs {
    /// SMILES strings to canonicalize
    #[arg(value_name = "SMILES", conflicts_with = "input")]
    pub smiles: Vec<String>,

    /// Read one SMILES per line from FILE (stdin if neither FILE nor SMILES given)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write results to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub structure: StructureOptions,

    #[command(flatten)]
    pub diagnostics: DiagnosticOptions,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UnitArg {
    /// Micromolar
    #[value(name = "um", alias = "micromolar")]
    Micromolar,
    /// Nanomolar
    #[value(name = "nm", alias = "nanomolar")]
    Nanomolar,
}

impl From<UnitArg> for PotencyUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Micromolar => PotencyUnit::Micromolar,
            UnitArg::Nanomolar => PotencyUnit::Nanomolar,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
