use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::warn;

use qsar_curate::smiles::{StandardizeOptions, standardize};

use crate::cli::CanonArgs;
use crate::display::Context as DisplayContext;
use crate::io::{create_output, read_lines, stdin_is_tty};
use crate::util::text::count_noun;

pub fn run_canon(args: CanonArgs, ctx: DisplayContext) -> Result<()> {
    let options = StandardizeOptions {
        keep_all_fragments: args.structure.keep_fragments,
    };

    let lines = if args.smiles.is_empty() {
        if args.input.is_none() && stdin_is_tty() {
            bail!(
                "No SMILES given and stdin is a terminal.\n\nUsage: qcurate canon <SMILES>... or qcurate canon -i <FILE>"
            );
        }
        read_lines(args.input.as_deref())?
    } else {
        args.smiles
    };

    let mut out = create_output(args.output.as_deref())?;
    let mut failures = 0usize;
    for (idx, line) in lines.iter().enumerate() {
        let Some((smiles, title)) = split_smiles_line(line) else {
            writeln!(out)?;
            continue;
        };
        match standardize(smiles, &options) {
            Ok(canonical) => writeln!(out, "{canonical}{title}")?,
            Err(err) => {
                failures += 1;
                warn!(line = idx + 1, input = smiles, "invalid SMILES: {err}");
                writeln!(out)?;
            }
        }
    }
    out.flush().context("Failed to write canonical SMILES")?;

    if ctx.status && failures > 0 {
        eprintln!(
            "{} of {} could not be parsed",
            count_noun(failures, "structure", "structures"),
            lines.len()
        );
    }
    Ok(())
}

/// Splits a `.smi`-style line into the SMILES token and the rest of the line
/// (leading separator included). Blank lines yield `None`.
fn split_smiles_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.find(char::is_whitespace) {
        Some(pos) => Some((&trimmed[..pos], &trimmed[pos..])),
        None => Some((trimmed, "")),
    }
}
