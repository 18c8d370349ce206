use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// Reads every line of `path`, or of stdin when no path is given.
pub fn read_lines(path: Option<&Path>) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open input file: {}", p.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    reader
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read lines from {source}"))
}

/// Buffered writer to `path`, or to stdout when no path is given.
pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
