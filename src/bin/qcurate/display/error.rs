use std::io::{self, Write};

use anyhow::Error;

use qsar_curate::CurateError;
use qsar_curate::curate::ColumnRole;
use qsar_curate::io::Error as IoError;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = HintCollector::collect(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

/// Turns typed library errors found anywhere in an error chain into
/// operator-facing suggestions.
struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Vec<String> {
        let mut collector = Self {
            hints: Vec::new(),
            has_typed_hints: false,
        };

        for cause in err.chain() {
            if let Some(curate_err) = cause.downcast_ref::<CurateError>() {
                collector.collect_curate_hints(curate_err);
                break;
            }
            if let Some(io_err) = cause.downcast_ref::<IoError>() {
                collector.collect_io_hints(io_err);
                break;
            }
            if let Some(std_err) = cause.downcast_ref::<std::io::Error>() {
                collector.collect_std_io_hints(std_err);
                break;
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }
        collector.hints
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_curate_hints(&mut self, err: &CurateError) {
        self.mark_typed();

        match err {
            CurateError::MissingColumns { missing, .. } => {
                for unmatched in missing {
                    let flag = match unmatched.role {
                        ColumnRole::Structure => "--structure-keyword",
                        ColumnRole::Identifier => "--id-keyword",
                        ColumnRole::Potency => "--potency-keyword",
                    };
                    self.add(format!(
                        "No header contains '{}'; pass {} with a word from the right column",
                        unmatched.keyword, flag
                    ));
                }
                self.add("Matching is a case-insensitive substring test on the header row");
                self.add("Check that the file has a header row and the right delimiter");
            }

            CurateError::UnitUndetermined { header } => {
                self.add(format!(
                    "The potency header '{}' mentions neither uM nor nM",
                    header
                ));
                self.add("Pass --unit um or --unit nm to set the unit explicitly");
                self.add("Or drop --strict-units to assume nanomolar");
            }

            CurateError::ConfigParse(_) => {
                self.add("The curation config has invalid TOML or an unknown key");
                self.add(
                    "Known keys: unit, unknown_unit, keep_all_fragments, output_suffix, [columns]",
                );
            }

            CurateError::Io(io_err) => self.collect_io_hints(io_err),
        }
    }

    fn collect_io_hints(&mut self, err: &IoError) {
        self.mark_typed();

        match err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Parse { format, line, .. } => {
                self.add(format!(
                    "The {} reader stopped near line {}",
                    format, line
                ));
                self.add("Look for unbalanced quotes around that line");
                self.add("Tab-separated files need a .tsv or .tab extension");
            }

            IoError::InputNotFound(path) => {
                self.add(format!("'{}' is not an existing file", path.display()));
                self.add("Check the path spelling and the working directory");
            }

            IoError::EmptyInput(_) => {
                self.add("The input has no header row");
                self.add("The first line must name the SMILES, ID and IC50 columns");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        self.mark_typed();

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Verify the file is not truncated or corrupted");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe: the output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = err.to_string().to_lowercase();

        if msg.contains("stdin") {
            self.add("Pass SMILES as arguments, use -i <FILE>, or pipe lines into qcurate canon");
        } else if msg.contains("config") {
            self.add("Check the --config path and its TOML syntax");
        }
    }
}
