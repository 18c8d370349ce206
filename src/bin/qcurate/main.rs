use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod display;
mod io;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    let diagnostics = cli.command.diagnostics();
    init_logging(diagnostics.verbose);

    let ctx = display::Context::detect()
        .with_quiet(diagnostics.quiet)
        .with_verbose(diagnostics.verbose > 0);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, raised by each `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("qsar_curate={level},qcurate={level}"))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
