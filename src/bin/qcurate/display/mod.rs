mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use tables::{print_column_map, print_curation_summary, print_plain_summary};

#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Draw banners, spinners and tables on stderr.
    pub interactive: bool,
    /// Print plain status lines when not interactive.
    pub status: bool,
    pub verbose: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: crate::io::stderr_is_tty(),
            status: true,
            verbose: false,
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self {
                interactive: false,
                status: false,
                ..self
            }
        } else {
            self
        }
    }

    pub fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }
}
