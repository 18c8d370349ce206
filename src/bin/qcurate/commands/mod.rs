mod canon;
mod curate;

use canon::run_canon;
use curate::run_curate;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Curate(args) => run_curate(args, ctx),
        Command::Canon(args) => run_canon(args, ctx),
    }
}
