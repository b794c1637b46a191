//! Command dispatch: bridges CLI args -> device tree calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod util;
pub mod views;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a state-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Views(args) => views::handle(args, ctx).await,
        Command::Devices(args) => devices::handle(args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
