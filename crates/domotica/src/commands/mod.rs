//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod devices;
pub mod sensors;
pub mod status;
pub mod watch;

use domotica_config::Config;
use domotica_core::HomeClient;

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;

/// Everything a server-bound command needs.
pub struct Context {
    pub client: HomeClient,
    pub config: Config,
    pub output: OutputFormat,
    pub quiet: bool,
}

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Sensors(args) => sensors::handle(ctx, args).await,
        Command::Status(args) => status::handle(ctx, args).await,
        Command::Control(args) => control::handle(ctx, args).await,
        Command::SetTemperature(args) => control::set_temperature(ctx, args).await,
        Command::Devices => devices::handle(ctx).await,
        Command::Watch(args) => watch::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
