//! Clap derive structures for the `domotica` CLI.
//!
//! Kept free of workspace types so `build.rs` can compile it for man pages.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// domotica -- read sensors and switch devices on a home-automation server
#[derive(Debug, Parser)]
#[command(
    name = "domotica",
    version,
    about = "Read sensors and control devices of a home-automation server",
    long_about = "Command-line client for a home-automation HTTP API.\n\n\
        One-shot commands read sensors and device status or switch devices;\n\
        `watch` polls continuously and draws rolling charts with notifications.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server base URL (overrides config)
    #[arg(long, short = 'u', env = "DOMOTICA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format (defaults to the configured one, else table)
    #[arg(long, short = 'o', env = "DOMOTICA_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read sensor values (all sensors when none is named)
    #[command(alias = "s")]
    Sensors(SensorsArgs),

    /// Show device status (all devices when none is named)
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Turn a device on or off
    #[command(alias = "ctl")]
    Control(ControlArgs),

    /// Set the air conditioner target temperature
    SetTemperature(SetTemperatureArgs),

    /// List devices known to the server
    #[command(alias = "dev")]
    Devices,

    /// Poll continuously and draw rolling sensor charts
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Reads ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SensorsArgs {
    /// temperature, smoke or luminosity
    pub sensor: Option<String>,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// air-conditioner (ac), fire-system (fire) or lamp
    pub device: Option<String>,
}

// ── Control ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ControlArgs {
    /// air-conditioner (ac), fire-system (fire) or lamp
    pub device: String,

    /// on or off
    pub action: String,
}

#[derive(Debug, Args)]
pub struct SetTemperatureArgs {
    /// Target temperature in °C
    #[arg(allow_negative_numbers = true)]
    pub celsius: f64,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval, e.g. "5s" or "1m" (defaults to config)
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Points kept per chart (defaults to config)
    #[arg(long, short = 'n')]
    pub max_points: Option<usize>,

    /// Exit after this many poll sweeps
    #[arg(long)]
    pub ticks: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with defaults (and --base-url if given)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
