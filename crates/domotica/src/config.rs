//! CLI configuration: thin wrapper around `domotica_config`.
//!
//! Applies `GlobalOpts` flag overrides (--base-url, --output) on top of
//! the file + environment config.

use clap::ValueEnum;

use domotica_core::HomeClient;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use domotica_config::{Config, config_path, load_config, save_config_to};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Load config and apply flag overrides. Flags beat env beats file.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    if let Some(ref url) = global.base_url {
        cfg.base_url.clone_from(url);
        cfg.validate()?;
    }
    Ok(cfg)
}

/// `--output` if given, else the configured default.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.output, true).map_err(|_| CliError::Validation {
        field: "output".into(),
        reason: format!(
            "expected table, json, json-compact, yaml or plain, got '{}'",
            cfg.output
        ),
    })
}

/// Build the API client for the resolved config.
pub fn build_client(cfg: &Config) -> Result<HomeClient, CliError> {
    let url = cfg.parsed_base_url()?;
    Ok(HomeClient::new(url, &cfg.transport())?)
}
