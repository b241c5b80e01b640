//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let out = match global.output {
                Some(format) => output::render_single(format, &cfg, render_toml, |c| {
                    c.base_url.clone()
                })?,
                None => render_toml(&cfg),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = Config::default();
            if let Some(ref url) = global.base_url {
                cfg.base_url.clone_from(url);
                cfg.validate()?;
            }
            config::save_config_to(&cfg, &path)?;

            if !global.quiet {
                eprintln!("✓ Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to encode config: {e}"))
}
