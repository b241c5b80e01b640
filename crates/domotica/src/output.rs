//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::{OwoColorize, Style as Paint};
use tabled::{Table, Tabled, settings::Style};

use domotica_core::Severity;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Color is used on an interactive stdout unless `NO_COLOR` is set.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Severity tag for notification lines, e.g. `[error]`.
pub fn severity_tag(severity: Severity, color: bool) -> String {
    let tag = format!("[{severity}]");
    if !color {
        return tag;
    }
    let paint = match severity {
        Severity::Success => Paint::new().green().bold(),
        Severity::Error => Paint::new().red().bold(),
        Severity::Info => Paint::new().cyan().bold(),
    };
    tag.style(paint).to_string()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `line_fn` on each item, one line each
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    line_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&line_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table and plain use the pre-formatted strings from `detail_fn` and
/// `line_fn`.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    line_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(line_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

/// Compact one-line rendering of an arbitrary JSON value for table cells.
pub fn json_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => domotica_core::format::PLACEHOLDER.into(),
        other => other.to_string(),
    }
}
