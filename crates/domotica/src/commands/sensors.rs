//! Sensor command handler.

use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use tabled::Tabled;

use domotica_core::{SensorKind, extract_reading, format};

use crate::cli::SensorsArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct SensorReading {
    sensor: SensorKind,
    value: Option<f64>,
    raw: Value,
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Reading")]
    reading: String,
    #[tabled(rename = "Endpoint")]
    endpoint: &'static str,
}

impl From<&SensorReading> for SensorRow {
    fn from(r: &SensorReading) -> Self {
        Self {
            sensor: r.sensor.to_string(),
            reading: format::format_reading(r.value, r.sensor.unit()),
            endpoint: r.sensor.endpoint(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: SensorsArgs) -> Result<(), CliError> {
    let kinds: Vec<SensorKind> = match args.sensor {
        Some(name) => vec![name.parse()?],
        None => SensorKind::iter().collect(),
    };

    let mut readings = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let raw = ctx.client.sensor(kind).await?;
        readings.push(SensorReading {
            sensor: kind,
            value: extract_reading(&raw, kind.reading_field()),
            raw,
        });
    }

    let out = output::render_list(ctx.output, &readings, |r| SensorRow::from(r), |r| {
        let value = r
            .value
            .map_or_else(|| format::PLACEHOLDER.to_owned(), |v| v.to_string());
        format!("{}\t{value}", r.sensor)
    })?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
