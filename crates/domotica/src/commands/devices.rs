//! Device inventory handler.

use serde_json::Value;
use tabled::Tabled;

use domotica_core::format::PLACEHOLDER;

use crate::commands::Context;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// First of `keys` present on `entry`, as a table cell.
fn field(entry: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| entry.get(*k))
        .map_or_else(|| PLACEHOLDER.into(), output::json_cell)
}

impl From<&Value> for DeviceRow {
    fn from(d: &Value) -> Self {
        Self {
            id: field(d, &["id", "device_id"]),
            kind: field(d, &["tipo", "type"]),
            protocol: field(d, &["protocolo", "protocol"]),
            address: field(d, &["endereco", "address", "ip"]),
            value: field(d, &["valor_atual", "value", "status"]),
        }
    }
}

/// The device entries of a listing: either a bare array or the array
/// under `dispositivos` / `devices`.
fn entries(body: &Value) -> &[Value] {
    let list = match body {
        Value::Array(_) => Some(body),
        Value::Object(map) => map.get("dispositivos").or_else(|| map.get("devices")),
        _ => None,
    };
    list.and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context) -> Result<(), CliError> {
    let body = ctx.client.devices().await?;
    let devices = entries(&body);

    let out = output::render_list(
        ctx.output,
        devices,
        |d| DeviceRow::from(d),
        |d| field(d, &["id", "device_id"]),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
