//! Device status command handler.

use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use tabled::Tabled;

use domotica_core::DeviceKind;

use crate::cli::StatusArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct DeviceStatus {
    device: DeviceKind,
    status: Value,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&DeviceStatus> for StatusRow {
    fn from(s: &DeviceStatus) -> Self {
        Self {
            device: s.device.to_string(),
            status: output::json_cell(&s.status),
        }
    }
}

pub async fn handle(ctx: &Context, args: StatusArgs) -> Result<(), CliError> {
    let kinds: Vec<DeviceKind> = match args.device {
        Some(name) => vec![name.parse()?],
        None => DeviceKind::iter().collect(),
    };

    let mut statuses = Vec::with_capacity(kinds.len());
    for kind in kinds {
        statuses.push(DeviceStatus {
            device: kind,
            status: ctx.client.device_status(kind).await?,
        });
    }

    let out = output::render_list(
        ctx.output,
        &statuses,
        |s| StatusRow::from(s),
        |s| format!("{}\t{}", s.device, output::json_cell(&s.status)),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
