//! Device control handlers: on/off switching and the AC set point.

use serde_json::Value;

use domotica_core::{DeviceAction, DeviceKind, format};

use crate::cli::{ControlArgs, SetTemperatureArgs};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

pub async fn handle(ctx: &Context, args: ControlArgs) -> Result<(), CliError> {
    // Both parse before any request goes out.
    let device: DeviceKind = args.device.parse()?;
    let action: DeviceAction = args.action.parse()?;

    let body = ctx.client.control(device, action).await?;
    let verb = match action {
        DeviceAction::TurnOn => "on",
        DeviceAction::TurnOff => "off",
    };
    print_result(ctx, &body, &format!("✓ {device} turned {verb}"))
}

pub async fn set_temperature(ctx: &Context, args: SetTemperatureArgs) -> Result<(), CliError> {
    if !args.celsius.is_finite() {
        return Err(CliError::Validation {
            field: "celsius".into(),
            reason: format!("expected a finite number, got {}", args.celsius),
        });
    }

    let body = ctx
        .client
        .set_air_conditioner_temperature(args.celsius)
        .await?;
    let message = format!(
        "✓ air-conditioner set to {}",
        format::format_temperature(Some(args.celsius))
    );
    print_result(ctx, &body, &message)
}

/// Confirmation line for table/plain, the server's answer otherwise.
fn print_result(ctx: &Context, body: &Value, message: &str) -> Result<(), CliError> {
    let out = output::render_single(
        ctx.output,
        body,
        |_| message.to_owned(),
        |_| message.to_owned(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
