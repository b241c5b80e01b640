// Typed endpoint surface
//
// Thin wrappers that pin each API path and method. All return the raw JSON
// value; interpreting it is up to the caller.

use serde_json::{Value, json};

use crate::client::HomeClient;
use crate::device::{DeviceAction, DeviceKind, SensorKind};
use crate::error::Error;

const DEVICES: &str = "/api/dispositivos";
const AIR_CONDITIONER_CONFIG: &str = "/api/config-ar-condicionado";

impl HomeClient {
    // ── Sensors ──────────────────────────────────────────────────────

    /// Read any sensor.
    pub async fn sensor(&self, kind: SensorKind) -> Result<Value, Error> {
        self.get(kind.endpoint()).await
    }

    pub async fn temperature(&self) -> Result<Value, Error> {
        self.sensor(SensorKind::Temperature).await
    }

    pub async fn smoke(&self) -> Result<Value, Error> {
        self.sensor(SensorKind::Smoke).await
    }

    pub async fn luminosity(&self) -> Result<Value, Error> {
        self.sensor(SensorKind::Luminosity).await
    }

    // ── Device status ────────────────────────────────────────────────

    pub async fn device_status(&self, kind: DeviceKind) -> Result<Value, Error> {
        self.get(&kind.status_endpoint()).await
    }

    pub async fn air_conditioner_status(&self) -> Result<Value, Error> {
        self.device_status(DeviceKind::AirConditioner).await
    }

    pub async fn fire_system_status(&self) -> Result<Value, Error> {
        self.device_status(DeviceKind::FireSystem).await
    }

    pub async fn lamp_status(&self) -> Result<Value, Error> {
        self.device_status(DeviceKind::Lamp).await
    }

    // ── Device control ───────────────────────────────────────────────

    /// `POST /api/{action}-{device}` with no body.
    pub async fn control(&self, kind: DeviceKind, action: DeviceAction) -> Result<Value, Error> {
        self.post(&kind.control_endpoint(action), None).await
    }

    /// Set the air conditioner's target temperature in °C.
    pub async fn set_air_conditioner_temperature(&self, celsius: f64) -> Result<Value, Error> {
        let body = json!({ "temperatura": celsius });
        self.post(AIR_CONDITIONER_CONFIG, Some(&body)).await
    }

    // ── Inventory ────────────────────────────────────────────────────

    /// List the devices the gateway knows about.
    pub async fn devices(&self) -> Result<Value, Error> {
        self.get(DEVICES).await
    }
}
