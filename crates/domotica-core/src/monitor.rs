// ── Polling monitor ──
//
// Composes the API client, the chart registry and the notification queue:
// sensor readings feed the charts, device status changes and request
// failures become notifications. Cheaply cloneable via `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;
use strum::IntoEnumIterator;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use domotica_api::{DeviceAction, DeviceKind, HomeClient, SensorKind};

use crate::error::CoreError;
use crate::format;
use crate::notify::{DEFAULT_DURATION, NotificationQueue, Severity};
use crate::series::{ChartRegistry, SeriesRenderer};

/// Outcome of one sensor sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReport {
    pub readings: Vec<(SensorKind, f64)>,
    pub failed: Vec<SensorKind>,
}

/// Outcome of one device-status sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusReport {
    pub changed: Vec<DeviceKind>,
    pub failed: Vec<DeviceKind>,
}

#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    client: HomeClient,
    charts: Arc<ChartRegistry>,
    notifications: Arc<NotificationQueue>,
    notify_duration: Duration,
    last_status: Mutex<HashMap<DeviceKind, Value>>,
    sweeps: watch::Sender<u64>,
}

impl Monitor {
    pub fn new(
        client: HomeClient,
        charts: Arc<ChartRegistry>,
        notifications: Arc<NotificationQueue>,
    ) -> Self {
        Self::with_notify_duration(client, charts, notifications, DEFAULT_DURATION)
    }

    pub fn with_notify_duration(
        client: HomeClient,
        charts: Arc<ChartRegistry>,
        notifications: Arc<NotificationQueue>,
        notify_duration: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                client,
                charts,
                notifications,
                notify_duration,
                last_status: Mutex::new(HashMap::new()),
                sweeps: watch::Sender::new(0),
            }),
        }
    }

    pub fn client(&self) -> &HomeClient {
        &self.inner.client
    }

    pub fn charts(&self) -> &Arc<ChartRegistry> {
        &self.inner.charts
    }

    pub fn notifications(&self) -> &Arc<NotificationQueue> {
        &self.inner.notifications
    }

    /// Register one chart per sensor, keyed by the sensor's name.
    pub fn register_sensor_charts<R, F>(&self, mut make_renderer: F)
    where
        R: SeriesRenderer + 'static,
        F: FnMut(SensorKind) -> R,
    {
        for kind in SensorKind::iter() {
            self.inner
                .charts
                .register(series_id(kind), make_renderer(kind));
        }
    }

    // ── Sensors ──────────────────────────────────────────────────────

    /// Read one sensor and push the value onto its chart.
    pub async fn poll_sensor(&self, kind: SensorKind) -> Result<f64, CoreError> {
        let body = self.inner.client.sensor(kind).await?;
        let value = extract_reading(&body, kind.reading_field())
            .ok_or(CoreError::NoReading { sensor: kind })?;
        self.inner.charts.add_point_now(&series_id(kind), value);
        debug!(sensor = %kind, value, "sensor reading");
        Ok(value)
    }

    /// Read every sensor. Failures are reported as error notifications.
    pub async fn poll_sensors(&self) -> SensorReport {
        let mut report = SensorReport::default();
        for kind in SensorKind::iter() {
            match self.poll_sensor(kind).await {
                Ok(value) => report.readings.push((kind, value)),
                Err(e) => {
                    warn!(sensor = %kind, error = %e, "sensor poll failed");
                    self.notify(format!("Failed to read {kind}: {e}"), Severity::Error);
                    report.failed.push(kind);
                }
            }
        }
        report
    }

    // ── Device status ────────────────────────────────────────────────

    /// Read every device status; a status that differs from the last
    /// poll raises an info notification. The first observation does not.
    pub async fn poll_devices(&self) -> StatusReport {
        let mut report = StatusReport::default();
        for kind in DeviceKind::iter() {
            match self.inner.client.device_status(kind).await {
                Ok(status) => {
                    if self.record_status(kind, status) {
                        info!(device = %kind, "device status changed");
                        self.notify(format!("{kind} status changed"), Severity::Info);
                        report.changed.push(kind);
                    }
                }
                Err(e) => {
                    warn!(device = %kind, error = %e, "status poll failed");
                    self.notify(
                        format!("Failed to read {kind} status: {e}"),
                        Severity::Error,
                    );
                    report.failed.push(kind);
                }
            }
        }
        report
    }

    /// Last status seen for a device.
    pub fn last_status(&self, kind: DeviceKind) -> Option<Value> {
        self.inner
            .last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    /// Store `status`; returns `true` if it replaced a different value.
    fn record_status(&self, kind: DeviceKind, status: Value) -> bool {
        let mut last = self
            .inner
            .last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match last.insert(kind, status.clone()) {
            Some(previous) => previous != status,
            None => false,
        }
    }

    // ── Control ──────────────────────────────────────────────────────

    /// Switch a device and report the outcome as a notification.
    /// The error is still returned to the caller.
    pub async fn control(
        &self,
        kind: DeviceKind,
        action: DeviceAction,
    ) -> Result<Value, CoreError> {
        let verb = match action {
            DeviceAction::TurnOn => "on",
            DeviceAction::TurnOff => "off",
        };
        match self.inner.client.control(kind, action).await {
            Ok(body) => {
                self.notify(format!("{kind} turned {verb}"), Severity::Success);
                Ok(body)
            }
            Err(e) => {
                self.notify(format!("Failed to turn {verb} {kind}: {e}"), Severity::Error);
                Err(e.into())
            }
        }
    }

    /// Set the air conditioner target temperature.
    pub async fn set_temperature(&self, celsius: f64) -> Result<Value, CoreError> {
        if !celsius.is_finite() {
            return Err(CoreError::ValidationFailed {
                message: format!("temperature must be a finite number, got {celsius}"),
            });
        }
        match self.inner.client.set_air_conditioner_temperature(celsius).await {
            Ok(body) => {
                self.notify(
                    format!(
                        "Air conditioner set to {}",
                        format::format_temperature(Some(celsius))
                    ),
                    Severity::Success,
                );
                Ok(body)
            }
            Err(e) => {
                self.notify(format!("Failed to set temperature: {e}"), Severity::Error);
                Err(e.into())
            }
        }
    }

    // ── Background polling ───────────────────────────────────────────

    /// Poll sensors and device statuses every `period` until cancelled.
    ///
    /// The first sweep runs immediately.
    pub fn spawn(&self, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move { poll_task(monitor, period, cancel).await })
    }

    /// Number of completed background sweeps, updated after each one.
    pub fn subscribe_sweeps(&self) -> watch::Receiver<u64> {
        self.inner.sweeps.subscribe()
    }

    fn notify(&self, message: String, severity: Severity) {
        self.inner
            .notifications
            .show(message, severity, self.inner.notify_duration);
    }
}

async fn poll_task(monitor: Monitor, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let sensors = monitor.poll_sensors().await;
                let devices = monitor.poll_devices().await;
                debug!(
                    readings = sensors.readings.len(),
                    sensor_failures = sensors.failed.len(),
                    status_changes = devices.changed.len(),
                    "poll sweep done"
                );
                monitor.inner.sweeps.send_modify(|n| *n += 1);
            }
        }
    }
    debug!("poll task shut down");
}

/// Chart id used for a sensor's series.
pub fn series_id(kind: SensorKind) -> String {
    kind.to_string()
}

/// Pull a numeric reading out of a sensor response.
///
/// Accepts a bare number, a numeric string, a boolean (detector state as
/// 1/0), or an object carrying one of those under `field`, `valor` or
/// `value`; nested objects are searched the same way.
pub fn extract_reading(body: &Value, field: &str) -> Option<f64> {
    match body {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Object(map) => [field, "valor", "value"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|v| extract_reading(v, field)),
        Value::Array(_) | Value::Null => None,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extract_from_common_shapes() {
        assert_eq!(extract_reading(&json!(23.5), "temperatura"), Some(23.5));
        assert_eq!(extract_reading(&json!("19.25"), "temperatura"), Some(19.25));
        assert_eq!(
            extract_reading(&json!({ "temperatura": 21 }), "temperatura"),
            Some(21.0)
        );
        assert_eq!(
            extract_reading(&json!({ "valor": 300, "unidade": "lux" }), "luminosidade"),
            Some(300.0)
        );
        assert_eq!(
            extract_reading(&json!({ "temperatura": { "valor": 22.0 } }), "temperatura"),
            Some(22.0)
        );
        assert_eq!(
            extract_reading(&json!({ "fumaca": true }), "fumaca"),
            Some(1.0)
        );
    }

    #[test]
    fn extract_rejects_non_numeric() {
        assert_eq!(extract_reading(&json!(null), "x"), None);
        assert_eq!(extract_reading(&json!([1, 2]), "x"), None);
        assert_eq!(extract_reading(&json!({ "status": "ok" }), "x"), None);
        assert_eq!(extract_reading(&json!("n/a"), "x"), None);
    }

    #[test]
    fn own_field_wins_over_valor() {
        let body = json!({ "valor": 1, "temperatura": 2 });
        assert_eq!(extract_reading(&body, "temperatura"), Some(2.0));
    }

    #[test]
    fn series_ids_match_sensor_names() {
        assert_eq!(series_id(SensorKind::Temperature), "temperature");
        assert_eq!(series_id(SensorKind::Luminosity), "luminosity");
    }
}
