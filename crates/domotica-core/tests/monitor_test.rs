#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Integration tests for `Monitor` against a wiremock home server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domotica_core::{
    ChartRegistry, CoreError, DeviceAction, DeviceKind, HomeClient, Monitor, NotificationQueue,
    NotificationSurface, Redraw, SensorKind, SeriesRenderer, SeriesSnapshot, Severity,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    renders: Mutex<Vec<(String, Vec<f64>)>>,
}

impl SeriesRenderer for Recorder {
    fn render(&self, series_id: &str, series: &SeriesSnapshot, _redraw: Redraw) {
        self.renders
            .lock()
            .unwrap()
            .push((series_id.to_owned(), series.values.clone()));
    }
}

async fn setup() -> (MockServer, Monitor, Arc<Recorder>) {
    let server = MockServer::start().await;
    let client =
        HomeClient::new(server.uri().parse().unwrap(), &TransportConfig::default()).unwrap();
    let charts = Arc::new(ChartRegistry::with_max_points(5));
    let queue = Arc::new(NotificationQueue::new(NotificationSurface::new()));
    let monitor = Monitor::new(client, charts, queue);

    let recorder = Arc::new(Recorder::default());
    monitor.register_sensor_charts(|_| Arc::clone(&recorder));
    (server, monitor, recorder)
}

async fn mount_get(server: &MockServer, p: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_sensors(server: &MockServer) {
    mount_get(server, "/api/temperatura", json!({ "temperatura": 22.5 })).await;
    mount_get(server, "/api/detecao-fumaca", json!({ "fumaca": 3 })).await;
    mount_get(server, "/api/luminosidade", json!({ "luminosidade": 410 })).await;
}

fn messages(monitor: &Monitor) -> Vec<(Severity, String)> {
    monitor
        .notifications()
        .surface()
        .snapshot()
        .iter()
        .map(|n| (n.severity, n.message.clone()))
        .collect()
}

// ── Sensors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_poll_sensors_feeds_charts() {
    let (server, monitor, recorder) = setup().await;
    mount_sensors(&server).await;

    let report = monitor.poll_sensors().await;
    assert!(report.failed.is_empty());
    assert_eq!(
        report.readings,
        [
            (SensorKind::Temperature, 22.5),
            (SensorKind::Smoke, 3.0),
            (SensorKind::Luminosity, 410.0),
        ]
    );

    let temp = monitor.charts().snapshot("temperature").unwrap();
    assert_eq!(temp.values, [22.5]);
    assert_eq!(recorder.renders.lock().unwrap().len(), 3);
    assert!(monitor.notifications().surface().is_empty());
}

#[tokio::test]
async fn test_chart_keeps_last_points() {
    let (server, monitor, _recorder) = setup().await;
    mount_sensors(&server).await;

    for _ in 0..7 {
        monitor.poll_sensor(SensorKind::Smoke).await.unwrap();
    }
    let smoke = monitor.charts().snapshot("smoke").unwrap();
    assert_eq!(smoke.len(), 5);
    assert_eq!(smoke.labels.len(), 5);
}

#[tokio::test]
async fn test_sensor_failure_raises_error_notification() {
    let (server, monitor, _recorder) = setup().await;
    mount_get(&server, "/api/temperatura", json!({ "temperatura": 20 })).await;
    mount_get(&server, "/api/luminosidade", json!({ "status": "offline" })).await;
    Mock::given(method("GET"))
        .and(path("/api/detecao-fumaca"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let report = monitor.poll_sensors().await;
    assert_eq!(report.failed, [SensorKind::Smoke, SensorKind::Luminosity]);
    assert_eq!(report.readings, [(SensorKind::Temperature, 20.0)]);

    let shown = messages(&monitor);
    assert_eq!(shown.len(), 2);
    assert!(shown.iter().all(|(s, _)| *s == Severity::Error));
    assert!(shown[0].1.contains("smoke"));
    assert!(shown[1].1.contains("luminosity"));
    assert!(monitor.charts().snapshot("smoke").unwrap().is_empty());
}

#[tokio::test]
async fn test_poll_sensor_without_number() {
    let (server, monitor, _recorder) = setup().await;
    mount_get(&server, "/api/luminosidade", json!({ "status": "ok" })).await;

    let err = monitor.poll_sensor(SensorKind::Luminosity).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::NoReading {
            sensor: SensorKind::Luminosity
        }
    ));
}

// ── Device status ───────────────────────────────────────────────────

#[tokio::test]
async fn test_status_change_notifies_after_first_poll() {
    let (server, monitor, _recorder) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/status-lampada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ligado": false })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_get(&server, "/api/status-lampada", json!({ "ligado": true })).await;
    mount_get(&server, "/api/status-ar-condicionado", json!({ "ligado": false })).await;
    mount_get(&server, "/api/status-sistema-incendio", json!({ "ativo": true })).await;

    let first = monitor.poll_devices().await;
    assert!(first.changed.is_empty());
    assert!(first.failed.is_empty());
    assert!(monitor.notifications().surface().is_empty());

    let second = monitor.poll_devices().await;
    assert_eq!(second.changed, [DeviceKind::Lamp]);
    assert_eq!(
        monitor.last_status(DeviceKind::Lamp),
        Some(json!({ "ligado": true }))
    );

    let shown = messages(&monitor);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, Severity::Info);
    assert!(shown[0].1.contains("lamp"));
}

// ── Control ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_control_success_notifies() {
    let (server, monitor, _recorder) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/ligar-ar-condicionado"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let body = monitor
        .control(DeviceKind::AirConditioner, DeviceAction::TurnOn)
        .await
        .unwrap();
    assert_eq!(body, json!({ "ok": true }));
    assert_eq!(
        messages(&monitor),
        [(Severity::Success, "air-conditioner turned on".to_owned())]
    );
}

#[tokio::test]
async fn test_control_failure_notifies_and_returns_error() {
    let (server, monitor, _recorder) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/desligar-lampada"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let err = monitor
        .control(DeviceKind::Lamp, DeviceAction::TurnOff)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));

    let shown = messages(&monitor);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, Severity::Error);
    assert!(shown[0].1.starts_with("Failed to turn off lamp"));
}

#[tokio::test]
async fn test_set_temperature() {
    let (server, monitor, _recorder) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/config-ar-condicionado"))
        .and(body_json(json!({ "temperatura": 21.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    monitor.set_temperature(21.5).await.unwrap();
    assert_eq!(
        messages(&monitor),
        [(Severity::Success, "Air conditioner set to 21.5°C".to_owned())]
    );
}

#[tokio::test]
async fn test_set_temperature_rejects_nan() {
    let (server, monitor, _recorder) = setup().await;

    let err = monitor.set_temperature(f64::NAN).await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Background polling ──────────────────────────────────────────────

#[tokio::test]
async fn test_spawned_poller_runs_first_sweep_immediately() {
    let (server, monitor, _recorder) = setup().await;
    mount_sensors(&server).await;
    for kind in ["ar-condicionado", "sistema-incendio", "lampada"] {
        mount_get(&server, &format!("/api/status-{kind}"), json!({ "ligado": false })).await;
    }

    let mut sweeps = monitor.subscribe_sweeps();
    let cancel = CancellationToken::new();
    let handle = monitor.spawn(Duration::from_secs(3600), cancel.clone());

    tokio::time::timeout(Duration::from_secs(5), sweeps.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*sweeps.borrow(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 6);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        monitor.charts().snapshot("luminosity").unwrap().values,
        [410.0]
    );
    assert!(monitor.last_status(DeviceKind::Lamp).is_some());
}
