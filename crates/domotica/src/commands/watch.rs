//! Live dashboard: a background `Monitor` polls the server while this
//! handler prints one frame per completed sweep.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use serde::Serialize;
use strum::IntoEnumIterator;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use domotica_core::{
    ChartRegistry, Monitor, Notification, NotificationQueue, NotificationSurface, Phase, Redraw,
    SensorKind, SeriesRenderer, SeriesSnapshot, format,
};

use crate::cli::{OutputFormat, WatchArgs};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

type ChartLines = Arc<Mutex<BTreeMap<SensorKind, String>>>;

// ── Terminal renderer ───────────────────────────────────────────────

/// Draws a series as one text line: name, latest reading, sparkline.
struct TerminalChart {
    kind: SensorKind,
    lines: ChartLines,
}

impl SeriesRenderer for TerminalChart {
    fn render(&self, _series_id: &str, series: &SeriesSnapshot, _redraw: Redraw) {
        let line = chart_line(self.kind, series);
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.kind, line);
    }

    fn release(&self, _series_id: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.kind);
    }
}

fn chart_line(kind: SensorKind, series: &SeriesSnapshot) -> String {
    let (label, value) = series
        .last()
        .map_or((format::PLACEHOLDER, None), |(l, v)| (l, Some(v)));
    format!(
        "{:<12} {:>10}  {}  @ {label}",
        kind.to_string(),
        format::format_reading(value, kind.unit()),
        format::sparkline(&series.values),
    )
}

// ── Frames ──────────────────────────────────────────────────────────

/// Structured frame for the json/yaml output formats.
#[derive(Serialize)]
struct Frame<'a> {
    sweep: u64,
    time: String,
    series: BTreeMap<String, SeriesSnapshot>,
    notifications: &'a [Notification],
}

fn draw_frame(
    ctx: &Context,
    sweep: u64,
    charts: &ChartRegistry,
    lines: &ChartLines,
    surface: &NotificationSurface,
    color: bool,
) -> Result<(), CliError> {
    let notifications = surface.snapshot();
    let time = format::format_time(Some(&Local::now()));

    let out = match ctx.output {
        OutputFormat::Table | OutputFormat::Plain => {
            text_frame(sweep, &time, lines, &notifications, color)
        }
        structured => {
            let frame = Frame {
                sweep,
                time,
                series: charts
                    .ids()
                    .into_iter()
                    .filter_map(|id| charts.snapshot(&id).map(|s| (id, s)))
                    .collect(),
                notifications: &notifications,
            };
            output::render_single(structured, &frame, |_| String::new(), |_| String::new())?
        }
    };
    output::print_output(&out, ctx.quiet);
    Ok(())
}

fn text_frame(
    sweep: u64,
    time: &str,
    lines: &ChartLines,
    notifications: &[Notification],
    color: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "── {time} · sweep {sweep} ──");
    {
        let lines = lines.lock().unwrap_or_else(PoisonError::into_inner);
        for kind in SensorKind::iter() {
            match lines.get(&kind) {
                Some(line) => {
                    let _ = writeln!(out, "{line}");
                }
                None => {
                    let _ = writeln!(out, "{:<12} {:>10}", kind.to_string(), format::PLACEHOLDER);
                }
            }
        }
    }
    for n in notifications.iter().filter(|n| n.phase != Phase::Leaving) {
        let _ = writeln!(
            out,
            "{} {}",
            output::severity_tag(n.severity, color),
            n.message
        );
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: WatchArgs) -> Result<(), CliError> {
    let dash = &ctx.config.dashboard;
    let interval = args.interval.unwrap_or_else(|| dash.poll_interval());
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }
    let max_points = args.max_points.unwrap_or(dash.max_points);
    if max_points == 0 {
        return Err(CliError::Validation {
            field: "max-points".into(),
            reason: "must be at least 1".into(),
        });
    }

    let surface = NotificationSurface::new();
    let queue = Arc::new(NotificationQueue::new(surface.clone()));
    let charts = Arc::new(ChartRegistry::with_max_points(max_points));
    let monitor = Monitor::with_notify_duration(
        ctx.client.clone(),
        Arc::clone(&charts),
        Arc::clone(&queue),
        dash.notification_duration(),
    );

    let lines: ChartLines = Arc::default();
    monitor.register_sensor_charts(|kind| TerminalChart {
        kind,
        lines: Arc::clone(&lines),
    });

    let color = output::should_color();
    let mut sweeps = monitor.subscribe_sweeps();
    let cancel = CancellationToken::new();
    let poller = monitor.spawn(interval, cancel.child_token());
    info!(?interval, max_points, "watching {}", ctx.client.base_url());

    let result = loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break Ok(()),
            changed = sweeps.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let sweep = *sweeps.borrow_and_update();
                if let Err(e) = draw_frame(ctx, sweep, &charts, &lines, &surface, color) {
                    break Err(e);
                }
                if args.ticks.is_some_and(|t| sweep >= t) {
                    break Ok(());
                }
            }
        }
    };

    cancel.cancel();
    let joined = settle_poller(poller.await);
    queue.shutdown();
    for id in charts.ids() {
        charts.destroy(&id);
    }
    debug!("watch stopped");
    result.and(joined)
}

/// Surface a poller that died instead of finishing on cancellation.
fn settle_poller(joined: Result<(), JoinError>) -> Result<(), CliError> {
    match joined {
        Ok(()) => Ok(()),
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => {
            warn!(error = %e, "sensor poller failed");
            Err(CliError::PollerFailed {
                reason: e.to_string(),
            })
        }
    }
}
