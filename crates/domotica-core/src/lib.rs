//! Dashboard logic between `domotica-api` and its front ends.
//!
//! - **[`NotificationQueue`]**: transient toasts with a timed lifecycle
//!   (entering, visible, leaving, removed) published on a
//!   [`NotificationSurface`] that renderers subscribe to.
//!
//! - **[`ChartRegistry`]**: named rolling series of at most
//!   `max_points` labelled values, each drawn by a [`SeriesRenderer`] on
//!   every insert.
//!
//! - **[`Monitor`]**: polls sensors and device status, feeds the charts
//!   and raises notifications for failures and status changes.
//!
//! - **[`format`]** and **[`debounce`]**: display helpers and
//!   last-call-wins scheduling.

pub mod debounce;
pub mod error;
pub mod format;
pub mod monitor;
pub mod notify;
pub mod series;
pub mod timer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use debounce::{Debounced, debounce};
pub use error::CoreError;
pub use monitor::{Monitor, SensorReport, StatusReport, extract_reading};
pub use notify::{
    LifecycleTiming, Notification, NotificationId, NotificationQueue, NotificationSurface, Phase,
    Severity,
};
pub use series::{ChartRegistry, Redraw, SeriesRenderer, SeriesSnapshot};
pub use timer::{TimerHandle, Timers};

// Shared API types so front ends need only one import path.
pub use domotica_api::{DeviceAction, DeviceKind, HomeClient, SensorKind, TransportConfig};
