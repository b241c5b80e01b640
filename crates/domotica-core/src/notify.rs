//! Transient user-visible notifications.
//!
//! A [`NotificationSurface`] is the container notifications are displayed
//! on. It is constructed explicitly and handed to a [`NotificationQueue`],
//! which appends notifications to it and drives each one through its
//! timed lifecycle:
//!
//! ```text
//! t = 0                 inserted, Phase::Entering
//! t = 100ms             Phase::Visible   (enter animation)
//! t = duration          Phase::Leaving   (exit animation)
//! t = duration + 300ms  removed from the surface
//! ```
//!
//! Renderers observe the surface through [`NotificationSurface::subscribe`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::timer::Timers;

/// How long a notification stays up when the caller does not say.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);
/// Delay between insertion and the enter animation.
pub const ENTER_DELAY: Duration = Duration::from_millis(100);
/// Length of the exit animation before removal.
pub const FADE: Duration = Duration::from_millis(300);

pub type NotificationId = u64;

// ── Notification ────────────────────────────────────────────────────

/// Visual/semantic category of a notification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    #[default]
    Success,
    Error,
    Info,
}

/// Where a notification is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Inserted, not yet shown.
    Entering,
    Visible,
    /// Exit animation running; removal follows.
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
}

// ── Surface ─────────────────────────────────────────────────────────

/// Ordered container of live notifications.
///
/// Cheaply cloneable; clones share the same container. Every mutation
/// rebuilds the snapshot that subscribers receive.
#[derive(Clone)]
pub struct NotificationSurface {
    inner: Arc<SurfaceInner>,
}

struct SurfaceInner {
    items: Mutex<IndexMap<NotificationId, Notification>>,
    snapshot: watch::Sender<Arc<Vec<Notification>>>,
}

impl Default for NotificationSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSurface {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: Arc::new(SurfaceInner {
                items: Mutex::new(IndexMap::new()),
                snapshot,
            }),
        }
    }

    pub(crate) fn insert(&self, notification: Notification) {
        let mut items = self.lock();
        items.insert(notification.id, notification);
        self.publish(&items);
    }

    /// Move a notification to `phase`. Returns `false` if it is gone.
    pub(crate) fn set_phase(&self, id: NotificationId, phase: Phase) -> bool {
        let mut items = self.lock();
        let Some(item) = items.get_mut(&id) else {
            return false;
        };
        item.phase = phase;
        self.publish(&items);
        true
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub(crate) fn remove(&self, id: NotificationId) -> bool {
        let mut items = self.lock();
        if items.shift_remove(&id).is_none() {
            return false;
        }
        self.publish(&items);
        true
    }

    /// Drop every notification.
    pub fn clear(&self) {
        let mut items = self.lock();
        items.clear();
        self.publish(&items);
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.lock().get(&id).cloned()
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Current notifications in insertion order (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Notification>> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Notification>>> {
        self.inner.snapshot.subscribe()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<NotificationId, Notification>> {
        self.inner.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, items: &IndexMap<NotificationId, Notification>) {
        let values: Vec<Notification> = items.values().cloned().collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.inner
            .snapshot
            .send_modify(|snap| *snap = Arc::new(values));
    }
}

// ── Queue ───────────────────────────────────────────────────────────

/// Animation timings. Defaults: 100ms enter delay, 300ms fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTiming {
    pub enter_delay: Duration,
    pub fade: Duration,
}

impl Default for LifecycleTiming {
    fn default() -> Self {
        Self {
            enter_delay: ENTER_DELAY,
            fade: FADE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Reveal,
    Hide,
    Remove,
}

/// Creates notifications on a surface and times them out.
///
/// No capacity bound and no de-duplication. Individual notifications
/// cannot be dismissed early; [`shutdown`](Self::shutdown) tears down
/// everything at once. Must be used inside a Tokio runtime.
pub struct NotificationQueue {
    surface: NotificationSurface,
    // Replaced on shutdown so later notifications get a live group.
    timers: Mutex<Timers>,
    timing: LifecycleTiming,
    next_id: AtomicU64,
}

impl NotificationQueue {
    pub fn new(surface: NotificationSurface) -> Self {
        Self::with_timing(surface, LifecycleTiming::default())
    }

    pub fn with_timing(surface: NotificationSurface, timing: LifecycleTiming) -> Self {
        Self {
            surface,
            timers: Mutex::new(Timers::new()),
            timing,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn surface(&self) -> &NotificationSurface {
        &self.surface
    }

    fn timers(&self) -> MutexGuard<'_, Timers> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a notification and schedule its lifecycle.
    ///
    /// The notification is on the surface when this returns. Each later
    /// transition first checks that it is still there and otherwise
    /// does nothing.
    pub fn show(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
    ) -> NotificationId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();

        self.surface.insert(Notification {
            id,
            message: message.into(),
            severity,
            duration,
            phase: Phase::Entering,
            created_at: Utc::now(),
        });
        debug!(id, %severity, ?duration, "notification shown");

        let surface = self.surface.clone();
        let steps = [
            (self.timing.enter_delay, Step::Reveal),
            (duration, Step::Hide),
            (duration.saturating_add(self.timing.fade), Step::Remove),
        ];
        let timers = self.timers().clone();
        timers.spawn(async move {
            for (offset, step) in steps {
                match start.checked_add(offset) {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    // Past the end of the clock: this step never comes.
                    None => std::future::pending::<()>().await,
                }
                let alive = match step {
                    Step::Reveal => surface.set_phase(id, Phase::Visible),
                    Step::Hide => surface.set_phase(id, Phase::Leaving),
                    Step::Remove => surface.remove(id),
                };
                if !alive {
                    trace!(id, ?step, "notification already gone");
                    return;
                }
            }
        });

        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Success, DEFAULT_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Error, DEFAULT_DURATION)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.show(message, Severity::Info, DEFAULT_DURATION)
    }

    /// Cancel all pending lifecycle timers and clear the surface.
    ///
    /// Notifications shown afterwards run their full lifecycle again.
    pub fn shutdown(&self) {
        std::mem::take(&mut *self.timers()).cancel_all();
        self.surface.clear();
        debug!("notification queue shut down");
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        self.timers().cancel_all();
    }
}
