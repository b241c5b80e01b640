// ── Cancellable timers ──
//
// Deferred work runs as Tokio tasks racing a `CancellationToken`. Every
// timer gets a child of the owner's root token, so a single timer can be
// dropped on its own and `cancel_all` tears every pending one down.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Spawner for cancellable deferred tasks.
///
/// Spawning requires a Tokio runtime context. Once [`cancel_all`] has been
/// called, timers spawned afterwards are cancelled immediately.
///
/// [`cancel_all`]: Timers::cancel_all
#[derive(Debug, Clone, Default)]
pub struct Timers {
    root: CancellationToken,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// A timer group that is cancelled along with `self`, but can also be
    /// cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            root: self.root.child_token(),
        }
    }

    /// Run `fut` unless cancelled first.
    pub fn spawn<F>(&self, fut: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let guard = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = guard.cancelled() => trace!("timer cancelled"),
                () = fut => {}
            }
        });
        TimerHandle { token, join }
    }

    /// Run `f` once `delay` has elapsed, unless cancelled first.
    pub fn after<F>(&self, delay: Duration, f: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        })
    }

    /// Cancel every timer spawned from this group (and its children).
    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.root.is_cancelled()
    }
}

/// Handle to one pending timer. Dropping it does not cancel the timer.
#[derive(Debug)]
pub struct TimerHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// `true` once the task has run to completion or observed cancellation.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
