//! Last-call-wins debouncing on top of [`Timers`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::timer::{TimerHandle, Timers};

/// A function wrapped so that rapid calls collapse into one.
///
/// Each [`call`](Self::call) cancels the pending invocation and schedules
/// a new one `wait` from now, so only the last call of a burst runs, with
/// its own arguments. Pass a tuple as `A` for several arguments.
pub struct Debounced<A> {
    func: Arc<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    timers: Timers,
    pending: Mutex<Option<TimerHandle>>,
}

/// Wrap `func` so it only runs after `wait` without further calls.
pub fn debounce<A, F>(func: F, wait: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        func: Arc::new(func),
        wait,
        timers: Timers::new(),
        pending: Mutex::new(None),
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Schedule `func(args)`, replacing any pending call.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn call(&self, args: A) {
        let func = Arc::clone(&self.func);
        let mut pending = self.lock();
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
        *pending = Some(self.timers.after(self.wait, move || func(args)));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    fn lock(&self) -> MutexGuard<'_, Option<TimerHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
