//! Throttled (debounced) function invocation
//!
//! A [`Throttled`] wraps an action so that calling it any number of times
//! within one interval runs the action at most once:
//!
//! - **Trailing edge**: the first call arms the timer; later calls in the
//!   same window only replace the pending arguments. When the timer fires,
//!   the action runs once with the latest arguments. The timer is never
//!   pushed back, so an effect lags its call by at most one interval.
//! - **Leading edge**: the first call runs the action immediately on the
//!   caller's thread and arms the timer; calls are ignored until it fires.
//!
//! The state the timer touches lives behind an `Arc` created once at
//! construction, so moving a `Throttled` never invalidates the timer
//! binding. It is deliberately not `Clone`: one instance, one timer.

use crate::slot::{ArgSlot, FlagSlot, PendingSlot};
use crate::timer::{panic_message, Timer};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Which edge of the window runs the action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Run immediately, then suppress calls for the interval
    Leading,
    /// Run once at the end of the interval with the latest arguments
    Trailing,
}

/// Throttled action carrying an argument value (a tuple for several)
pub type ThrottledFunc<A> = Throttled<ArgSlot<A>>;

/// Throttled action without arguments
pub type ThrottledSignal = Throttled<FlagSlot>;

enum Action<A> {
    Leading(Box<dyn Fn() + Send + Sync>),
    Trailing(Box<dyn Fn(A) + Send + Sync>),
}

struct Core<S: PendingSlot> {
    interval: Duration,
    action: Action<S::Args>,
    slot: S,
}

impl<S: PendingSlot> Core<S> {
    fn edge(&self) -> Edge {
        match self.action {
            Action::Leading(_) => Edge::Leading,
            Action::Trailing(_) => Edge::Trailing,
        }
    }

    /// Timer callback
    fn fire(&self) {
        match &self.action {
            // The action already ran at schedule time; reopen the window.
            Action::Leading(_) => self.slot.reset(),
            Action::Trailing(action) => {
                if let Some(args) = self.slot.extract() {
                    debug!("throttled action firing");
                    action(args);
                }
            }
        }
    }
}

/// Debounced wrapper around an action
pub struct Throttled<S: PendingSlot> {
    core: Arc<Core<S>>,
    timer: Timer,
}

impl<S: PendingSlot> Throttled<S> {
    /// Create a trailing-edge throttle.
    ///
    /// `action` runs on the timer thread at most once per `interval`,
    /// with the arguments of the most recent [`schedule`](Self::schedule).
    pub fn trailing<F>(interval: Duration, action: F) -> Self
    where
        F: Fn(S::Args) + Send + Sync + 'static,
    {
        Self::with_action(interval, Action::Trailing(Box::new(action)))
    }

    fn with_action(interval: Duration, action: Action<S::Args>) -> Self {
        let core = Arc::new(Core {
            interval,
            action,
            slot: S::default(),
        });

        let timer = {
            let core = Arc::clone(&core);
            Timer::new(move || core.fire())
        };

        Self { core, timer }
    }

    /// Request an invocation with `args`.
    ///
    /// Thread-safe and non-blocking apart from brief lock acquisition.
    pub fn schedule(&self, args: S::Args) {
        let had_pending = self.core.slot.replace(args);

        if !had_pending {
            if let Action::Leading(action) = &self.core.action {
                // Failures stay here; the window still closes for `interval`.
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| action())) {
                    error!("throttled action panicked: {}", panic_message(&*payload));
                }
            }
            self.timer.arm(self.core.interval);
        } else if self.timer.arm_if_idle(self.core.interval) {
            // A payload survived `wait_for_completion`; get it moving again.
            debug!("re-armed throttle for a payload left by cancellation");
        }
    }

    /// Cancel an armed timer or wait for an in-flight fire to complete.
    ///
    /// After this returns, the action will not run again unless
    /// [`schedule`](Self::schedule) is called. A trailing payload that was
    /// cancelled stays pending and can still be drained with
    /// [`flush`](Self::flush).
    pub fn wait_for_completion(&self) {
        self.timer.cancel_and_wait();

        if self.core.edge() == Edge::Leading {
            self.core.slot.reset();
        }
    }

    /// Run any pending trailing invocation now, on the calling thread.
    ///
    /// Returns `true` if the action ran.
    pub fn flush(&self) -> bool {
        match (&self.core.action, self.take_pending()) {
            (Action::Trailing(action), Some(args)) => {
                action(args);
                true
            }
            _ => false,
        }
    }

    /// Cancel the timer and hand back a pending trailing invocation's
    /// arguments instead of running the action.
    ///
    /// Lets the owner perform the owed work itself, e.g. to observe its
    /// outcome.
    pub fn take_pending(&self) -> Option<S::Args> {
        self.wait_for_completion();
        self.core.slot.extract()
    }

    /// Whether an invocation is pending
    pub fn is_pending(&self) -> bool {
        self.core.slot.is_pending()
    }

    /// The configured interval
    pub fn interval(&self) -> Duration {
        self.core.interval
    }

    /// The configured edge
    pub fn edge(&self) -> Edge {
        self.core.edge()
    }
}

impl<A: Send + 'static> Throttled<ArgSlot<A>> {
    /// Adjust the pending arguments in place without touching the timer.
    ///
    /// Does nothing when no invocation is pending.
    pub fn modify_pending<F>(&self, f: F)
    where
        F: FnOnce(&mut A),
    {
        self.core.slot.mutate(f);
    }
}

impl Throttled<FlagSlot> {
    /// Create a leading-edge throttle.
    ///
    /// The first [`call`](Self::call) in a window runs `action` synchronously;
    /// further calls are ignored until `interval` has elapsed.
    pub fn leading<F>(interval: Duration, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::with_action(interval, Action::Leading(Box::new(action)))
    }

    /// Shorthand for `schedule(())`
    pub fn call(&self) {
        self.schedule(());
    }
}

impl<S: PendingSlot> Drop for Throttled<S> {
    fn drop(&mut self) {
        self.wait_for_completion();
    }
}

impl<S: PendingSlot> fmt::Debug for Throttled<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("interval", &self.core.interval)
            .field("edge", &self.core.edge())
            .field("pending", &self.is_pending())
            .finish()
    }
}
