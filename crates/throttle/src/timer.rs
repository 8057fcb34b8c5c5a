//! One-shot background timer
//!
//! Each [`Timer`] owns a dedicated thread that sleeps until the armed
//! deadline and then runs the callback. Callbacks for one timer never run
//! concurrently, and [`Timer::cancel_and_wait`] guarantees that no callback
//! is pending or in flight when it returns.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};
use tracing::{error, trace};

/// Re-armable one-shot timer backed by its own thread
pub struct Timer {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

struct Shared {
    state: Mutex<TimerState>,
    cond: Condvar,
}

#[derive(Default)]
struct TimerState {
    /// When the next callback is due, if armed
    deadline: Option<Instant>,
    /// A callback is currently executing
    firing: bool,
    /// Owner dropped; thread must exit
    shutdown: bool,
}

impl Timer {
    /// Spawn the timer thread. The timer starts disarmed.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(TimerState::default()),
            cond: Condvar::new(),
        });

        let thread = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || run(&shared, callback))
        };

        Self {
            shared,
            thread: Some(thread),
        }
    }

    /// Arm the timer to fire `delay` from now, replacing any earlier deadline
    pub fn arm(&self, delay: Duration) {
        let mut state = self.shared.state.lock();
        if state.shutdown {
            return;
        }
        state.deadline = Some(Instant::now() + delay);
        self.shared.cond.notify_all();
    }

    /// Arm the timer only if it is neither armed nor running a callback.
    ///
    /// Returns `true` if this call armed it.
    pub fn arm_if_idle(&self, delay: Duration) -> bool {
        let mut state = self.shared.state.lock();
        if state.shutdown || state.deadline.is_some() || state.firing {
            return false;
        }
        state.deadline = Some(Instant::now() + delay);
        self.shared.cond.notify_all();
        true
    }

    /// Whether a deadline is set or a callback is executing
    pub fn is_active(&self) -> bool {
        let state = self.shared.state.lock();
        state.deadline.is_some() || state.firing
    }

    /// Cancel an armed deadline and wait for an in-flight callback to finish.
    ///
    /// Called from inside the callback itself, this only cancels; waiting
    /// there would deadlock on our own completion.
    pub fn cancel_and_wait(&self) {
        let mut state = self.shared.state.lock();
        state.deadline = None;

        if self.is_timer_thread() {
            return;
        }

        while state.firing {
            self.shared.cond.wait(&mut state);
        }
    }

    fn is_timer_thread(&self) -> bool {
        self.thread_id() == Some(thread::current().id())
    }

    fn thread_id(&self) -> Option<ThreadId> {
        self.thread.as_ref().map(|t| t.thread().id())
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            state.deadline = None;
            self.shared.cond.notify_all();
        }

        if self.is_timer_thread() {
            // Dropped from our own callback; the thread exits on its own.
            return;
        }

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("timer thread terminated abnormally");
            }
        }
    }
}

fn run<F>(shared: &Shared, mut callback: F)
where
    F: FnMut(),
{
    let mut state = shared.state.lock();

    loop {
        if state.shutdown {
            return;
        }

        let deadline = state.deadline;
        match deadline {
            None => shared.cond.wait(&mut state),
            Some(deadline) if Instant::now() < deadline => {
                shared.cond.wait_until(&mut state, deadline);
            }
            Some(_) => {
                state.deadline = None;
                state.firing = true;

                trace!("timer fired");
                let outcome = MutexGuard::unlocked(&mut state, || {
                    panic::catch_unwind(AssertUnwindSafe(&mut callback))
                });
                if let Err(payload) = outcome {
                    error!("timer callback panicked: {}", panic_message(&*payload));
                }

                state.firing = false;
                shared.cond.notify_all();
            }
        }
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
