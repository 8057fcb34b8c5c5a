//! Pending-argument storage for throttled invocations
//!
//! A slot holds at most one "next invocation" payload. Schedulers race to
//! replace it, the timer thread extracts it exactly once per fire.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot storage shared between schedulers and the timer callback
pub trait PendingSlot: Default + Send + Sync + 'static {
    /// Payload handed to the action when the slot is drained
    type Args: Send + 'static;

    /// Store `args` as the pending payload, overwriting any previous one.
    ///
    /// Returns `true` if a payload was already pending.
    fn replace(&self, args: Self::Args) -> bool;

    /// Remove and return the pending payload, leaving the slot empty
    fn extract(&self) -> Option<Self::Args>;

    /// Clear the pending payload without returning it
    fn reset(&self);

    /// Whether a payload is currently pending
    fn is_pending(&self) -> bool;
}

/// Slot carrying an argument value (use a tuple for several arguments)
pub struct ArgSlot<A> {
    pending: Mutex<Option<A>>,
}

impl<A> ArgSlot<A> {
    /// Apply `f` to the pending payload in place.
    ///
    /// Does nothing when the slot is empty.
    pub fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut A),
    {
        if let Some(args) = self.pending.lock().as_mut() {
            f(args);
        }
    }
}

impl<A> Default for ArgSlot<A> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }
}

impl<A: Send + 'static> PendingSlot for ArgSlot<A> {
    type Args = A;

    fn replace(&self, args: A) -> bool {
        self.pending.lock().replace(args).is_some()
    }

    fn extract(&self) -> Option<A> {
        self.pending.lock().take()
    }

    fn reset(&self) {
        // Drop the payload outside the lock
        let stale = self.pending.lock().take();
        drop(stale);
    }

    fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

/// Payload-free slot: a lock-free "something is pending" flag
#[derive(Default)]
pub struct FlagSlot {
    pending: AtomicBool,
}

impl PendingSlot for FlagSlot {
    type Args = ();

    fn replace(&self, _args: ()) -> bool {
        self.pending.swap(true, Ordering::AcqRel)
    }

    fn extract(&self) -> Option<()> {
        self.pending.swap(false, Ordering::AcqRel).then_some(())
    }

    fn reset(&self) {
        self.pending.store(false, Ordering::Release);
    }

    fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_arg_slot_replace_reports_previous() {
        let slot = ArgSlot::<u32>::default();

        assert!(!slot.replace(1));
        assert!(slot.replace(2));
        assert!(slot.replace(3));

        // Last write wins
        assert_eq!(slot.extract(), Some(3));
        assert_eq!(slot.extract(), None);
        assert!(!slot.replace(4));
    }

    #[test]
    fn test_arg_slot_mutate_in_place() {
        let slot = ArgSlot::<(String, u32)>::default();

        // No-op while empty
        slot.mutate(|(_, n)| *n += 1);
        assert!(!slot.is_pending());

        slot.replace(("a".to_string(), 1));
        slot.mutate(|(s, n)| {
            s.push('b');
            *n += 10;
        });

        assert_eq!(slot.extract(), Some(("ab".to_string(), 11)));
    }

    #[test]
    fn test_arg_slot_reset() {
        let slot = ArgSlot::<Vec<u8>>::default();
        slot.replace(vec![1, 2, 3]);
        assert!(slot.is_pending());

        slot.reset();
        assert!(!slot.is_pending());
        assert_eq!(slot.extract(), None);
    }

    #[test]
    fn test_flag_slot() {
        let slot = FlagSlot::default();

        assert!(!slot.is_pending());
        assert!(!slot.replace(()));
        assert!(slot.replace(()));
        assert!(slot.is_pending());

        assert_eq!(slot.extract(), Some(()));
        assert_eq!(slot.extract(), None);

        slot.replace(());
        slot.reset();
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_concurrent_replace_single_winner_of_empty() {
        let slot = Arc::new(ArgSlot::<usize>::default());
        let mut handles = Vec::new();

        for i in 0..8 {
            let slot = Arc::clone(&slot);
            handles.push(thread::spawn(move || {
                let mut first = 0;
                for j in 0..1000 {
                    if !slot.replace(i * 1000 + j) {
                        first += 1;
                    }
                }
                first
            }));
        }

        let firsts: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        // Nobody extracts, so exactly one replace found the slot empty
        assert_eq!(firsts, 1);
        assert!(slot.extract().is_some());
    }
}
