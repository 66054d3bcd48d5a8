//! `TimerQueue` — virtual-time timers with cancellable handles.
//!
//! # Model
//!
//! The controller runs two independent periodic timers: the playback tick and
//! the dynamic-arrival tick.  Both live in one queue keyed by due time, so
//! when the host advances the clock they fire in strict time order, one at a
//! time, and never interleave.  A periodic timer is re-armed by its handler
//! after it fires.
//!
//! Every armed timer carries a [`TimerHandle`] whose cancellation token is
//! shared with its queue entries.  Cancelling flips the token; the queue
//! never yields an entry whose token is cancelled, and
//! [`TimerQueue::purge_cancelled`] drops such entries eagerly.  Once
//! `cancel` returns, that timer cannot fire again.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ds_core::SimTime;

/// Which controller timer an entry belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TimerKind {
    Playback,
    Arrival,
}

// ── TimerHandle ───────────────────────────────────────────────────────────────

/// Owning handle for one armed periodic timer.
#[derive(Clone, Debug)]
pub struct TimerHandle {
    kind:        TimerKind,
    interval_ms: u64,
    cancelled:   Arc<AtomicBool>,
}

impl TimerHandle {
    #[inline]
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    #[inline]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Cancel the timer.  Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

// ── TimerQueue ────────────────────────────────────────────────────────────────

/// A priority queue mapping due times → timers that fire at that time.
///
/// Entries due at the same instant fire in the order they were pushed.
#[derive(Default)]
pub struct TimerQueue {
    inner: BTreeMap<SimTime, Vec<TimerHandle>>,
    /// Cached entry count for O(1) `len()`.
    total: usize,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a new periodic timer whose first firing is `interval_ms` after
    /// `now`.  An interval of 0 is treated as 1 ms.
    pub fn arm(&mut self, kind: TimerKind, now: SimTime, interval_ms: u64) -> TimerHandle {
        let handle = TimerHandle {
            kind,
            interval_ms: interval_ms.max(1),
            cancelled:   Arc::new(AtomicBool::new(false)),
        };
        self.push(now + handle.interval_ms, handle.clone());
        handle
    }

    /// Schedule the next firing of a periodic timer that just fired at
    /// `fired_at`.  Cancelled handles are not re-armed.
    pub fn rearm(&mut self, handle: &TimerHandle, fired_at: SimTime) {
        if !handle.is_cancelled() {
            self.push(fired_at + handle.interval_ms, handle.clone());
        }
    }

    fn push(&mut self, due: SimTime, handle: TimerHandle) {
        self.inner.entry(due).or_default().push(handle);
        self.total += 1;
    }

    /// Remove and return the earliest live timer due at or before `deadline`.
    ///
    /// Cancelled entries encountered on the way are discarded.
    pub fn pop_due(&mut self, deadline: SimTime) -> Option<(SimTime, TimerHandle)> {
        loop {
            let mut slot = self.inner.first_entry()?;
            let due = *slot.key();
            if due > deadline {
                return None;
            }
            let handle = slot.get_mut().remove(0);
            if slot.get().is_empty() {
                slot.remove();
            }
            self.total -= 1;
            if !handle.is_cancelled() {
                return Some((due, handle));
            }
        }
    }

    /// Drop every entry whose handle has been cancelled.
    pub fn purge_cancelled(&mut self) {
        self.inner.retain(|_, handles| {
            handles.retain(|h| !h.is_cancelled());
            !handles.is_empty()
        });
        self.total = self.inner.values().map(Vec::len).sum();
    }

    /// The earliest due time with at least one entry, or `None` if empty.
    pub fn next_due(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of pending entries.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
