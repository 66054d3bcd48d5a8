//! Incremental step-log builder shared by all policies.

use ds_core::{HopKind, SchedulingResult, Step, Track};

/// Accumulates hops from a starting head position.
///
/// `current` always equals the `to` of the last logged hop (or the head), so
/// the step log handed to [`SchedulingResult::from_steps`] is contiguous by
/// construction.
pub(crate) struct Trace {
    head:             Track,
    current:          Track,
    steps:            Vec<Step>,
    absorbed_at_head: u32,
}

impl Trace {
    pub(crate) fn new(head: Track, capacity: usize) -> Self {
        Self {
            head,
            current: head,
            steps: Vec::with_capacity(capacity),
            absorbed_at_head: 0,
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> Track {
        self.current
    }

    /// Log a hop to `to`, even a zero-length one.
    pub(crate) fn hop(&mut self, to: Track, kind: HopKind, explanation: String) {
        self.steps.push(Step::new(self.current, to, kind, explanation));
        self.current = to;
    }

    /// Record a request satisfied at the current position without a hop.
    pub(crate) fn absorb(&mut self) {
        match self.steps.last_mut() {
            Some(last) => last.serviced += 1,
            None       => self.absorbed_at_head += 1,
        }
    }

    /// Walk a sweep path.  Entries equal to the current position are never
    /// logged as zero-length hops: a request there is absorbed, a boundary
    /// or wrap point there is simply skipped.
    pub(crate) fn walk<F>(&mut self, path: &[(Track, HopKind)], mut explain: F)
    where
        F: FnMut(Track, Track) -> String,
    {
        for &(track, kind) in path {
            if track == self.current {
                if kind == HopKind::Service {
                    self.absorb();
                }
                continue;
            }
            let explanation = explain(self.current, track);
            self.hop(track, kind, explanation);
        }
    }

    pub(crate) fn finish(self, request_count: usize) -> SchedulingResult {
        SchedulingResult::from_steps(self.head, self.steps, self.absorbed_at_head, request_count)
    }
}

/// Tag every track in `tracks` as a `Service` path entry.
pub(crate) fn service(tracks: impl IntoIterator<Item = Track>) -> impl Iterator<Item = (Track, HopKind)> {
    tracks.into_iter().map(|t| (t, HopKind::Service))
}
