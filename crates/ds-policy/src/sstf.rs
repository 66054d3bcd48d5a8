//! Shortest-Seek-Time-First.
//!
//! # Selection rule
//!
//! From the requests not yet visited, pick the one with the smallest
//! absolute distance from the current position.  On a tie the request with
//! the lowest index in the submitted queue wins: the scan below only
//! replaces its candidate on a *strictly* smaller distance.
//!
//! Requests are never removed from the queue.  A parallel `visited` marker
//! array stands in for the pending set, so indices stay stable and the
//! tie-break stays auditable.  O(n²), fine for the queue sizes the
//! controller accepts (≤ 1000).

use ds_core::{HopKind, SchedulingResult, Track, Workload};

use crate::trace::Trace;
use crate::{PolicyKey, SchedulingPolicy};

#[derive(Copy, Clone, Debug, Default)]
pub struct Sstf;

impl SchedulingPolicy for Sstf {
    fn key(&self) -> PolicyKey {
        PolicyKey::Sstf
    }

    fn schedule(&self, workload: &Workload) -> SchedulingResult {
        let queue = &workload.queue;
        let mut visited = vec![false; queue.len()];
        let mut trace = Trace::new(workload.head, queue.len());

        while let Some((idx, distance)) = nearest_pending(queue, &visited, trace.current()) {
            visited[idx] = true;
            let from = trace.current();
            let next = queue[idx];
            trace.hop(
                next,
                HopKind::Service,
                format!("Moving to {next} (closest to {from}, distance: {distance})"),
            );
        }
        trace.finish(workload.request_count())
    }
}

/// Index and distance of the closest unvisited request; lowest index on ties.
fn nearest_pending(queue: &[Track], visited: &[bool], current: Track) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &request) in queue.iter().enumerate() {
        if visited[i] {
            continue;
        }
        let d = current.distance_to(request);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best
}
