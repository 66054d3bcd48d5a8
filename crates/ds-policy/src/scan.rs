//! SCAN (elevator).
//!
//! Requests are split into `left = {r < head}` and `right = {r >= head}`.
//! The head serves its travel side first, moving outward from the head.  If
//! the other side has requests, it continues to the disk edge, reverses once,
//! and serves the other side on the way back.
//!
//! ```text
//! direction = right:  right ascending → track_limit → left descending
//! direction = left:   left descending → 0           → right ascending
//! ```
//!
//! Positions equal to the current head are never logged as zero-distance
//! hops.  A request there is counted as served (absorbed); a boundary there
//! is skipped.  This also means coincident duplicates collapse into one hop.

use ds_core::{Direction, HopKind, SchedulingResult, Track, Workload};

use crate::trace::{Trace, service};
use crate::{PolicyKey, SchedulingPolicy};

#[derive(Copy, Clone, Debug, Default)]
pub struct Scan;

impl SchedulingPolicy for Scan {
    fn key(&self) -> PolicyKey {
        PolicyKey::Scan
    }

    fn schedule(&self, workload: &Workload) -> SchedulingResult {
        let path = sweep_path(workload);
        let mut trace = Trace::new(workload.head, path.len());
        trace.walk(&path, |from, to| {
            let heading = Direction::of_hop(from, to).unwrap_or(workload.direction);
            format!("SCAN: Moving {heading} to {to} (distance: {})", from.distance_to(to))
        });
        trace.finish(workload.request_count())
    }
}

fn sweep_path(workload: &Workload) -> Vec<(Track, HopKind)> {
    let (left, right) = workload.partition();
    let mut path = Vec::with_capacity(left.len() + right.len() + 1);

    match workload.direction {
        Direction::Left => {
            path.extend(service(left.into_iter().rev()));
            if !right.is_empty() {
                path.push((Track::ZERO, HopKind::Boundary));
                path.extend(service(right));
            }
        }
        Direction::Right => {
            path.extend(service(right));
            if !left.is_empty() {
                path.push((workload.track_limit, HopKind::Boundary));
                path.extend(service(left.into_iter().rev()));
            }
        }
    }
    path
}
