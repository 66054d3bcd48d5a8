//! Circular SCAN.
//!
//! Like SCAN, but the head never reverses.  After the last request on its
//! travel side it continues to the edge, jumps straight to the opposite edge
//! (the wraparound, charged at its full distance, serving nothing), and keeps
//! moving in the original direction.
//!
//! ```text
//! direction = right:  right ascending → track_limit ⇒ 0 → left ascending
//! direction = left:   left descending → 0 ⇒ track_limit → right descending
//! ```
//!
//! A hop against the travel direction is, by construction, the wraparound;
//! its explanation says so.

use ds_core::{Direction, HopKind, SchedulingResult, Track, Workload};

use crate::trace::{Trace, service};
use crate::{PolicyKey, SchedulingPolicy};

#[derive(Copy, Clone, Debug, Default)]
pub struct CScan;

impl SchedulingPolicy for CScan {
    fn key(&self) -> PolicyKey {
        PolicyKey::CScan
    }

    fn schedule(&self, workload: &Workload) -> SchedulingResult {
        let direction = workload.direction;
        let path = sweep_path(workload);
        let mut trace = Trace::new(workload.head, path.len());
        trace.walk(&path, |from, to| {
            if Direction::of_hop(from, to) == Some(direction.reversed()) {
                format!("C-SCAN: Jumping to {to} (Wrap Around)")
            } else {
                format!("C-SCAN: Moving {direction} to {to}")
            }
        });
        trace.finish(workload.request_count())
    }
}

fn sweep_path(workload: &Workload) -> Vec<(Track, HopKind)> {
    let (left, right) = workload.partition();
    let limit = workload.track_limit;
    let mut path = Vec::with_capacity(left.len() + right.len() + 2);

    match workload.direction {
        Direction::Left => {
            path.extend(service(left.into_iter().rev()));
            if !right.is_empty() {
                if path.last().is_none_or(|&(t, _)| t != Track::ZERO) {
                    path.push((Track::ZERO, HopKind::Boundary));
                }
                path.push((limit, HopKind::Wrap));
                path.extend(service(right.into_iter().rev()));
            }
        }
        Direction::Right => {
            path.extend(service(right));
            if !left.is_empty() {
                if path.last().is_none_or(|&(t, _)| t != limit) {
                    path.push((limit, HopKind::Boundary));
                }
                path.push((Track::ZERO, HopKind::Wrap));
                path.extend(service(left));
            }
        }
    }
    path
}
