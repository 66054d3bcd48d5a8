//! First-Come-First-Served.

use ds_core::{HopKind, SchedulingResult, Workload};

use crate::trace::Trace;
use crate::{PolicyKey, SchedulingPolicy};

/// Visits the queue in submission order, unmodified.
///
/// A request equal to the current position is still logged, as a
/// zero-distance hop.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fcfs;

impl SchedulingPolicy for Fcfs {
    fn key(&self) -> PolicyKey {
        PolicyKey::Fcfs
    }

    fn schedule(&self, workload: &Workload) -> SchedulingResult {
        let mut trace = Trace::new(workload.head, workload.queue.len());
        for &next in &workload.queue {
            let from = trace.current();
            let explanation = format!(
                "Moving from {from} to {next} (distance: {})",
                from.distance_to(next)
            );
            trace.hop(next, HopKind::Service, explanation);
        }
        trace.finish(workload.request_count())
    }
}
