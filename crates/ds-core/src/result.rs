//! Engine output: per-hop step log and aggregate metrics.
//!
//! # Invariants
//!
//! Every `SchedulingResult` is built through [`SchedulingResult::from_steps`],
//! which derives the visit sequence and all metrics from the step log, so the
//! following always hold:
//!
//! ```text
//! sequence.len()  == steps.len() + 1
//! sequence[0]     == head at computation time
//! sequence[i + 1] == steps[i].to
//! seek_count      == Σ steps[i].distance
//! ```
//!
//! Results are immutable once built.  A recomputation produces a fresh value
//! that replaces the old one wholesale.

use crate::{Direction, Track};

// ── Step ──────────────────────────────────────────────────────────────────────

/// Why the head made a hop.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HopKind {
    /// Travel to a queued request.
    Service,
    /// Travel to the edge of the disk to turn around (SCAN) or to reach the
    /// wrap point (C-SCAN).
    Boundary,
    /// The C-SCAN relocation from one edge to the other.  No request is
    /// served on the way.
    Wrap,
    /// Zero-length placeholder while a policy that had run out of hops waits
    /// for playback to catch up before serving a new arrival.
    Hold,
}

/// One hop in the visit order: the transition `sequence[i] → sequence[i+1]`.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub from:        Track,
    pub to:          Track,
    /// `|to - from|`.
    pub distance:    u32,
    pub explanation: String,
    pub kind:        HopKind,
    /// Queued requests satisfied on arrival at `to`.  Usually 1 for a
    /// `Service` hop and 0 otherwise; more when duplicate requests coincide
    /// and are absorbed without a zero-length hop.
    pub serviced:    u32,
}

impl Step {
    pub fn new(from: Track, to: Track, kind: HopKind, explanation: String) -> Self {
        Self {
            from,
            to,
            distance: from.distance_to(to),
            explanation,
            kind,
            serviced: u32::from(kind == HopKind::Service),
        }
    }
}

// ── SchedulingResult ──────────────────────────────────────────────────────────

/// The ordered visit sequence produced by one policy for one workload.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulingResult {
    /// `[head, visited tracks in order...]`.
    pub sequence:         Vec<Track>,
    pub seek_count:       u64,
    /// `seek_count / request_count`, or 0.
    pub avg_seek:         f64,
    /// `request_count / seek_count`, or 0.
    pub throughput:       f64,
    pub steps:            Vec<Step>,
    /// Number of requests the metrics divide by (the queue length the result
    /// was computed for).
    pub request_count:    usize,
    /// Requests equal to the starting head that were satisfied before the
    /// first hop.
    pub absorbed_at_head: u32,
}

impl SchedulingResult {
    /// The result for an empty queue: `sequence = [head]`, no steps, all
    /// metrics zero.
    pub fn empty(head: Track) -> Self {
        Self::from_steps(head, Vec::new(), 0, 0)
    }

    /// Derive the sequence and metrics from a step log.
    ///
    /// `steps` must be contiguous (`steps[i].to == steps[i + 1].from`) and
    /// start at `head`; the engine's trace builder guarantees this.
    pub fn from_steps(
        head:             Track,
        steps:            Vec<Step>,
        absorbed_at_head: u32,
        request_count:    usize,
    ) -> Self {
        debug_assert!(
            steps.windows(2).all(|w| w[0].to == w[1].from),
            "step log is not contiguous"
        );
        debug_assert!(steps.first().is_none_or(|s| s.from == head));

        let mut sequence = Vec::with_capacity(steps.len() + 1);
        sequence.push(head);
        sequence.extend(steps.iter().map(|s| s.to));

        let seek_count: u64 = steps.iter().map(|s| s.distance as u64).sum();
        let (avg_seek, throughput) = rates(seek_count, request_count);

        Self {
            sequence,
            seek_count,
            avg_seek,
            throughput,
            steps,
            request_count,
            absorbed_at_head,
        }
    }

    /// Head position where the result starts.
    #[inline]
    pub fn head(&self) -> Track {
        self.sequence[0]
    }

    /// Index of the last entry in `sequence` (equal to `steps.len()`).
    #[inline]
    pub fn last_index(&self) -> usize {
        self.steps.len()
    }

    /// Head position after `step` hops, clamped to this result's length.
    pub fn position_at(&self, step: usize) -> Track {
        self.sequence[step.min(self.last_index())]
    }

    /// Explanation of the hop that ended at playback position `step`.
    ///
    /// `None` at position 0 and past the end of this result.
    pub fn explanation_at(&self, step: usize) -> Option<&str> {
        step.checked_sub(1)
            .and_then(|i| self.steps.get(i))
            .map(|s| s.explanation.as_str())
    }

    /// Running metrics after `step` hops have been played.
    pub fn progress(&self, step: usize) -> Progress {
        let played = step.min(self.last_index());
        let seek_so_far: u64 = self.steps[..played].iter().map(|s| s.distance as u64).sum();
        let avg_seek = if played > 0 { seek_so_far as f64 / played as f64 } else { 0.0 };
        let throughput = if seek_so_far > 0 { played as f64 / seek_so_far as f64 } else { 0.0 };
        Progress { step: played, seek_so_far, avg_seek, throughput }
    }

    /// Requests still waiting after `played` hops, in planned service order.
    ///
    /// Coincident duplicates are repeated according to `Step::serviced`.
    pub fn pending_after(&self, played: usize) -> Vec<Track> {
        let played = played.min(self.last_index());
        self.steps[played..]
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.to, s.serviced as usize))
            .collect()
    }

    /// Direction of the most recent non-zero hop within the first `played`
    /// hops, if any.
    pub fn heading_at(&self, played: usize) -> Option<Direction> {
        let played = played.min(self.last_index());
        self.steps[..played]
            .iter()
            .rev()
            .find_map(|s| Direction::of_hop(s.from, s.to))
    }
}

fn rates(seek_count: u64, request_count: usize) -> (f64, f64) {
    if seek_count == 0 || request_count == 0 {
        return (0.0, 0.0);
    }
    (
        seek_count as f64 / request_count as f64,
        request_count as f64 / seek_count as f64,
    )
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Metrics for a partially played result.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    /// Hops played (clamped to the result's own length).
    pub step:        usize,
    pub seek_so_far: u64,
    /// Average distance per played hop.
    pub avg_seek:    f64,
    /// Played hops per track travelled.
    pub throughput:  f64,
}
