//! Mid-run replanning when new requests arrive.
//!
//! # Splice strategy
//!
//! ```text
//! played prefix          fresh suffix
//! steps[..played]   ++   policy.schedule(Workload {
//!                            head:  position after `played` hops,
//!                            queue: pending requests ++ arrivals,
//!                            ..
//!                        }).steps
//! ```
//!
//! The prefix is copied verbatim, so `sequence[..=played]` of the new result
//! equals that of the old one and nothing already shown is skipped or
//! repeated.  Pending requests come from the old plan's unplayed steps (see
//! [`SchedulingResult::pending_after`]), in the order the old plan would
//! have served them; arrivals go last.  For SSTF this keeps tie-breaks
//! consistent with the old plan.
//!
//! SCAN resumes in the direction of the last played hop, since it may
//! already have reversed.  C-SCAN never reverses, so it keeps the configured
//! direction, as do FCFS and SSTF (which ignore it).
//!
//! # Exhausted policies
//!
//! Playback runs until the longest sequence ends, so `played` can exceed a
//! policy's own last index.  Frames past that index already showed the head
//! resting on its last track.  If the fresh suffix has any hops, the gap is
//! filled with [`HopKind::Hold`] steps at that track, so the first new hop
//! lands at `played + 1` and no shown frame changes.

use ds_core::{HopKind, SchedulingResult, Step, Track, Workload};

use crate::PolicyKey;

/// Replan `current` after `played` hops with `arrivals` added to the pending
/// requests.
///
/// `live` is the workload as it stands now, queue included, and supplies the
/// direction, track limit and request count of the new result.
pub fn replan(
    policy:   PolicyKey,
    current:  &SchedulingResult,
    played:   usize,
    arrivals: &[Track],
    live:     &Workload,
) -> SchedulingResult {
    let held = played.saturating_sub(current.last_index());
    let played = played.min(current.last_index());

    let mut queue = current.pending_after(played);
    queue.extend(arrivals.iter().map(|&t| t.min(live.track_limit)));

    let direction = match policy {
        PolicyKey::Scan => current.heading_at(played).unwrap_or(live.direction),
        _               => live.direction,
    };

    let remainder = Workload {
        head: current.position_at(played),
        queue,
        direction,
        track_limit: live.track_limit,
    };
    let suffix = policy.policy().schedule(&remainder);

    let mut steps = current.steps[..played].to_vec();
    let mut absorbed_at_head = current.absorbed_at_head;
    // Requests that coincide with the split position are served there.
    match steps.last_mut() {
        Some(last) => last.serviced += suffix.absorbed_at_head,
        None       => absorbed_at_head += suffix.absorbed_at_head,
    }
    if !suffix.steps.is_empty() {
        let at = remainder.head;
        steps.extend((0..held).map(|_| Step::new(at, at, HopKind::Hold, format!("Waiting at {at}"))));
    }
    steps.extend(suffix.steps);

    SchedulingResult::from_steps(current.head(), steps, absorbed_at_head, live.request_count())
}
