//! `ds-policy` — the scheduling engine.
//!
//! Turns a head position and a request queue into an ordered visit sequence
//! with a per-hop step log and aggregate metrics.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`policy`]   | `SchedulingPolicy` trait, `PolicyKey` registry             |
//! | [`fcfs`]     | `Fcfs` — submission order                                  |
//! | [`sstf`]     | `Sstf` — nearest pending request first                     |
//! | [`scan`]     | `Scan` — elevator sweep with one reversal                  |
//! | [`cscan`]    | `CScan` — one-way sweep with a wraparound jump             |
//! | [`replan`]   | `replan` — splice a fresh plan onto a played prefix        |
//!
//! # Guarantees
//!
//! Every policy is a pure function of its [`Workload`]: no internal state, no
//! I/O, no panics for any input shape.  Identical inputs always yield
//! identical results, which is what lets the controller cache results and
//! replay runs.
//!
//! # Quick-start
//!
//! ```rust
//! use ds_core::{Direction, Track};
//! use ds_policy::{PolicyKey, compute};
//!
//! let r = compute(PolicyKey::Fcfs, 50, &[41, 34, 61, 87, 20], Direction::Right, 199);
//! assert_eq!(r.seek_count, 136);
//! assert_eq!(r.sequence[1], Track(41));
//! ```

pub mod cscan;
pub mod fcfs;
pub mod policy;
pub mod replan;
pub mod scan;
pub mod sstf;

mod trace;


pub use cscan::CScan;
pub use fcfs::Fcfs;
pub use policy::{PolicyKey, SchedulingPolicy};
pub use replan::replan;
pub use scan::Scan;
pub use sstf::Sstf;

use ds_core::{Direction, SchedulingResult, Workload};

/// Compute the visit order for `policy_key` from raw inputs.
///
/// Inputs are normalized first (see [`ds_core::workload`]): out-of-range
/// tracks are clamped into `[0, track_limit]` instead of being rejected.
pub fn compute(
    policy_key:  PolicyKey,
    head:        i64,
    queue:       &[i64],
    direction:   Direction,
    track_limit: i64,
) -> SchedulingResult {
    let workload = Workload::normalized(head, queue, direction, track_limit);
    policy_key.policy().schedule(&workload)
}

/// Compute each policy in `keys` for one workload, in the order given.
///
/// Pass [`PolicyKey::ALL`] for the full comparison.
pub fn compute_each(keys: &[PolicyKey], workload: &Workload) -> Vec<(PolicyKey, SchedulingResult)> {
    keys.iter()
        .map(|&key| (key, key.policy().schedule(workload)))
        .collect()
}
