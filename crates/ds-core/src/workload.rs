//! Scheduling inputs and their normalization.
//!
//! # Normalization policy
//!
//! The engine favours playback continuity over strict input checking.  Raw
//! values coming from configuration collaborators are *normalized*, never
//! rejected:
//!
//! - a negative track limit becomes 0;
//! - the head and every queued request are clamped into `[0, limit]`;
//! - unparseable entries in a textual queue become track 0.
//!
//! This means a single malformed entry degrades to a visit of a boundary
//! track instead of aborting the whole computation.  It is a presentation
//! choice, not a claim that the clamped value is what the operator meant.
//! Rejecting a track limit below 1 is the job of the configuration boundary
//! (`ds-sim`), not of this module.

use crate::{Direction, Track};

// ── DiskConfig ────────────────────────────────────────────────────────────────

/// Raw, operator-facing disk configuration.
///
/// Values are signed so that out-of-range input can reach the normalization
/// step intact.  Convert with [`DiskConfig::workload`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiskConfig {
    /// Starting track of the read/write head.
    pub head: i64,
    /// Pending requests in submission order.
    pub queue: Vec<i64>,
    /// Initial sweep direction for SCAN / C-SCAN.
    pub direction: Direction,
    /// Highest addressable track (inclusive).
    pub track_limit: i64,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            head:        50,
            queue:       vec![82, 170, 43, 140, 24, 16, 190],
            direction:   Direction::Right,
            track_limit: 199,
        }
    }
}

impl DiskConfig {
    /// Normalize into a [`Workload`] the engine can consume.
    pub fn workload(&self) -> Workload {
        Workload::normalized(self.head, &self.queue, self.direction, self.track_limit)
    }
}

// ── Workload ──────────────────────────────────────────────────────────────────

/// A normalized scheduling input: every track lies in `[0, track_limit]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Workload {
    pub head:        Track,
    pub queue:       Vec<Track>,
    pub direction:   Direction,
    pub track_limit: Track,
}

impl Workload {
    /// Build a workload from raw values, clamping as described in the module
    /// docs.  Never fails.
    pub fn normalized(head: i64, queue: &[i64], direction: Direction, track_limit: i64) -> Self {
        let limit = Track(track_limit.clamp(0, u32::MAX as i64) as u32);
        Self {
            head:        Track::clamped(head, limit),
            queue:       queue.iter().map(|&r| Track::clamped(r, limit)).collect(),
            direction,
            track_limit: limit,
        }
    }

    /// Number of queued requests (the divisor for average seek and
    /// throughput).
    #[inline]
    pub fn request_count(&self) -> usize {
        self.queue.len()
    }

    /// Requests strictly below the head and at-or-above the head, each sorted
    /// ascending.  The split used by SCAN and C-SCAN.
    pub fn partition(&self) -> (Vec<Track>, Vec<Track>) {
        let mut sorted = self.queue.clone();
        sorted.sort_unstable();
        let split = sorted.partition_point(|&r| r < self.head);
        let right = sorted.split_off(split);
        (sorted, right)
    }
}

// ── Textual queues ────────────────────────────────────────────────────────────

/// Parse a comma-separated request list such as `"98, 183, 37"`.
///
/// Blank entries are skipped.  Each entry is read up to its first non-digit
/// after an optional sign, so `"12.7"` and `"12abc"` both give 12; an entry
/// with no leading digits becomes `0`.  Range clamping happens later, in
/// [`Workload::normalized`].
pub fn parse_queue(text: &str) -> Vec<i64> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(leading_integer)
        .collect()
}

/// Integer value of the longest `[+-]?[0-9]+` prefix of `entry`, or 0.
/// Prefixes too large for `i64` saturate.
fn leading_integer(entry: &str) -> i64 {
    let (negative, rest) = match entry.as_bytes().first() {
        Some(b'-') => (true, &entry[1..]),
        Some(b'+') => (false, &entry[1..]),
        _          => (false, entry),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return 0;
    }
    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}
