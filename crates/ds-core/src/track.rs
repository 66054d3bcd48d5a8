//! Track addresses and sweep direction.
//!
//! A `Track` is a strongly typed wrapper around the integer address the head
//! can seek to.  It is `Copy + Ord + Hash` so it can be sorted, compared and
//! used as a map key without ceremony.  The inner integer is `pub` for
//! arithmetic; prefer [`Track::distance_to`] for seek distances.

use std::fmt;
use std::str::FromStr;

use crate::{DsError, DsResult};

// ── Track ─────────────────────────────────────────────────────────────────────

/// Integer address of a unit of storage on the simulated disk.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Track(pub u32);

impl Track {
    /// The innermost track.  Always addressable.
    pub const ZERO: Track = Track(0);

    /// Absolute seek distance between `self` and `other`.
    #[inline]
    pub fn distance_to(self, other: Track) -> u32 {
        self.0.abs_diff(other.0)
    }

    /// Clamp a raw signed value into `[0, limit]`.
    #[inline]
    pub fn clamped(raw: i64, limit: Track) -> Track {
        Track(raw.clamp(0, limit.0 as i64) as u32)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Track {
    #[inline(always)]
    fn from(n: u32) -> Track {
        Track(n)
    }
}

impl From<Track> for u32 {
    #[inline(always)]
    fn from(t: Track) -> u32 {
        t.0
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Initial sweep direction for SCAN and C-SCAN.  FCFS and SSTF ignore it.
///
/// `Left` moves toward track 0, `Right` toward the track limit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Direction of travel from `from` to `to`, or `None` for a zero-length hop.
    #[inline]
    pub fn of_hop(from: Track, to: Track) -> Option<Direction> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Right),
            std::cmp::Ordering::Less    => Some(Direction::Left),
            std::cmp::Ordering::Equal   => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left  => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DsError;

    fn from_str(s: &str) -> DsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l"  => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(DsError::Parse(format!("unknown direction {other:?}"))),
        }
    }
}
