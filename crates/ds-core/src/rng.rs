//! Pluggable request sources for random queue generation and dynamic
//! arrivals.
//!
//! # Determinism strategy
//!
//! Random tracks never come from a thread-local or OS-seeded generator.  The
//! controller owns a [`RequestSource`]; the default is [`SimRng`], a
//! `SmallRng` seeded from the run's configured seed, so the same seed always
//! produces the same queues and arrival tracks.  Tests swap in a
//! [`ScriptedSource`] to assert exact sequences.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Track;

// ── RequestSource ─────────────────────────────────────────────────────────────

/// Supplies track numbers for generated queues and dynamic arrivals.
///
/// # Contract
///
/// - Must return a track in `[0, limit]`.
/// - Must not block or perform I/O.
pub trait RequestSource: Send {
    /// Draw one track in `[0, limit]`.
    fn next_track(&mut self, limit: Track) -> Track;

    /// Draw `count` tracks in `[0, limit]`.
    fn fill(&mut self, count: usize, limit: Track) -> Vec<Track> {
        (0..count).map(|_| self.next_track(limit)).collect()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seeded uniform request source, the controller's default.
///
/// Single-threaded; the controller owns it behind `&mut self`.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }
}

impl RequestSource for SimRng {
    #[inline]
    fn next_track(&mut self, limit: Track) -> Track {
        Track(self.0.gen_range(0..=limit.0))
    }
}

// ── ScriptedSource ────────────────────────────────────────────────────────────

/// A source that replays a fixed list of tracks, cycling when exhausted.
///
/// Values above the requested limit are clamped to it.  An empty script
/// always yields track 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new(tracks: impl IntoIterator<Item = u32>) -> Self {
        Self { script: tracks.into_iter().collect() }
    }
}

impl RequestSource for ScriptedSource {
    fn next_track(&mut self, limit: Track) -> Track {
        let Some(next) = self.script.pop_front() else {
            return Track::ZERO;
        };
        self.script.push_back(next);
        Track(next.min(limit.0))
    }
}
