//! Read-only view of the controller for render collaborators.

use std::collections::BTreeMap;
use std::fmt;

use ds_core::{Progress, SchedulingResult, SimTime, Track};
use ds_policy::PolicyKey;

/// Playback state machine.
///
/// ```text
/// idle ──play──▶ playing ──pause──▶ paused ──play──▶ playing
///                   │                  │
///                   └──last step──▶ finished ──play──▶ (reset) playing
///
/// reset: any state ──▶ idle
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    Finished,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaybackState::Idle     => "idle",
            PlaybackState::Playing  => "playing",
            PlaybackState::Paused   => "paused",
            PlaybackState::Finished => "finished",
        })
    }
}

/// Owned copy of everything a renderer needs for one frame.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub playback_state:     PlaybackState,
    /// Shared step index applied to every policy's sequence.
    pub current_step:       usize,
    /// Last index of the longest sequence; playback finishes there.
    pub max_step:           usize,
    pub results_by_policy:  BTreeMap<PolicyKey, SchedulingResult>,
    /// Most recent dynamic arrival, for transient UI feedback.
    pub last_arrived_track: Option<Track>,
    /// The live queue: the configured queue plus any arrivals.
    pub queue:              Vec<Track>,
    pub dynamic_mode:       bool,
    pub execution_speed:    f64,
    pub arrival_rate:       f64,
    pub now:                SimTime,
    /// Policy with the lowest total seek, once finished.
    pub winner:             Option<PolicyKey>,
}

/// One policy's state at the snapshot's step.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<'a> {
    pub policy:      PolicyKey,
    /// `sequence[..=step]`, clamped to the policy's own length.
    pub visited:     &'a [Track],
    pub position:    Track,
    /// Explanation of the hop that ended here; `None` at the start.
    pub explanation: Option<&'a str>,
    pub progress:    Progress,
    /// `true` once this policy has played all of its own hops.
    pub done:        bool,
}

impl Snapshot {
    /// Frame for `policy` at `current_step`.
    pub fn frame(&self, policy: PolicyKey) -> Option<Frame<'_>> {
        let result = self.results_by_policy.get(&policy)?;
        let step = self.current_step.min(result.last_index());
        Some(Frame {
            policy,
            visited:     &result.sequence[..=step],
            position:    result.position_at(step),
            explanation: result.explanation_at(step),
            progress:    result.progress(step),
            done:        step == result.last_index(),
        })
    }

    /// Frames for every policy, in [`PolicyKey::ALL`] order.
    pub fn frames(&self) -> impl Iterator<Item = Frame<'_>> {
        PolicyKey::ALL.into_iter().filter_map(|k| self.frame(k))
    }
}
