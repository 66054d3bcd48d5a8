//! Controller observer trait for render collaborators and progress reporting.

use ds_core::{SimTime, Track};
use ds_policy::PolicyKey;

/// Callbacks invoked by [`Controller::advance`][crate::Controller::advance]
/// as timers fire.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Manual commands (`step`, `reset`, …) do not
/// call the observer: the caller already knows what it asked for.
///
/// # Example — arrival toast
///
/// ```rust,ignore
/// struct Toasts(Vec<Track>);
///
/// impl ControllerObserver for Toasts {
///     fn on_arrival(&mut self, track: Track, _at: SimTime) {
///         self.0.push(track);
///     }
/// }
/// ```
pub trait ControllerObserver {
    /// Called after the playback timer advanced the shared step index.
    fn on_step(&mut self, _step: usize, _at: SimTime) {}

    /// Called after a dynamic arrival was appended and all policies were
    /// replanned.
    fn on_arrival(&mut self, _track: Track, _at: SimTime) {}

    /// Called once when playback reaches the end of the longest sequence.
    fn on_finished(&mut self, _step: usize, _winner: Option<PolicyKey>) {}
}

/// A [`ControllerObserver`] that does nothing.  Use when you need to call
/// `advance` but don't want callbacks.
pub struct NoopObserver;

impl ControllerObserver for NoopObserver {}
