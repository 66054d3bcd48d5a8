//! `ds-sim` — playback controller for the disk scheduling simulator.
//!
//! # Event model
//!
//! ```text
//! host calls advance(elapsed_ms):
//!   while a live timer is due within the window (earliest first):
//!     Playback tick → current_step += 1, shared by all policies;
//!                     at the last step of the longest sequence → finished.
//!     Arrival tick  → draw a track, append it to the live queue, and
//!                     replan every policy from current_step
//!                     (played prefix kept verbatim).
//! ```
//!
//! The two timers are periodic and independent, but fire one at a time on
//! the caller's thread.  Cancelling a timer (pause, reset, finish, a speed
//! change, leaving dynamic mode) guarantees it never fires again.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`builder`]    | `ControllerBuilder`                                     |
//! | [`controller`] | `Controller` state machine and commands                 |
//! | [`timer`]      | `TimerQueue`, cancellable `TimerHandle`                 |
//! | [`cache`]      | `ResultCache` keyed by policy and workload              |
//! | [`snapshot`]   | `PlaybackState`, `Snapshot`, per-policy `Frame`         |
//! | [`preset`]     | `QueuePreset`, configuration bounds                     |
//! | [`observer`]   | `ControllerObserver`, `NoopObserver`                    |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Computes the four policies on Rayon's thread pool.     |
//! | `fx-hash`  | FxHash instead of SipHash for the result cache.        |
//! | `serde`    | `Serialize`/`Deserialize` on snapshots and presets.    |
//!
//! # Quick-start
//!
//! ```rust
//! use ds_core::DiskConfig;
//! use ds_sim::{ControllerBuilder, NoopObserver, PlaybackState};
//!
//! let mut ctl = ControllerBuilder::new(DiskConfig::default()).build().unwrap();
//! ctl.play();
//! ctl.advance(60_000, &mut NoopObserver);
//! assert_eq!(ctl.state(), PlaybackState::Finished);
//! assert!(ctl.winner().is_some());
//! ```

pub mod builder;
pub mod cache;
pub mod controller;
pub mod error;
pub mod observer;
pub mod preset;
pub mod snapshot;
pub mod timer;

#[cfg(test)]
mod tests;

pub use builder::ControllerBuilder;
pub use cache::ResultCache;
pub use controller::Controller;
pub use error::{SimError, SimResult};
pub use observer::{ControllerObserver, NoopObserver};
pub use preset::{MAX_QUEUE_LEN, MAX_TRACK_LIMIT, QueuePreset};
pub use snapshot::{Frame, PlaybackState, Snapshot};
pub use timer::{TimerHandle, TimerKind, TimerQueue};
