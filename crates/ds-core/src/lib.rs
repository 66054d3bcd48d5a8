//! `ds-core` — foundational types for the disk scheduling simulator.
//!
//! This crate is a dependency of every other `ds-*` crate.  It intentionally
//! has no `ds-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`track`]       | `Track`, `Direction`                                  |
//! | [`workload`]    | `Workload`, `DiskConfig`, `parse_queue`               |
//! | [`result`]      | `HopKind`, `Step`, `SchedulingResult`, `Progress`     |
//! | [`time`]        | `SimTime`, `SimClock`, `PlaybackConfig`               |
//! | [`rng`]         | `RequestSource`, `SimRng` (seeded), `ScriptedSource`  |
//! | [`error`]       | `DsError`, `DsResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod result;
pub mod rng;
pub mod time;
pub mod track;
pub mod workload;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{DsError, DsResult};
pub use result::{HopKind, Progress, SchedulingResult, Step};
pub use rng::{RequestSource, ScriptedSource, SimRng};
pub use time::{PlaybackConfig, SimClock, SimTime};
pub use track::{Direction, Track};
pub use workload::{DiskConfig, Workload, parse_queue};
