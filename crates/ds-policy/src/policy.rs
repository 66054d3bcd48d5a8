//! The `SchedulingPolicy` trait and the policy registry.

use std::fmt;
use std::str::FromStr;

use ds_core::{DsError, DsResult, SchedulingResult, Workload};

use crate::{CScan, Fcfs, Scan, Sstf};

/// A disk-scheduling policy.
///
/// # Contract
///
/// - Pure: the result depends only on `workload`.
/// - Total: never panics, whatever the workload (including an empty queue
///   and a zero track limit).
/// - Every hop stays within `[0, workload.track_limit]`.
///
/// Implementations are stateless unit structs, so they are trivially
/// `Send + Sync` and may be called from several threads at once.
pub trait SchedulingPolicy: Send + Sync + fmt::Debug {
    /// Registry key of this policy.
    fn key(&self) -> PolicyKey;

    /// Produce the visit order for `workload`.
    fn schedule(&self, workload: &Workload) -> SchedulingResult;

    /// Display name, e.g. `"C-SCAN"`.
    fn name(&self) -> &'static str {
        self.key().name()
    }
}

// ── PolicyKey ─────────────────────────────────────────────────────────────────

/// Identifies one of the four built-in policies.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PolicyKey {
    /// First-Come-First-Served
    Fcfs,
    /// Shortest-Seek-Time-First
    Sstf,
    /// SCAN (elevator)
    Scan,
    /// Circular SCAN
    CScan,
}

impl PolicyKey {
    /// All policies in presentation order.  Also the order used to break ties
    /// when picking a winner.
    pub const ALL: [PolicyKey; 4] = [PolicyKey::Fcfs, PolicyKey::Sstf, PolicyKey::Scan, PolicyKey::CScan];

    /// The stateless implementation behind this key.
    pub fn policy(self) -> &'static dyn SchedulingPolicy {
        match self {
            PolicyKey::Fcfs  => &Fcfs,
            PolicyKey::Sstf  => &Sstf,
            PolicyKey::Scan  => &Scan,
            PolicyKey::CScan => &CScan,
        }
    }

    /// Machine-friendly key (`"fcfs"`, `"sstf"`, `"scan"`, `"cscan"`).
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKey::Fcfs  => "fcfs",
            PolicyKey::Sstf  => "sstf",
            PolicyKey::Scan  => "scan",
            PolicyKey::CScan => "cscan",
        }
    }

    /// Human-friendly name.
    pub fn name(self) -> &'static str {
        match self {
            PolicyKey::Fcfs  => "FCFS",
            PolicyKey::Sstf  => "SSTF",
            PolicyKey::Scan  => "SCAN",
            PolicyKey::CScan => "C-SCAN",
        }
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKey {
    type Err = DsError;

    fn from_str(s: &str) -> DsResult<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "fcfs"  => Ok(PolicyKey::Fcfs),
            "sstf"  => Ok(PolicyKey::Sstf),
            "scan"  => Ok(PolicyKey::Scan),
            "cscan" => Ok(PolicyKey::CScan),
            other => Err(DsError::Parse(format!("unknown policy {other:?}"))),
        }
    }
}
