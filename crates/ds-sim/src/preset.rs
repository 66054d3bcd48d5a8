//! Queue-length presets for random queue generation.

use std::fmt;

/// Largest queue the controller will generate.
pub const MAX_QUEUE_LEN: usize = 1_000;

/// Largest track limit accepted at the configuration boundary.
pub const MAX_TRACK_LIMIT: i64 = 9_999;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueuePreset {
    Short,
    Medium,
    Long,
    VeryLong,
    /// Any length in `1..=MAX_QUEUE_LEN`.
    Custom(usize),
}

impl QueuePreset {
    pub const FIXED: [QueuePreset; 4] = [
        QueuePreset::Short,
        QueuePreset::Medium,
        QueuePreset::Long,
        QueuePreset::VeryLong,
    ];

    /// Number of requests to generate.
    pub fn count(self) -> usize {
        match self {
            QueuePreset::Short     => 5,
            QueuePreset::Medium    => 10,
            QueuePreset::Long      => 20,
            QueuePreset::VeryLong  => 50,
            QueuePreset::Custom(n) => n,
        }
    }
}

impl fmt::Display for QueuePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueuePreset::Short     => write!(f, "Short ({})", self.count()),
            QueuePreset::Medium    => write!(f, "Medium ({})", self.count()),
            QueuePreset::Long      => write!(f, "Long ({})", self.count()),
            QueuePreset::VeryLong  => write!(f, "Very Long ({})", self.count()),
            QueuePreset::Custom(n) => write!(f, "Custom ({n})"),
        }
    }
}
