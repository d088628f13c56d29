//! Per-section frequency settings.

use serde::{Deserialize, Serialize};

/// How often and how long a section must meet each week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSettings {
    /// Required meetings per week (≥ 1).
    pub times_per_week: u32,
    /// Required hours per meeting (≥ 1).
    pub hours_per_session: u8,
}

impl SectionSettings {
    /// Creates settings. Returns `None` if either value is zero.
    pub fn new(times_per_week: u32, hours_per_session: u8) -> Option<Self> {
        (times_per_week >= 1 && hours_per_session >= 1).then_some(Self {
            times_per_week,
            hours_per_session,
        })
    }
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self {
            times_per_week: 2,
            hours_per_session: 2,
        }
    }
}
