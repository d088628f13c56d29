//! Weekly time grid: days and whole-hour intervals.
//!
//! The grid is a fixed set of working weekdays, each split into whole
//! hours. A meeting or candidate window always starts and ends on an
//! hour boundary.
//!
//! # Precedence
//! Ranges are half-open: `[start, end)`. A 09:00–11:00 meeting occupies
//! hours 9 and 10, and touches (but does not overlap) an 11:00 meeting.

use serde::{Deserialize, Serialize};

pub use chrono::Weekday;

/// Hour of day (0..=23).
pub type Hour = u8;

/// A whole-hour interval `[start, end)` on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HourRange {
    /// First occupied hour (inclusive).
    pub start: Hour,
    /// End hour (exclusive).
    pub end: Hour,
}

impl HourRange {
    /// Creates a new range.
    pub fn new(start: Hour, end: Hour) -> Self {
        Self { start, end }
    }

    /// Creates a range from a start hour and a duration in hours.
    pub fn from_duration(start: Hour, duration: Hour) -> Self {
        Self {
            start,
            end: start.saturating_add(duration),
        }
    }

    /// Length in hours (0 for empty or inverted ranges).
    #[inline]
    pub fn duration(&self) -> Hour {
        self.end.saturating_sub(self.start)
    }

    /// Whether `hour` falls within this range.
    #[inline]
    pub fn contains(&self, hour: Hour) -> bool {
        hour >= self.start && hour < self.end
    }

    /// Whether two ranges share at least one hour.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Iterates the occupied hours.
    pub fn hours(&self) -> impl Iterator<Item = Hour> {
        self.start..self.end
    }

    /// Formats as `"HH:00-HH:00"`.
    pub fn label(&self) -> String {
        format!("{}-{}", format_hour(self.start), format_hour(self.end))
    }
}

/// Formats an hour as `"HH:00"`.
pub fn format_hour(hour: Hour) -> String {
    format!("{hour:02}:00")
}

/// Parses `"HH:MM"` (or a bare `"HH"`) into its hour component.
///
/// Minutes are discarded; the grid is hourly.
pub fn parse_hour(text: &str) -> Option<Hour> {
    let head = text.trim().split(':').next()?;
    let hour: Hour = head.trim().parse().ok()?;
    (hour < 24).then_some(hour)
}
