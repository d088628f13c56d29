//! Error types.
//!
//! Most diagnostics in this crate are returned as data (unresolved codes,
//! unassigned sections, placement conflicts). The errors here cover
//! explicit mutations that name something missing or would break a
//! session invariant.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Hour, Weekday};
use crate::validation::PlacementConflict;

/// Result type for session operations.
pub type RescheduleResult<T> = Result<T, RescheduleError>;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`crate::EngineConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but its values are inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors from session mutations and manual assignment.
#[derive(Debug, Error)]
pub enum RescheduleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown section '{0}'")]
    UnknownSection(String),

    #[error("unknown conflict group '{0}'")]
    UnknownGroup(String),

    #[error("section '{0}' is not in the working set")]
    NotInWorkingSet(String),

    #[error("duration must be at least one hour")]
    InvalidDuration,

    #[error("invalid settings for '{key}': times per week and hours per session must be at least 1")]
    InvalidSettings { key: String },

    /// The room is occupied by timetable data that is not being vacated.
    #[error("{room} is occupied on {day} at {conflict}")]
    Conflict {
        room: String,
        day: Weekday,
        conflict: PlacementConflict,
    },

    /// Another committed assignment already uses the room in an
    /// overlapping window.
    #[error("{room} is already assigned to '{holder}' on {day} at {start_hour:02}:00")]
    RoomTaken {
        room: String,
        day: Weekday,
        start_hour: Hour,
        holder: String,
    },

    #[error("section '{key}' already meets on {day}")]
    DuplicateDay { key: String, day: Weekday },

    #[error("section '{key}' is already assigned on {day} at {start_hour:02}:00")]
    DuplicateAssignment {
        key: String,
        day: Weekday,
        start_hour: Hour,
    },

    #[error("no assignment of '{key}' on {day} at {start_hour:02}:00")]
    AssignmentNotFound {
        key: String,
        day: Weekday,
        start_hour: Hour,
    },
}
