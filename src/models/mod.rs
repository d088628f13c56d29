//! Rescheduling domain models.
//!
//! Provides the data types shared by the search and assignment engines:
//! the weekly hour grid, the read-only occupancy snapshot and section
//! catalog, conflict groups, frequency settings, and committed
//! assignments.
//!
//! # Lifecycles
//!
//! | Type | Built | Mutated |
//! |------|-------|---------|
//! | `OccupancyModel`, `SectionCatalog` | once per upload | never |
//! | `ConflictGroup`, `SectionSettings` | interactively | until session reset |
//! | `Assignment` | by auto-assign or manual commit | until session reset |

mod assignment;
mod group;
mod occupancy;
mod section;
mod settings;
mod time;

pub use assignment::{Assignment, AssignmentSet};
pub use group::{normalize_codes, ConflictGroup, GroupId};
pub use occupancy::{
    BusyInstructor, OccupancyModel, OccupancyRecord, OccupancyTable, TABLE_FIRST_HOUR,
    TABLE_LAST_HOUR,
};
pub use section::{extract_course_code, section_key, Meeting, Section, SectionCatalog};
pub use settings::SectionSettings;
pub use time::{format_hour, parse_hour, Hour, HourRange, Weekday};
