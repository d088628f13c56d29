//! Section rescheduling engine.
//!
//! Finds new weekly meeting times and classrooms for course sections
//! against a read-only occupancy snapshot, honouring per-group "do not
//! overlap with" course lists and treating the sections' own vacated
//! meetings as free.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Section`, `SectionCatalog`,
//!   `OccupancyModel`, `ConflictGroup`, `SectionSettings`, `Assignment`
//! - **`session`**: `RescheduleSession`, the context object owning the
//!   working set, conflict groups, pending moves and assignments
//! - **`search`**: Candidate window enumeration (`SlotSearch`)
//! - **`scheduler`**: Greedy auto-assignment (`AutoAssigner`)
//! - **`validation`**: The shared placement predicate and session audits
//! - **`config`**: TOML-loadable engine constants
//!
//! # Workflow
//!
//! 1. Build a `SectionCatalog` and an `OccupancyModel` from ingested data.
//! 2. Open a `RescheduleSession`; add sections and set avoid-lists.
//! 3. Toggle which original meetings are being vacated.
//! 4. `search`, then `auto_assign` or `commit_assignment` by hand.
//!
//! Sessions are single-threaded and own all of their state; separate
//! sessions never interfere.

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod search;
pub mod session;
pub mod validation;

pub use config::EngineConfig;
pub use error::{ConfigError, RescheduleError, RescheduleResult};
pub use session::RescheduleSession;
