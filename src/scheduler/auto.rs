//! Greedy auto-assignment.
//!
//! # Algorithm
//!
//! 1. Clear the session's assignments.
//! 2. Rank every candidate window once (see [`super::ranking`]).
//! 3. For each section in the given order, walk the ranked windows and
//!    take a window when:
//!    - the section has no assignment that day yet
//!    - the section is eligible for the window
//!    - the window is at least `hours_per_session` long
//!    - some room of the window is unclaimed for `(day, start)` in this
//!      run and passes [`PlacementValidator`](crate::validation::PlacementValidator)
//! 4. Stop a section once it has `times_per_week` assignments.
//!
//! Single pass, no backtracking: an earlier section keeps a room even if
//! a later section then goes without.
//!
//! # Complexity
//! O(s * w * r) where s=sections, w=windows, r=rooms per window.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ranking::rank_windows;
use crate::models::{Assignment, Hour, SectionSettings, Weekday};
use crate::search::SearchOutcome;
use crate::session::RescheduleSession;

/// Warning emitted when the search produced no windows.
pub const NO_SLOTS_WARNING: &str = "No available slots found";

/// A section that did not reach its weekly frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unassigned {
    pub section_key: String,
    pub code: String,
    /// Assignments made.
    pub assigned: u32,
    /// `times_per_week` of the section.
    pub required: u32,
}

impl fmt::Display for Unassigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.code, self.assigned, self.required)
    }
}

/// Result of one auto-assignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoAssignOutcome {
    /// Assignments made, in allocation order.
    pub assignments: Vec<Assignment>,
    /// Under-served sections.
    pub unassigned: Vec<Unassigned>,
    pub warnings: Vec<String>,
}

impl AutoAssignOutcome {
    /// Whether every section reached its weekly frequency.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }
}

struct SectionPlan {
    key: String,
    code: String,
    settings: SectionSettings,
}

/// Greedy distributor of candidate windows.
///
/// # Example
///
/// ```
/// use u_reschedule::models::{OccupancyModel, Section, SectionCatalog, Weekday};
/// use u_reschedule::search::SearchRequest;
/// use u_reschedule::session::RescheduleSession;
///
/// let catalog = SectionCatalog::from_sections(vec![
///     Section::new("CIGD3212", "01")
///         .with_instructor("Dr. A")
///         .with_meeting(Weekday::Mon, 9, 11, "R101"),
/// ]);
/// let occupancy = OccupancyModel::from_catalog(&catalog);
/// let mut session = RescheduleSession::new(catalog, occupancy);
/// session.add_section("CIGD3212-01", None);
///
/// let request = SearchRequest::new(vec![Weekday::Mon, Weekday::Tue], 2);
/// let search = session.search(&request).unwrap();
/// let outcome = session.auto_assign(&search);
///
/// assert!(outcome.is_complete());
/// assert_eq!(outcome.assignments.len(), 2);
/// assert_eq!(outcome.assignments[0].start_hour, 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutoAssigner;

impl AutoAssigner {
    pub fn new() -> Self {
        Self
    }

    /// Distributes the windows of `outcome` over the sections named in
    /// `order`, replacing every assignment of `session`.
    ///
    /// Keys unknown to the catalog are skipped. Sections outside the
    /// working set are never eligible and end up in `unassigned`.
    pub fn distribute(
        &self,
        session: &mut RescheduleSession,
        outcome: &SearchOutcome,
        order: &[String],
    ) -> AutoAssignOutcome {
        session.assignments_mut().clear();

        let mut plans = Vec::with_capacity(order.len());
        for key in order {
            let Some(code) = session.catalog().get(key).map(|s| s.code.clone()) else {
                log::warn!("auto-assign skipped unknown section {key}");
                continue;
            };
            let settings = session.settings(key);
            plans.push(SectionPlan {
                key: key.clone(),
                code,
                settings,
            });
        }

        let ranked = rank_windows(outcome, session.config());
        let mut result = AutoAssignOutcome::default();
        if ranked.is_empty() {
            result.warnings.push(NO_SLOTS_WARNING.to_string());
        }

        let validator = session.validator();
        let mut claimed: HashMap<(Weekday, Hour), HashSet<String>> = HashMap::new();
        for plan in &plans {
            let required = plan.settings.times_per_week;
            let hours = plan.settings.hours_per_session;
            let mut used_days = HashSet::new();
            let mut remaining = required;

            for window in &ranked {
                if remaining == 0 {
                    break;
                }
                let slot = window.slot;
                if used_days.contains(&slot.day)
                    || !slot.is_eligible(&plan.key)
                    || slot.duration() < hours
                {
                    continue;
                }

                let taken = claimed.entry((slot.day, slot.start_hour)).or_default();
                let room = slot.classrooms.iter().find(|room| {
                    !taken.contains(&room.to_uppercase())
                        && validator
                            .check(room, slot.day, slot.start_hour, hours, &plan.key)
                            .available
                });
                let Some(room) = room else {
                    continue;
                };

                taken.insert(room.to_uppercase());
                used_days.insert(slot.day);
                result.assignments.push(Assignment::new(
                    slot.day,
                    slot.start_hour,
                    slot.end_hour,
                    plan.key.as_str(),
                    room.as_str(),
                ));
                remaining -= 1;
            }

            if remaining > 0 {
                result.unassigned.push(Unassigned {
                    section_key: plan.key.clone(),
                    code: plan.code.clone(),
                    assigned: required - remaining,
                    required,
                });
            }
        }

        for assignment in &result.assignments {
            session.assignments_mut().insert(assignment.clone());
        }

        if !result.unassigned.is_empty() {
            let list: Vec<String> = result.unassigned.iter().map(ToString::to_string).collect();
            let warning = format!("Could not fully assign: {}", list.join(", "));
            log::warn!("{warning}");
            result.warnings.push(warning);
        }
        log::info!(
            "auto-assigned {} window(s) to {} section(s), {} under-served",
            result.assignments.len(),
            plans.len(),
            result.unassigned.len()
        );
        result
    }
}
