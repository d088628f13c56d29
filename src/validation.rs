//! Placement validation and session audits.
//!
//! [`PlacementValidator`] is the single predicate for "may this room be
//! used at this time right now". Auto-assignment, manual commits and
//! room filtering all call it, so there is exactly one notion of a room
//! conflict.
//!
//! The audit functions check a whole session after the fact:
//! - [`audit_assignments`]: one meeting per day per section, weekly
//!   frequency, no double-booked rooms
//! - [`check_session_integrity`]: the group partition and move-selection
//!   invariants
//!
//! Both collect every issue instead of stopping at the first.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{format_hour, Hour, HourRange, OccupancyModel, Weekday};
use crate::session::{FreedSlotSet, RescheduleSession};

/// An occupied hour that blocks a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConflict {
    /// Blocked hour.
    pub hour: Hour,
    /// Course code occupying the room.
    pub course_code: String,
    /// Section number occupying the room.
    pub section: String,
    /// Instructor of the occupying class.
    pub instructor: String,
}

impl fmt::Display for PlacementConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} sec {}",
            format_hour(self.hour),
            self.course_code,
            self.section
        )
    }
}

/// Result of checking one placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementCheck {
    /// Whether the room is free for the whole window.
    pub available: bool,
    /// First blocking hour, when unavailable.
    pub conflict: Option<PlacementConflict>,
}

impl PlacementCheck {
    fn free() -> Self {
        Self {
            available: true,
            conflict: None,
        }
    }

    fn blocked(conflict: PlacementConflict) -> Self {
        Self {
            available: false,
            conflict: Some(conflict),
        }
    }
}

/// Checks proposed room placements against live occupancy.
///
/// An occupied hour is a conflict unless that exact `(room, day, hour)`
/// is being vacated by a pending move.
#[derive(Debug, Clone, Copy)]
pub struct PlacementValidator<'a> {
    occupancy: &'a OccupancyModel,
    freed: &'a FreedSlotSet,
}

impl<'a> PlacementValidator<'a> {
    /// Creates a validator over an occupancy snapshot and freed slots.
    pub fn new(occupancy: &'a OccupancyModel, freed: &'a FreedSlotSet) -> Self {
        Self { occupancy, freed }
    }

    /// Checks `room` for `[start_hour, start_hour + duration)` on `day`.
    ///
    /// Stops at the first conflicting hour. Rooms without occupancy data
    /// are available.
    pub fn check(
        &self,
        room: &str,
        day: Weekday,
        start_hour: Hour,
        duration: Hour,
        section_key: &str,
    ) -> PlacementCheck {
        match self.blocking(room, day, HourRange::from_duration(start_hour, duration)).next() {
            Some(conflict) => {
                log::debug!(
                    "{room} blocked for {section_key} on {day} at {}",
                    format_hour(conflict.hour)
                );
                PlacementCheck::blocked(conflict)
            }
            None => PlacementCheck::free(),
        }
    }

    /// Every conflicting hour of the window, ascending.
    pub fn conflicts(
        &self,
        room: &str,
        day: Weekday,
        start_hour: Hour,
        duration: Hour,
    ) -> Vec<PlacementConflict> {
        self.blocking(room, day, HourRange::from_duration(start_hour, duration))
            .collect()
    }

    /// Whether `room` is occupied at `(day, hour)` once pending moves are
    /// taken into account.
    pub fn is_occupied(&self, room: &str, day: Weekday, hour: Hour) -> bool {
        self.occupancy.classroom_busy(room, day, hour) && !self.freed.frees_room(room, day, hour)
    }

    fn blocking<'b>(
        &'b self,
        room: &'b str,
        day: Weekday,
        range: HourRange,
    ) -> impl Iterator<Item = PlacementConflict> + 'b {
        range.hours().filter_map(move |hour| {
            let record = self.occupancy.classrooms.record(room, day, hour)?;
            if !record.busy || self.freed.frees_room(room, day, hour) {
                return None;
            }
            Some(PlacementConflict {
                hour,
                course_code: record.course_code.clone(),
                section: record.section.clone(),
                instructor: record.instructor.clone(),
            })
        })
    }
}

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A section has two assignments on the same day.
    DuplicateDay,
    /// A section has more assignments than its weekly frequency.
    OverAssigned,
    /// A section has fewer assignments than its weekly frequency.
    UnderAssigned,
    /// Two assignments share a room at overlapping times.
    DoubleBooked,
    /// A session invariant does not hold (see [`check_session_integrity`]).
    InvariantViolation,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Audits the committed assignments of a session.
///
/// Checks:
/// 1. No section meets twice on one day
/// 2. Every working-set section has exactly `times_per_week` assignments
/// 3. No two assignments use the same room at overlapping times
pub fn audit_assignments(session: &RescheduleSession) -> ValidationResult {
    let mut errors = Vec::new();
    let assignments = session.assignments();

    let mut days_by_section: HashMap<&str, HashSet<Weekday>> = HashMap::new();
    for a in assignments.iter() {
        if !days_by_section
            .entry(a.section_key.as_str())
            .or_default()
            .insert(a.day)
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDay,
                format!("{} is scheduled twice on {}", a.section_key, a.day),
            ));
        }
    }

    for section in session.working_sections() {
        let required = session.peek_settings(&section.key).times_per_week as usize;
        let assigned = assignments.count_for_section(&section.key);
        if assigned > required {
            errors.push(ValidationError::new(
                ValidationErrorKind::OverAssigned,
                format!(
                    "{} has {assigned} slots but only needs {required}",
                    section.key
                ),
            ));
        } else if assigned < required {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnderAssigned,
                format!("{} has {assigned} slots but needs {required}", section.key),
            ));
        }
    }

    let all = assignments.as_slice();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            if a.day == b.day
                && a.classroom.eq_ignore_ascii_case(&b.classroom)
                && a.range().overlaps(&b.range())
            {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DoubleBooked,
                    format!(
                        "{} is booked by both {} and {} on {}",
                        a.classroom, a.section_key, b.section_key, a.day
                    ),
                ));
            }
        }
    }

    finish(errors)
}

/// Checks the structural invariants of a session.
///
/// Checks:
/// 1. Every working-set section belongs to exactly one group
/// 2. Every group member is in the working set
/// 3. Every move selection belongs to a working-set section
pub fn check_session_integrity(session: &RescheduleSession) -> ValidationResult {
    let mut errors = Vec::new();

    let mut membership: HashMap<&str, usize> = HashMap::new();
    for group in session.groups() {
        for key in &group.members {
            *membership.entry(key.as_str()).or_insert(0) += 1;
            if !session.in_working_set(key) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvariantViolation,
                    format!("group {} lists {key}, which is not in the working set", group.id),
                ));
            }
        }
    }

    for section in session.working_sections() {
        match membership.get(section.key.as_str()).copied().unwrap_or(0) {
            1 => {}
            0 => errors.push(ValidationError::new(
                ValidationErrorKind::InvariantViolation,
                format!("{} is not in any group", section.key),
            )),
            n => errors.push(ValidationError::new(
                ValidationErrorKind::InvariantViolation,
                format!("{} is in {n} groups", section.key),
            )),
        }
    }

    let mut stale: Vec<&str> = session
        .move_selections()
        .map(|s| s.section_key.as_str())
        .filter(|key| !session.in_working_set(key))
        .collect();
    stale.dedup();
    for key in stale {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvariantViolation,
            format!("move selections remain for {key}, which left the working set"),
        ));
    }

    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Section, SectionCatalog};
    use crate::session::PendingMoveSet;

    fn catalog() -> SectionCatalog {
        SectionCatalog::from_sections(vec![
            Section::new("CIGD3212", "01")
                .with_instructor("Dr. A")
                .with_meeting(Weekday::Mon, 9, 11, "R101"),
            Section::new("MATH101", "01")
                .with_instructor("Dr. B")
                .with_meeting(Weekday::Mon, 13, 15, "R101"),
        ])
    }

    #[test]
    fn test_check_reports_first_conflict() {
        let catalog = catalog();
        let occupancy = OccupancyModel::from_catalog(&catalog);
        let freed = PendingMoveSet::new();
        let v = PlacementValidator::new(&occupancy, freed.freed());

        let check = v.check("R101", Weekday::Mon, 8, 3, "X-01");
        assert!(!check.available);
        let c = check.conflict.unwrap();
        assert_eq!(c.hour, 9);
        assert_eq!(c.course_code, "CIGD3212");
        assert_eq!(c.to_string(), "09:00: CIGD3212 sec 01");

        assert!(v.check("R101", Weekday::Mon, 11, 2, "X-01").available);
        assert!(v.check("R101", Weekday::Tue, 9, 2, "X-01").available);
    }

    #[test]
    fn test_freed_hours_are_not_conflicts() {
        let catalog = catalog();
        let occupancy = OccupancyModel::from_catalog(&catalog);
        let mut pending = PendingMoveSet::new();
        pending.seed(catalog.get("CIGD3212-01").unwrap());
        let v = PlacementValidator::new(&occupancy, pending.freed());

        assert!(v.check("r101", Weekday::Mon, 9, 2, "CIGD3212-01").available);
        assert!(!v.is_occupied("R101", Weekday::Mon, 10));
        assert!(v.is_occupied("R101", Weekday::Mon, 13));
    }

    #[test]
    fn test_conflicts_collects_all_hours() {
        let catalog = catalog();
        let occupancy = OccupancyModel::from_catalog(&catalog);
        let freed = PendingMoveSet::new();
        let v = PlacementValidator::new(&occupancy, freed.freed());

        let all = v.conflicts("R101", Weekday::Mon, 9, 6);
        let hours: Vec<_> = all.iter().map(|c| c.hour).collect();
        assert_eq!(hours, vec![9, 10, 13, 14]);
        assert!(v.conflicts("R999", Weekday::Mon, 9, 6).is_empty());
    }

    #[test]
    fn test_audit_assignments() {
        let mut session = RescheduleSession::new(catalog(), OccupancyModel::new());
        session.add_section("CIGD3212-01", None);
        session.assignments_mut().insert(Assignment::new(Weekday::Mon, 8, 10, "CIGD3212-01", "R1"));
        session.assignments_mut().insert(Assignment::new(Weekday::Mon, 12, 14, "CIGD3212-01", "R1"));
        session.assignments_mut().insert(Assignment::new(Weekday::Tue, 8, 10, "CIGD3212-01", "R1"));
        session.assignments_mut().insert(Assignment::new(Weekday::Tue, 9, 11, "MATH101-01", "r1"));

        let errors = audit_assignments(&session).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
        assert!(kinds.contains(&ValidationErrorKind::DuplicateDay));
        assert!(kinds.contains(&ValidationErrorKind::OverAssigned));
        assert!(kinds.contains(&ValidationErrorKind::DoubleBooked));
    }

    #[test]
    fn test_audit_under_assigned() {
        let mut session = RescheduleSession::new(catalog(), OccupancyModel::new());
        session.add_section("MATH101-01", None);
        let errors = audit_assignments(&session).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnderAssigned);
        assert_eq!(errors[0].message, "MATH101-01 has 0 slots but needs 2");
    }

    #[test]
    fn test_integrity_holds_through_mutations() {
        let mut session = RescheduleSession::new(catalog(), OccupancyModel::new());
        let g1 = session.add_section("CIGD3212-01", None).unwrap();
        let g2 = session.create_group(Some("Electives"));
        session.add_section("MATH101-01", Some(&g2));
        session.move_section("MATH101-01", &g1).unwrap();
        assert!(check_session_integrity(&session).is_ok());

        session.remove_group(&g1);
        assert!(check_session_integrity(&session).is_ok());
        assert_eq!(session.working_sections().count(), 0);
        assert_eq!(session.move_selections().count(), 0);
    }

    #[test]
    fn test_integrity_reports_ungrouped_and_foreign_members() {
        let mut session = RescheduleSession::new(catalog(), OccupancyModel::new());
        let g = session.add_section("CIGD3212-01", None).unwrap();
        session.groups_mut().detach("CIGD3212-01");
        session.groups_mut().add_member(&g, "MATH101-01");

        let errors = check_session_integrity(&session).unwrap_err();
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvariantViolation));
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"CIGD3212-01 is not in any group"));
        assert!(messages
            .iter()
            .any(|m| m.contains("lists MATH101-01, which is not in the working set")));
    }

    #[test]
    fn test_integrity_reports_stale_move_selections() {
        let mut session = RescheduleSession::new(catalog(), OccupancyModel::new());
        session.add_section("CIGD3212-01", None).unwrap();
        let stray = catalog().get("MATH101-01").unwrap().clone();
        session.moves_mut().seed(&stray);

        let errors = check_session_integrity(&session).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvariantViolation);
        assert_eq!(
            errors[0].message,
            "move selections remain for MATH101-01, which left the working set"
        );
    }
}
