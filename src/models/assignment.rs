//! Committed section placements.
//!
//! An assignment records that a section will meet in a classroom during
//! a day/hour window. The assignment set is the rescheduling output that
//! preview and report collaborators consume.

use serde::{Deserialize, Serialize};

use super::{Hour, HourRange, Weekday};

/// A section placed in a classroom for one weekly window.
///
/// Unique by `(day, start_hour, section_key)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Meeting day.
    pub day: Weekday,
    /// Start hour (inclusive).
    pub start_hour: Hour,
    /// End hour (exclusive).
    pub end_hour: Hour,
    /// Placed section.
    pub section_key: String,
    /// Classroom used.
    pub classroom: String,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        day: Weekday,
        start_hour: Hour,
        end_hour: Hour,
        section_key: impl Into<String>,
        classroom: impl Into<String>,
    ) -> Self {
        Self {
            day,
            start_hour,
            end_hour,
            section_key: section_key.into(),
            classroom: classroom.into(),
        }
    }

    /// The occupied hour range.
    #[inline]
    pub fn range(&self) -> HourRange {
        HourRange::new(self.start_hour, self.end_hour)
    }

    /// Duration in hours.
    #[inline]
    pub fn duration(&self) -> Hour {
        self.range().duration()
    }

    /// Whether this assignment has the given identity.
    #[inline]
    pub fn matches(&self, day: Weekday, start_hour: Hour, section_key: &str) -> bool {
        self.day == day && self.start_hour == start_hour && self.section_key == section_key
    }
}

/// Ordered set of committed assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSet {
    assignments: Vec<Assignment>,
}

impl AssignmentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment. Returns `false` (and leaves the set unchanged)
    /// if one with the same identity already exists.
    pub fn insert(&mut self, assignment: Assignment) -> bool {
        if self.find(assignment.day, assignment.start_hour, &assignment.section_key).is_some() {
            return false;
        }
        self.assignments.push(assignment);
        true
    }

    /// Removes and returns the assignment with the given identity.
    pub fn remove(&mut self, day: Weekday, start_hour: Hour, section_key: &str) -> Option<Assignment> {
        let idx = self
            .assignments
            .iter()
            .position(|a| a.matches(day, start_hour, section_key))?;
        Some(self.assignments.remove(idx))
    }

    /// Removes every assignment of a section; returns how many were removed.
    pub fn remove_section(&mut self, section_key: &str) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|a| a.section_key != section_key);
        before - self.assignments.len()
    }

    /// Finds the assignment with the given identity.
    pub fn find(&self, day: Weekday, start_hour: Hour, section_key: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.matches(day, start_hour, section_key))
    }

    pub(crate) fn find_mut(
        &mut self,
        day: Weekday,
        start_hour: Hour,
        section_key: &str,
    ) -> Option<&mut Assignment> {
        self.assignments
            .iter_mut()
            .find(|a| a.matches(day, start_hour, section_key))
    }

    /// All assignments of a section.
    pub fn for_section(&self, section_key: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.section_key == section_key)
            .collect()
    }

    /// All assignments using a classroom.
    pub fn for_classroom(&self, classroom: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.classroom.eq_ignore_ascii_case(classroom))
            .collect()
    }

    /// Assignments on `day` whose room is `classroom` and whose window
    /// overlaps `range`.
    pub fn overlapping(&self, day: Weekday, range: HourRange, classroom: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| {
                a.day == day && a.classroom.eq_ignore_ascii_case(classroom) && a.range().overlaps(&range)
            })
            .collect()
    }

    /// Number of assignments of a section.
    pub fn count_for_section(&self, section_key: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.section_key == section_key)
            .count()
    }

    /// Iterates assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    /// Assignments as a slice.
    pub fn as_slice(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Removes all assignments.
    pub fn clear(&mut self) {
        self.assignments.clear();
    }
}
