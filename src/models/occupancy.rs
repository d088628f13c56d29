//! Instructor and classroom occupancy.
//!
//! Two parallel tables record who or what is busy at each
//! `(weekday, hour)`: one keyed by instructor name, one by classroom
//! name. Both are built once per upload and never mutated by the
//! rescheduling engine; pending moves are overlaid on top of them
//! (see [`crate::session::FreedSlotSet`]).
//!
//! # Table range
//! Hours outside `[TABLE_FIRST_HOUR, TABLE_LAST_HOUR]` are not recorded.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{Hour, HourRange, SectionCatalog, Weekday};

/// First hour tracked by occupancy tables.
pub const TABLE_FIRST_HOUR: Hour = 6;
/// Last hour tracked by occupancy tables (inclusive).
pub const TABLE_LAST_HOUR: Hour = 20;

/// What occupies a subject (instructor or classroom) during one hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    /// Whether the subject is busy.
    pub busy: bool,
    /// Course code of the occupant.
    pub course_code: String,
    /// Section number of the occupant.
    pub section: String,
    /// Room used.
    pub room: String,
    /// Instructor teaching.
    pub instructor: String,
}

impl OccupancyRecord {
    /// Creates a busy record.
    pub fn busy(
        course_code: impl Into<String>,
        section: impl Into<String>,
        room: impl Into<String>,
        instructor: impl Into<String>,
    ) -> Self {
        Self {
            busy: true,
            course_code: course_code.into(),
            section: section.into(),
            room: room.into(),
            instructor: instructor.into(),
        }
    }
}

/// Occupancy of one family of subjects, keyed by subject name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupancyTable {
    subjects: BTreeMap<String, HashMap<Weekday, BTreeMap<Hour, OccupancyRecord>>>,
}

impl OccupancyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subject with no busy hours.
    pub fn add_subject(&mut self, subject: impl Into<String>) {
        self.subjects.entry(subject.into()).or_default();
    }

    /// Records a record for every hour of `range` on `day`.
    ///
    /// Hours outside the table range are skipped. A later record for the
    /// same hour replaces the earlier one.
    pub fn mark(
        &mut self,
        subject: impl Into<String>,
        day: Weekday,
        range: HourRange,
        record: OccupancyRecord,
    ) {
        let hours = self
            .subjects
            .entry(subject.into())
            .or_default()
            .entry(day)
            .or_default();
        for hour in range.hours() {
            if (TABLE_FIRST_HOUR..=TABLE_LAST_HOUR).contains(&hour) {
                hours.insert(hour, record.clone());
            }
        }
    }

    /// Exact name first, then a case-insensitive match.
    fn days_of(&self, subject: &str) -> Option<&HashMap<Weekday, BTreeMap<Hour, OccupancyRecord>>> {
        self.subjects.get(subject).or_else(|| {
            self.subjects
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(subject))
                .map(|(_, days)| days)
        })
    }

    /// The record at `(subject, day, hour)`, if any. Subject names match
    /// case-insensitively.
    pub fn record(&self, subject: &str, day: Weekday, hour: Hour) -> Option<&OccupancyRecord> {
        self.days_of(subject)?.get(&day)?.get(&hour)
    }

    /// Whether `subject` is busy at `(day, hour)`.
    pub fn is_busy(&self, subject: &str, day: Weekday, hour: Hour) -> bool {
        self.record(subject, day, hour).is_some_and(|r| r.busy)
    }

    /// Busy hours of `subject` on `day`, ascending.
    pub fn busy_hours(&self, subject: &str, day: Weekday) -> Vec<Hour> {
        self.days_of(subject)
            .and_then(|days| days.get(&day))
            .map(|hours| {
                hours
                    .iter()
                    .filter(|(_, r)| r.busy)
                    .map(|(&h, _)| h)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the subject is known to this table.
    pub fn contains(&self, subject: &str) -> bool {
        self.days_of(subject).is_some()
    }

    /// Subject names, sorted.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.keys().map(String::as_str)
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the table has no subjects.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// A busy instructor at a queried hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInstructor {
    /// Instructor name.
    pub name: String,
    /// Course being taught.
    pub course_code: String,
    /// Room used.
    pub room: String,
}

/// Snapshot of instructor and classroom occupancy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupancyModel {
    /// Instructor occupancy.
    pub instructors: OccupancyTable,
    /// Classroom occupancy.
    pub classrooms: OccupancyTable,
}

impl OccupancyModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives both tables from a catalog's current meetings.
    pub fn from_catalog(catalog: &SectionCatalog) -> Self {
        let mut model = Self::new();
        for section in catalog.iter() {
            for m in &section.meetings {
                let instructor = section.instructor_of(m);
                let record =
                    OccupancyRecord::busy(&section.code, &section.number, &m.room, instructor);
                if !instructor.is_empty() {
                    model
                        .instructors
                        .mark(instructor, m.day, m.range(), record.clone());
                }
                if !m.room.is_empty() {
                    model.classrooms.mark(&m.room, m.day, m.range(), record);
                }
            }
        }
        model
    }

    /// Whether `instructor` is busy at `(day, hour)`.
    pub fn instructor_busy(&self, instructor: &str, day: Weekday, hour: Hour) -> bool {
        self.instructors.is_busy(instructor, day, hour)
    }

    /// Whether `room` is occupied at `(day, hour)`.
    pub fn classroom_busy(&self, room: &str, day: Weekday, hour: Hour) -> bool {
        self.classrooms.is_busy(room, day, hour)
    }

    /// Instructors teaching at `(day, hour)`, sorted by name.
    pub fn busy_instructors_at(&self, day: Weekday, hour: Hour) -> Vec<BusyInstructor> {
        self.instructors
            .subjects()
            .filter_map(|name| {
                let r = self.instructors.record(name, day, hour)?;
                r.busy.then(|| BusyInstructor {
                    name: name.to_string(),
                    course_code: r.course_code.clone(),
                    room: r.room.clone(),
                })
            })
            .collect()
    }

    /// Instructors free for every hour of `range` on `day`, sorted.
    pub fn free_instructors_in_range(&self, day: Weekday, range: HourRange) -> Vec<String> {
        if range.duration() == 0 {
            return Vec::new();
        }
        self.instructors
            .subjects()
            .filter(|name| range.hours().all(|h| !self.instructors.is_busy(name, day, h)))
            .map(str::to_string)
            .collect()
    }

    /// Hours from `hours` at which every instructor is free.
    pub fn common_free_hours(&self, day: Weekday, hours: HourRange) -> Vec<Hour> {
        hours
            .hours()
            .filter(|&h| {
                self.instructors
                    .subjects()
                    .all(|name| !self.instructors.is_busy(name, day, h))
            })
            .collect()
    }

    /// Classroom utilization: occupied hours / (days × full hours).
    ///
    /// Returns `None` for an unknown room or a zero denominator.
    pub fn classroom_utilization(
        &self,
        room: &str,
        days: &[Weekday],
        full_hours: u32,
    ) -> Option<f64> {
        if !self.classrooms.contains(room) {
            return None;
        }
        let denominator = (days.len() as u32).saturating_mul(full_hours);
        if denominator == 0 {
            return None;
        }
        let occupied: usize = days
            .iter()
            .map(|&d| self.classrooms.busy_hours(room, d).len())
            .sum();
        Some(occupied as f64 / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    fn sample_model() -> OccupancyModel {
        let catalog = SectionCatalog::from_sections(vec![
            Section::new("CIGD3212", "01")
                .with_instructor("Dr. A")
                .with_meeting(Weekday::Mon, 9, 11, "R101"),
            Section::new("MATH101", "01")
                .with_instructor("Dr. B")
                .with_meeting(Weekday::Mon, 10, 12, "R102")
                .with_meeting(Weekday::Tue, 5, 7, "R102"),
        ]);
        OccupancyModel::from_catalog(&catalog)
    }

    #[test]
    fn test_from_catalog_marks_both_tables() {
        let m = sample_model();
        assert!(m.instructor_busy("Dr. A", Weekday::Mon, 9));
        assert!(m.instructor_busy("Dr. A", Weekday::Mon, 10));
        assert!(!m.instructor_busy("Dr. A", Weekday::Mon, 11));
        assert!(m.classroom_busy("R101", Weekday::Mon, 10));
        assert!(!m.classroom_busy("R101", Weekday::Tue, 10));

        let r = m.classrooms.record("R102", Weekday::Mon, 10).unwrap();
        assert_eq!(r.course_code, "MATH101");
        assert_eq!(r.section, "01");
        assert_eq!(r.instructor, "Dr. B");
    }

    #[test]
    fn test_hours_outside_table_range_ignored() {
        let m = sample_model();
        // Tue 05:00-07:00 → only 06:00 recorded
        assert_eq!(m.classrooms.busy_hours("R102", Weekday::Tue), vec![6]);
    }

    #[test]
    fn test_busy_instructors_at() {
        let m = sample_model();
        let busy = m.busy_instructors_at(Weekday::Mon, 10);
        let names: Vec<_> = busy.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. A", "Dr. B"]);
        assert_eq!(busy[1].room, "R102");
        assert!(m.busy_instructors_at(Weekday::Wed, 10).is_empty());
    }

    #[test]
    fn test_free_instructors_in_range() {
        let m = sample_model();
        assert_eq!(
            m.free_instructors_in_range(Weekday::Mon, HourRange::new(11, 13)),
            vec!["Dr. A".to_string()]
        );
        assert!(m
            .free_instructors_in_range(Weekday::Mon, HourRange::new(11, 11))
            .is_empty());
    }

    #[test]
    fn test_meeting_added_before_instructor_marks_instructor() {
        let catalog = SectionCatalog::from_sections(vec![Section::new("CIGD3212", "01")
            .with_meeting(Weekday::Mon, 9, 11, "R101")
            .with_instructor("Dr. A")]);
        let m = OccupancyModel::from_catalog(&catalog);
        assert!(m.instructor_busy("Dr. A", Weekday::Mon, 9));
        assert!(m.instructor_busy("Dr. A", Weekday::Mon, 10));
    }

    #[test]
    fn test_common_free_hours() {
        let m = sample_model();
        let free = m.common_free_hours(Weekday::Mon, HourRange::new(8, 13));
        assert_eq!(free, vec![8, 12]);
    }

    #[test]
    fn test_classroom_utilization() {
        let m = sample_model();
        let days = [Weekday::Mon, Weekday::Tue];
        let u = m.classroom_utilization("R101", &days, 8).unwrap();
        assert!((u - 2.0 / 16.0).abs() < 1e-10);
        assert!(m.classroom_utilization("R999", &days, 8).is_none());
        assert!(m.classroom_utilization("R101", &[], 8).is_none());
    }
}
