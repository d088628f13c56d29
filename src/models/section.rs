//! Course sections and the section catalog.
//!
//! A section is one taught instance of a course (e.g. `CIGD3212-01`)
//! with a fixed weekly meeting pattern. The catalog is built once per
//! upload and is read-only for the rest of a rescheduling session.
//!
//! # Code resolution
//! Avoid-lists name courses loosely ("CIGD3212", "cigd3212-01").
//! [`SectionCatalog::resolve_code`] maps such a code to one section:
//! 1. exact (case-insensitive) section key match,
//! 2. otherwise the first section, in catalog order, whose key contains
//!    the code or is contained in it.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Hour, HourRange, Weekday};

/// One weekly meeting of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Meeting day.
    pub day: Weekday,
    /// Start hour (inclusive).
    pub start_hour: Hour,
    /// End hour (exclusive).
    pub end_hour: Hour,
    /// Classroom name.
    pub room: String,
    /// Instructor name.
    pub instructor: String,
}

impl Meeting {
    /// Creates a meeting.
    pub fn new(
        day: Weekday,
        start_hour: Hour,
        end_hour: Hour,
        room: impl Into<String>,
        instructor: impl Into<String>,
    ) -> Self {
        Self {
            day,
            start_hour,
            end_hour,
            room: room.into(),
            instructor: instructor.into(),
        }
    }

    /// The occupied hour range.
    #[inline]
    pub fn range(&self) -> HourRange {
        HourRange::new(self.start_hour, self.end_hour)
    }
}

/// A course section with its weekly meeting pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Globally unique key: `"<code>-<number>"`.
    pub key: String,
    /// Course code (e.g. `"CIGD3212"`).
    pub code: String,
    /// Full course name.
    pub name: String,
    /// Section number as printed in the timetable (e.g. `"01"`).
    pub number: String,
    /// Instructor responsible for the section.
    pub instructor: String,
    /// Current weekly meetings.
    pub meetings: Vec<Meeting>,
}

impl Section {
    /// Creates a section; the key is derived from code and number.
    pub fn new(code: impl Into<String>, number: impl Into<String>) -> Self {
        let code = code.into();
        let number = number.into();
        Self {
            key: section_key(&code, &number),
            code,
            name: String::new(),
            number,
            instructor: String::new(),
            meetings: Vec::new(),
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the instructor.
    ///
    /// Meetings added earlier without an instructor are taught by them too.
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        for m in self.meetings.iter_mut().filter(|m| m.instructor.is_empty()) {
            m.instructor = self.instructor.clone();
        }
        self
    }

    /// Instructor of `meeting`, falling back to the section's.
    pub fn instructor_of<'a>(&'a self, meeting: &'a Meeting) -> &'a str {
        if meeting.instructor.is_empty() {
            &self.instructor
        } else {
            &meeting.instructor
        }
    }

    /// Adds a meeting taught by the section's instructor.
    pub fn with_meeting(
        mut self,
        day: Weekday,
        start_hour: Hour,
        end_hour: Hour,
        room: impl Into<String>,
    ) -> Self {
        let meeting = Meeting::new(day, start_hour, end_hour, room, self.instructor.clone());
        self.meetings.push(meeting);
        self
    }

    /// Meetings held on `day`.
    pub fn meetings_on(&self, day: Weekday) -> impl Iterator<Item = &Meeting> {
        self.meetings.iter().filter(move |m| m.day == day)
    }

    /// Hours this section meets on `day`.
    pub fn busy_hours_on(&self, day: Weekday) -> impl Iterator<Item = Hour> + '_ {
        self.meetings_on(day).flat_map(|m| m.range().hours())
    }

    /// Whether the section has no meetings (never scheduled).
    pub fn is_unscheduled(&self) -> bool {
        self.meetings.is_empty()
    }
}

/// Builds a section key from a course code and section number.
pub fn section_key(code: &str, number: &str) -> String {
    format!("{code}-{number}")
}

/// Extracts the course code from a course name.
///
/// Takes a leading `[A-Z]{3,5}\d{3,4}` token (case-insensitive, returned
/// uppercased); otherwise the first whitespace-separated word.
///
/// ```
/// use u_reschedule::models::extract_course_code;
///
/// assert_eq!(extract_course_code("cigd3212 Game Design"), "CIGD3212");
/// assert_eq!(extract_course_code("Seminar A"), "Seminar");
/// ```
pub fn extract_course_code(course_name: &str) -> String {
    static CODE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = CODE.get_or_init(|| Regex::new(r"(?i)^[A-Z]{3,5}\d{3,4}").ok());
    let name = course_name.trim();
    match re.as_ref().and_then(|re| re.find(name)) {
        Some(m) => m.as_str().to_uppercase(),
        None => name.split_whitespace().next().unwrap_or_default().to_string(),
    }
}

/// All known sections, in insertion order, indexed by key.
///
/// Serializes as a plain list of sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionCatalog {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl From<Vec<Section>> for SectionCatalog {
    fn from(sections: Vec<Section>) -> Self {
        Self::from_sections(sections)
    }
}

impl From<SectionCatalog> for Vec<Section> {
    fn from(catalog: SectionCatalog) -> Self {
        catalog.sections
    }
}

impl SectionCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from sections. Later duplicates of a key
    /// contribute their meetings to the first occurrence.
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut catalog = Self::new();
        for section in sections {
            catalog.insert(section);
        }
        catalog
    }

    /// Inserts a section, merging meetings into an existing entry with
    /// the same key.
    pub fn insert(&mut self, section: Section) {
        if let Some(&idx) = self.index.get(&section.key) {
            self.sections[idx].meetings.extend(section.meetings);
            return;
        }
        self.index.insert(section.key.clone(), self.sections.len());
        self.sections.push(section);
    }

    /// Looks up a section by exact key.
    pub fn get(&self, key: &str) -> Option<&Section> {
        self.index.get(key).map(|&idx| &self.sections[idx])
    }

    /// Whether a section key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates sections in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Resolves a loosely written course code to a section.
    ///
    /// See the module docs for precedence. Returns `None` for blank or
    /// unmatched codes.
    pub fn resolve_code(&self, code: &str) -> Option<&Section> {
        let wanted = code.trim().to_uppercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(exact) = self
            .sections
            .iter()
            .find(|s| s.key.to_uppercase() == wanted)
        {
            return Some(exact);
        }

        self.sections.iter().find(|s| {
            let key = s.key.to_uppercase();
            key.contains(&wanted) || wanted.contains(&key)
        })
    }
}
