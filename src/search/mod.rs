//! Candidate window search.
//!
//! Enumerates every `[h, h + duration)` window on the requested days and
//! annotates it with the working-set sections that can use it and the
//! classrooms that are free for it.
//!
//! # Algorithm
//!
//! Per day:
//! 1. Resolve global and per-group avoid codes to catalog sections
//!    (exact key first, then substring in either direction). Codes that
//!    resolve to nothing are reported back.
//! 2. Collect the hours each group must avoid, and the global avoid hours.
//! 3. For each start hour in the (possibly shrunk) day window:
//!    - reject the window if it touches a global avoid hour
//!    - classify each working-set section as eligible or ineligible
//!      (instructor busy, group conflict)
//!    - reject the window if no section is eligible
//!    - keep the classrooms free for every hour, where hours being
//!      vacated by pending moves do not count as occupied
//!    - reject the window if no classroom is left
//!
//! Windows are not sorted here; see [`crate::scheduler`] for ranking.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{RescheduleError, RescheduleResult};
use crate::models::{normalize_codes, GroupId, Hour, HourRange, Section, Weekday};
use crate::session::RescheduleSession;
use crate::validation::PlacementValidator;

/// Search-wide switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConstraints {
    /// End the window at the afternoon cutoff on the cutoff day
    /// (Thursday 14:00 by default).
    pub no_thursday_afternoon: bool,
}

impl Default for SearchConstraints {
    fn default() -> Self {
        Self {
            no_thursday_afternoon: true,
        }
    }
}

/// Input of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Days to search, in the caller's preferred order.
    pub days: Vec<Weekday>,
    /// Window length in hours.
    pub duration: Hour,
    /// Course codes no window may overlap, for any section.
    pub avoid_codes: Vec<String>,
    /// Room name filter; empty means every classroom.
    pub preferred_rooms: Vec<String>,
    pub constraints: SearchConstraints,
}

impl SearchRequest {
    /// Creates a request with no avoid codes and no room preference.
    pub fn new(days: Vec<Weekday>, duration: Hour) -> Self {
        Self {
            days,
            duration,
            avoid_codes: Vec::new(),
            preferred_rooms: Vec::new(),
            constraints: SearchConstraints::default(),
        }
    }

    /// Sets the global avoid codes.
    pub fn with_avoid_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avoid_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts classrooms to names matching one of `rooms`.
    pub fn with_preferred_rooms<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_rooms = rooms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_constraints(mut self, constraints: SearchConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// A section that cannot use a window, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IneligibleSection {
    pub section_key: String,
    /// `"<instructor> busy"` or `"<group name> conflict"`.
    pub reason: String,
}

/// A candidate window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub day: Weekday,
    pub start_hour: Hour,
    pub end_hour: Hour,
    /// Free classrooms, sorted by name.
    pub classrooms: Vec<String>,
    /// Sections that can use the window, in working-set order.
    pub eligible_sections: Vec<String>,
    /// Sections that cannot, with reasons.
    pub ineligible_sections: Vec<IneligibleSection>,
}

impl CandidateSlot {
    pub fn range(&self) -> HourRange {
        HourRange::new(self.start_hour, self.end_hour)
    }

    pub fn duration(&self) -> Hour {
        self.range().duration()
    }

    /// Whether `section_key` may use this window.
    pub fn is_eligible(&self, section_key: &str) -> bool {
        self.eligible_sections.iter().any(|k| k == section_key)
    }
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Searched days, in request order.
    pub days: Vec<Weekday>,
    /// Candidate windows per day, by start hour.
    pub slots_by_day: HashMap<Weekday, Vec<CandidateSlot>>,
    /// Avoid codes that matched no catalog section.
    pub unresolved_avoid_codes: Vec<String>,
}

impl SearchOutcome {
    /// Windows found on `day`.
    pub fn slots_on(&self, day: Weekday) -> &[CandidateSlot] {
        self.slots_by_day
            .get(&day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All windows, day by day in request order.
    pub fn iter(&self) -> impl Iterator<Item = &CandidateSlot> {
        self.days.iter().flat_map(move |&d| self.slots_on(d).iter())
    }

    /// Total number of windows.
    pub fn total_slots(&self) -> usize {
        self.slots_by_day.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_slots() == 0
    }
}

/// Avoid codes resolved against the catalog.
struct ResolvedAvoids<'a> {
    global: Vec<&'a Section>,
    by_group: Vec<(GroupId, Vec<&'a Section>)>,
    unresolved: Vec<String>,
}

/// Searches candidate windows for a session's working set.
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
/// let outcome = session.search(&SearchRequest::new(vec![Weekday::Mon], 2)).unwrap();
/// // 08:00 through 16:00 starts; R101 is free because its meeting is vacated.
/// assert_eq!(outcome.slots_on(Weekday::Mon).len(), 9);
/// assert_eq!(outcome.slots_on(Weekday::Mon)[1].classrooms, vec!["R101"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SlotSearch<'a> {
    session: &'a RescheduleSession,
}

impl<'a> SlotSearch<'a> {
    pub fn new(session: &'a RescheduleSession) -> Self {
        Self { session }
    }

    /// Runs a search.
    ///
    /// # Errors
    /// `InvalidDuration` if `request.duration` is zero. Every other
    /// problem (unresolved codes, days with no room) is reported in the
    /// outcome.
    pub fn run(&self, request: &SearchRequest) -> RescheduleResult<SearchOutcome> {
        if request.duration == 0 {
            return Err(RescheduleError::InvalidDuration);
        }

        let avoids = self.resolve_avoids(&request.avoid_codes);
        if !avoids.unresolved.is_empty() {
            log::warn!(
                "avoid codes not found in catalog: {}",
                avoids.unresolved.join(", ")
            );
        }
        let rooms = self.candidate_rooms(&request.preferred_rooms);

        let mut slots_by_day = HashMap::new();
        for &day in &request.days {
            let slots = self.search_day(day, request, &avoids, &rooms);
            log::debug!("{day}: {} candidate window(s)", slots.len());
            slots_by_day.insert(day, slots);
        }

        let outcome = SearchOutcome {
            days: request.days.clone(),
            slots_by_day,
            unresolved_avoid_codes: avoids.unresolved,
        };
        log::info!(
            "searched {} day(s) for {}h windows: {} candidate(s)",
            outcome.days.len(),
            request.duration,
            outcome.total_slots()
        );
        Ok(outcome)
    }

    fn resolve_avoids(&self, global_codes: &[String]) -> ResolvedAvoids<'a> {
        let catalog = self.session.catalog();
        let mut unresolved = Vec::new();

        let mut global = Vec::new();
        for code in normalize_codes(global_codes) {
            match catalog.resolve_code(&code) {
                Some(section) => global.push(section),
                None => unresolved.push(code),
            }
        }

        let mut by_group = Vec::new();
        for group in self.session.groups() {
            let mut sections = Vec::new();
            for code in &group.avoid_codes {
                match catalog.resolve_code(code) {
                    Some(section) => sections.push(section),
                    None if !unresolved.contains(code) => unresolved.push(code.clone()),
                    None => {}
                }
            }
            by_group.push((group.id.clone(), sections));
        }

        ResolvedAvoids {
            global,
            by_group,
            unresolved,
        }
    }

    /// Classroom names from the occupancy model, sorted, optionally
    /// narrowed to those matching a preferred name in either direction.
    fn candidate_rooms(&self, preferred: &[String]) -> Vec<&'a str> {
        let preferred: Vec<String> = preferred
            .iter()
            .map(|p| p.trim().to_uppercase())
            .filter(|p| !p.is_empty())
            .collect();
        self.session
            .occupancy()
            .classrooms
            .subjects()
            .filter(|room| {
                if preferred.is_empty() {
                    return true;
                }
                let upper = room.to_uppercase();
                preferred
                    .iter()
                    .any(|p| upper.contains(p.as_str()) || p.contains(upper.as_str()))
            })
            .collect()
    }

    fn search_day(
        &self,
        day: Weekday,
        request: &SearchRequest,
        avoids: &ResolvedAvoids<'_>,
        rooms: &[&str],
    ) -> Vec<CandidateSlot> {
        let config = self.session.config();
        let start = config.day_start_hour;
        let end = config.window_end(day, request.constraints.no_thursday_afternoon);
        if end < start || request.duration > end - start {
            log::debug!("{day}: window too short for {}h", request.duration);
            return Vec::new();
        }

        let global_hours = avoid_hours(&avoids.global, day);
        let group_hours: HashMap<&GroupId, HashSet<Hour>> = avoids
            .by_group
            .iter()
            .map(|(id, sections)| (id, avoid_hours(sections, day)))
            .collect();
        let validator = self.session.validator();

        let mut slots = Vec::new();
        let (mut blocked_global, mut blocked_sections, mut blocked_rooms) = (0, 0, 0);
        for h in start..=end - request.duration {
            let range = HourRange::from_duration(h, request.duration);
            if range.hours().any(|x| global_hours.contains(&x)) {
                blocked_global += 1;
                continue;
            }

            let mut eligible_sections = Vec::new();
            let mut ineligible_sections = Vec::new();
            for section in self.session.working_sections() {
                match self.ineligibility(section, day, range, &group_hours) {
                    None => eligible_sections.push(section.key.clone()),
                    Some(reason) => ineligible_sections.push(IneligibleSection {
                        section_key: section.key.clone(),
                        reason,
                    }),
                }
            }
            if eligible_sections.is_empty() {
                blocked_sections += 1;
                continue;
            }

            let classrooms = free_rooms(&validator, rooms, day, range);
            if classrooms.is_empty() {
                blocked_rooms += 1;
                continue;
            }

            slots.push(CandidateSlot {
                day,
                start_hour: range.start,
                end_hour: range.end,
                classrooms,
                eligible_sections,
                ineligible_sections,
            });
        }

        log::debug!(
            "{day}: rejected {blocked_global} by global avoids, \
             {blocked_sections} with no eligible section, {blocked_rooms} with no room"
        );
        slots
    }

    /// Why `section` cannot use the window, or `None` if it can.
    fn ineligibility(
        &self,
        section: &Section,
        day: Weekday,
        range: HourRange,
        group_hours: &HashMap<&GroupId, HashSet<Hour>>,
    ) -> Option<String> {
        let occupancy = self.session.occupancy();
        let freed = self.session.freed_slots();
        let instructor = section.instructor.as_str();
        if !instructor.is_empty()
            && range.hours().any(|h| {
                occupancy.instructor_busy(instructor, day, h) && !freed.freed_by(&section.key, day, h)
            })
        {
            return Some(format!("{instructor} busy"));
        }

        let group = self.session.group_of(&section.key)?;
        let hours = group_hours.get(&group.id)?;
        range
            .hours()
            .any(|h| hours.contains(&h))
            .then(|| format!("{} conflict", group.name))
    }
}

fn avoid_hours(sections: &[&Section], day: Weekday) -> HashSet<Hour> {
    sections.iter().flat_map(|s| s.busy_hours_on(day)).collect()
}

fn free_rooms(
    validator: &PlacementValidator<'_>,
    rooms: &[&str],
    day: Weekday,
    range: HourRange,
) -> Vec<String> {
    rooms
        .iter()
        .filter(|room| range.hours().all(|h| !validator.is_occupied(room, day, h)))
        .map(|room| room.to_string())
        .collect()
}
