//! Rescheduling session.
//!
//! [`RescheduleSession`] is the explicit context object that owns all
//! mutable rescheduling state: the working set, conflict groups, pending
//! moves, per-section settings, and committed assignments. Search,
//! auto-assignment and validation all take it by reference, so
//! independent sessions never share state.
//!
//! # Example
//!
//! ```
//! use u_reschedule::models::{OccupancyModel, Section, SectionCatalog, Weekday};
//! use u_reschedule::session::RescheduleSession;
//!
//! let catalog = SectionCatalog::from_sections(vec![
//!     Section::new("CIGD3212", "01")
//!         .with_instructor("Dr. A")
//!         .with_meeting(Weekday::Mon, 9, 11, "R101"),
//! ]);
//! let occupancy = OccupancyModel::from_catalog(&catalog);
//! let mut session = RescheduleSession::new(catalog, occupancy);
//!
//! let group = session.add_section("CIGD3212-01", None).unwrap();
//! assert_eq!(session.group_of("CIGD3212-01").unwrap().id, group);
//! // The original meeting is selected for removal by default.
//! assert!(session.freed_slots().frees_room("R101", Weekday::Mon, 9));
//! ```

pub mod pending;
pub mod registry;

pub use pending::{FreedSlot, FreedSlotSet, MoveKey, MoveSelection, PendingMoveSet};
pub use registry::ConflictGroupRegistry;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{ConfigError, RescheduleError, RescheduleResult};
use crate::models::{
    Assignment, AssignmentSet, ConflictGroup, GroupId, Hour, HourRange, OccupancyModel, Section,
    SectionCatalog, SectionSettings, Weekday,
};
use crate::scheduler::{AutoAssignOutcome, AutoAssigner, Unassigned};
use crate::search::{SearchOutcome, SearchRequest, SlotSearch};
use crate::validation::PlacementValidator;

/// A group whose avoid-list blocks a given hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedGroup {
    pub group_id: GroupId,
    pub group_name: String,
    /// Avoided course meeting at that hour.
    pub course_code: String,
}

/// All mutable state of one rescheduling session.
#[derive(Debug, Clone)]
pub struct RescheduleSession {
    config: EngineConfig,
    catalog: SectionCatalog,
    occupancy: OccupancyModel,
    working_set: Vec<String>,
    groups: ConflictGroupRegistry,
    moves: PendingMoveSet,
    settings: HashMap<String, SectionSettings>,
    assignments: AssignmentSet,
}

impl RescheduleSession {
    /// Creates a session with the default configuration.
    pub fn new(catalog: SectionCatalog, occupancy: OccupancyModel) -> Self {
        Self {
            config: EngineConfig::default(),
            catalog,
            occupancy,
            working_set: Vec::new(),
            groups: ConflictGroupRegistry::new(),
            moves: PendingMoveSet::new(),
            settings: HashMap::new(),
            assignments: AssignmentSet::new(),
        }
    }

    /// Creates a session with a validated configuration.
    pub fn with_config(
        catalog: SectionCatalog,
        occupancy: OccupancyModel,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(catalog, occupancy)
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    pub fn occupancy(&self) -> &OccupancyModel {
        &self.occupancy
    }

    /// Utilization of `room` over the configured work days, against
    /// `full_occupancy_hours` per day.
    pub fn classroom_utilization(&self, room: &str) -> Option<f64> {
        self.occupancy.classroom_utilization(
            room,
            &self.config.work_days,
            self.config.full_occupancy_hours,
        )
    }

    // ======================== Working set & groups ========================

    /// Creates an empty conflict group.
    pub fn create_group(&mut self, name: Option<&str>) -> GroupId {
        let id = self.groups.create(name, &self.config);
        log::debug!("created conflict group {id}");
        id
    }

    /// Adds a catalog section to the working set.
    ///
    /// Without a group, the first group is used (created if none exists).
    /// Returns the group joined, or `None` without any change when the
    /// section is unknown, already in the working set, or the named group
    /// does not exist.
    pub fn add_section(&mut self, key: &str, group: Option<&GroupId>) -> Option<GroupId> {
        let section = self.catalog.get(key)?;
        if self.groups.group_of(key).is_some() {
            return None;
        }
        let target = match group {
            Some(id) if self.groups.contains(id) => id.clone(),
            Some(_) => return None,
            None => self.groups.first_or_create(&self.config),
        };

        self.moves.seed(section);
        self.groups.add_member(&target, key);
        self.working_set.push(key.to_string());
        log::info!(
            "added {key} to {target} ({} meeting(s) marked for removal)",
            section.meetings.len()
        );
        Some(target)
    }

    /// Moves a working-set section to another group.
    pub fn move_section(&mut self, key: &str, to: &GroupId) -> RescheduleResult<()> {
        if !self.in_working_set(key) {
            return Err(RescheduleError::NotInWorkingSet(key.to_string()));
        }
        if !self.groups.move_member(key, to) {
            return Err(RescheduleError::UnknownGroup(to.to_string()));
        }
        log::debug!("moved {key} to {to}");
        Ok(())
    }

    /// Removes a section from the working set.
    ///
    /// Its group membership, move selections (and so its freed slots) and
    /// committed assignments are discarded. Returns `false` if the section
    /// was not in the working set.
    pub fn remove_section(&mut self, key: &str) -> bool {
        if self.groups.detach(key).is_none() {
            return false;
        }
        self.working_set.retain(|k| k != key);
        self.moves.remove_section(key);
        let dropped = self.assignments.remove_section(key);
        log::info!("removed {key} from the working set ({dropped} assignment(s) dropped)");
        true
    }

    /// Removes a group after removing each of its members.
    pub fn remove_group(&mut self, id: &GroupId) -> bool {
        let members = match self.groups.get(id) {
            Some(g) => g.members.clone(),
            None => return false,
        };
        for key in &members {
            self.remove_section(key);
        }
        self.groups.remove(id).is_some()
    }

    /// Replaces a group's avoid-list.
    pub fn set_avoid_courses<I, S>(&mut self, id: &GroupId, codes: I) -> RescheduleResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.groups.set_avoid_codes(id, codes) {
            Ok(())
        } else {
            Err(RescheduleError::UnknownGroup(id.to_string()))
        }
    }

    /// Renames a group. Blank names leave it unchanged.
    pub fn rename_group(&mut self, id: &GroupId, name: &str) -> RescheduleResult<()> {
        if !self.groups.contains(id) {
            return Err(RescheduleError::UnknownGroup(id.to_string()));
        }
        self.groups.rename(id, name);
        Ok(())
    }

    /// Groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &ConflictGroup> {
        self.groups.iter()
    }

    pub fn group(&self, id: &GroupId) -> Option<&ConflictGroup> {
        self.groups.get(id)
    }

    /// The group a section belongs to.
    pub fn group_of(&self, key: &str) -> Option<&ConflictGroup> {
        self.groups.group_of(key)
    }

    /// Every group whose avoided courses meet at `(day, hour)`.
    pub fn groups_blocked_at(&self, day: Weekday, hour: Hour) -> Vec<BlockedGroup> {
        let mut blocked = Vec::new();
        for group in self.groups.iter() {
            for code in &group.avoid_codes {
                let Some(section) = self.catalog.resolve_code(code) else {
                    continue;
                };
                if section.busy_hours_on(day).any(|h| h == hour) {
                    blocked.push(BlockedGroup {
                        group_id: group.id.clone(),
                        group_name: group.name.clone(),
                        course_code: section.code.clone(),
                    });
                }
            }
        }
        blocked
    }

    /// Sections in the working set, in the order they were added.
    pub fn working_sections(&self) -> impl Iterator<Item = &Section> {
        self.working_set.iter().filter_map(|k| self.catalog.get(k))
    }

    pub fn in_working_set(&self, key: &str) -> bool {
        self.working_set.iter().any(|k| k == key)
    }

    // ======================== Pending moves ========================

    /// Flips whether an original meeting is vacated. Returns the new
    /// state, or `None` if no such meeting is tracked.
    pub fn toggle_move(&mut self, key: &str, day: Weekday, start_hour: Hour) -> Option<bool> {
        self.moves.toggle(&MoveKey::new(key, day, start_hour))
    }

    /// Sets whether an original meeting is vacated.
    pub fn set_move_selected(
        &mut self,
        key: &str,
        day: Weekday,
        start_hour: Hour,
        selected: bool,
    ) -> bool {
        self.moves
            .set_selected(&MoveKey::new(key, day, start_hour), selected)
    }

    pub fn is_move_selected(&self, key: &str, day: Weekday, start_hour: Hour) -> bool {
        self.moves.is_selected(&MoveKey::new(key, day, start_hour))
    }

    /// Every move selection of the working set.
    pub fn move_selections(&self) -> impl Iterator<Item = &MoveSelection> {
        self.moves.iter()
    }

    /// Room-hours currently being vacated.
    pub fn freed_slots(&self) -> &FreedSlotSet {
        self.moves.freed()
    }

    // ======================== Settings ========================

    /// Settings of a section, stored with the configured default on first
    /// access.
    pub fn settings(&mut self, key: &str) -> SectionSettings {
        *self
            .settings
            .entry(key.to_string())
            .or_insert(self.config.default_settings)
    }

    /// Settings of a section without recording a default.
    pub fn peek_settings(&self, key: &str) -> SectionSettings {
        self.settings
            .get(key)
            .copied()
            .unwrap_or(self.config.default_settings)
    }

    /// Updates one or both settings of a section.
    pub fn update_settings(
        &mut self,
        key: &str,
        times_per_week: Option<u32>,
        hours_per_session: Option<u8>,
    ) -> RescheduleResult<SectionSettings> {
        if !self.catalog.contains(key) {
            return Err(RescheduleError::UnknownSection(key.to_string()));
        }
        let current = self.settings(key);
        let updated = SectionSettings::new(
            times_per_week.unwrap_or(current.times_per_week),
            hours_per_session.unwrap_or(current.hours_per_session),
        )
        .ok_or_else(|| RescheduleError::InvalidSettings {
            key: key.to_string(),
        })?;
        self.settings.insert(key.to_string(), updated);
        Ok(updated)
    }

    // ======================== Search & assignment ========================

    /// A validator over this session's occupancy and freed slots.
    pub fn validator(&self) -> PlacementValidator<'_> {
        PlacementValidator::new(&self.occupancy, self.moves.freed())
    }

    /// Searches candidate windows for the working set.
    pub fn search(&self, request: &SearchRequest) -> RescheduleResult<SearchOutcome> {
        SlotSearch::new(self).run(request)
    }

    /// Replaces all assignments with a greedy distribution of `outcome`
    /// over the working set, in working-set order.
    pub fn auto_assign(&mut self, outcome: &SearchOutcome) -> AutoAssignOutcome {
        let order = self.working_set.clone();
        AutoAssigner::new().distribute(self, outcome, &order)
    }

    /// Committed assignments.
    pub fn assignments(&self) -> &AssignmentSet {
        &self.assignments
    }

    pub(crate) fn assignments_mut(&mut self) -> &mut AssignmentSet {
        &mut self.assignments
    }

    #[cfg(test)]
    pub(crate) fn groups_mut(&mut self) -> &mut ConflictGroupRegistry {
        &mut self.groups
    }

    #[cfg(test)]
    pub(crate) fn moves_mut(&mut self) -> &mut PendingMoveSet {
        &mut self.moves
    }

    /// Commits one assignment after validating it.
    ///
    /// # Errors
    /// - `UnknownSection` / `NotInWorkingSet` for a section that cannot
    ///   be placed
    /// - `InvalidDuration` for an empty window
    /// - `DuplicateAssignment` / `DuplicateDay` if the section already
    ///   meets at that start or on that day
    /// - `Conflict` if the room is occupied and not being vacated
    /// - `RoomTaken` if another committed assignment holds the room
    pub fn commit_assignment(&mut self, assignment: Assignment) -> RescheduleResult<()> {
        let key = assignment.section_key.as_str();
        if !self.catalog.contains(key) {
            return Err(RescheduleError::UnknownSection(key.to_string()));
        }
        if !self.in_working_set(key) {
            return Err(RescheduleError::NotInWorkingSet(key.to_string()));
        }
        if assignment.duration() == 0 {
            return Err(RescheduleError::InvalidDuration);
        }
        if self
            .assignments
            .find(assignment.day, assignment.start_hour, key)
            .is_some()
        {
            return Err(RescheduleError::DuplicateAssignment {
                key: key.to_string(),
                day: assignment.day,
                start_hour: assignment.start_hour,
            });
        }
        if self
            .assignments
            .for_section(key)
            .iter()
            .any(|a| a.day == assignment.day)
        {
            return Err(RescheduleError::DuplicateDay {
                key: key.to_string(),
                day: assignment.day,
            });
        }
        self.check_room(
            &assignment.classroom,
            assignment.day,
            assignment.range(),
            key,
            None,
        )?;

        log::info!(
            "committed {key} on {} {} in {}",
            assignment.day,
            assignment.range().label(),
            assignment.classroom
        );
        self.assignments.insert(assignment);
        Ok(())
    }

    /// Removes a committed assignment.
    pub fn remove_assignment(
        &mut self,
        day: Weekday,
        start_hour: Hour,
        key: &str,
    ) -> RescheduleResult<Assignment> {
        self.assignments
            .remove(day, start_hour, key)
            .ok_or_else(|| RescheduleError::AssignmentNotFound {
                key: key.to_string(),
                day,
                start_hour,
            })
    }

    /// Moves a committed assignment to another room after validating it.
    pub fn change_assignment_room(
        &mut self,
        day: Weekday,
        start_hour: Hour,
        key: &str,
        room: &str,
    ) -> RescheduleResult<()> {
        let range = self
            .assignments
            .find(day, start_hour, key)
            .map(Assignment::range)
            .ok_or_else(|| RescheduleError::AssignmentNotFound {
                key: key.to_string(),
                day,
                start_hour,
            })?;
        self.check_room(room, day, range, key, Some(start_hour))?;

        if let Some(a) = self.assignments.find_mut(day, start_hour, key) {
            log::debug!("moved {key} on {day} from {} to {room}", a.classroom);
            a.classroom = room.to_string();
        }
        Ok(())
    }

    /// Rooms from `rooms` that pass the validator for the window.
    pub fn filter_valid_rooms<S: AsRef<str>>(
        &self,
        rooms: &[S],
        day: Weekday,
        start_hour: Hour,
        duration: Hour,
        key: &str,
    ) -> Vec<String> {
        let validator = self.validator();
        rooms
            .iter()
            .map(AsRef::as_ref)
            .filter(|room| validator.check(room, day, start_hour, duration, key).available)
            .map(str::to_string)
            .collect()
    }

    /// Working-set sections with fewer committed assignments than their
    /// weekly frequency.
    pub fn unassigned_sections(&self) -> Vec<Unassigned> {
        self.working_sections()
            .filter_map(|section| {
                let required = self.peek_settings(&section.key).times_per_week;
                let assigned = self.assignments.count_for_section(&section.key) as u32;
                (assigned < required).then(|| Unassigned {
                    section_key: section.key.clone(),
                    code: section.code.clone(),
                    assigned,
                    required,
                })
            })
            .collect()
    }

    /// Clears groups, settings, moves, the working set and assignments.
    pub fn reset(&mut self) {
        self.groups.clear();
        self.moves.clear();
        self.settings.clear();
        self.working_set.clear();
        self.assignments.clear();
        log::info!("session reset");
    }

    /// Validator check plus committed-assignment overlap. `own_start`
    /// names the assignment of `key` being edited, which is ignored.
    fn check_room(
        &self,
        room: &str,
        day: Weekday,
        range: HourRange,
        key: &str,
        own_start: Option<Hour>,
    ) -> RescheduleResult<()> {
        let check = self
            .validator()
            .check(room, day, range.start, range.duration(), key);
        if let Some(conflict) = check.conflict {
            return Err(RescheduleError::Conflict {
                room: room.to_string(),
                day,
                conflict,
            });
        }

        let holder = self
            .assignments
            .overlapping(day, range, room)
            .into_iter()
            .find(|a| !own_start.is_some_and(|start| a.matches(day, start, key)));
        if let Some(holder) = holder {
            return Err(RescheduleError::RoomTaken {
                room: room.to_string(),
                day,
                start_hour: holder.start_hour,
                holder: holder.section_key.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SectionCatalog {
        SectionCatalog::from_sections(vec![
            Section::new("CIGD3212", "01")
                .with_instructor("Dr. A")
                .with_meeting(Weekday::Mon, 9, 11, "R101"),
            Section::new("MATH101", "01")
                .with_instructor("Dr. B")
                .with_meeting(Weekday::Mon, 13, 15, "R102"),
            Section::new("PHYS200", "02")
                .with_instructor("Dr. C")
                .with_meeting(Weekday::Tue, 8, 10, "R101"),
        ])
    }

    fn session() -> RescheduleSession {
        let catalog = catalog();
        let occupancy = OccupancyModel::from_catalog(&catalog);
        RescheduleSession::new(catalog, occupancy)
    }

    #[test]
    fn test_add_section_creates_first_group() {
        let mut s = session();
        let g = s.add_section("CIGD3212-01", None).unwrap();
        assert_eq!(s.group(&g).unwrap().name, "Year 1");
        assert_eq!(s.add_section("MATH101-01", None), Some(g.clone()));
        assert_eq!(s.groups().count(), 1);
        assert_eq!(s.working_sections().count(), 2);
    }

    #[test]
    fn test_add_section_rejections_are_noops() {
        let mut s = session();
        assert_eq!(s.add_section("NOPE-01", None), None);
        assert_eq!(s.groups().count(), 0);

        s.add_section("CIGD3212-01", None).unwrap();
        let other = s.create_group(Some("Electives"));
        assert_eq!(s.add_section("CIGD3212-01", Some(&other)), None);
        assert_eq!(s.add_section("MATH101-01", Some(&GroupId::from("group_9"))), None);
        assert_eq!(s.working_sections().count(), 1);
        assert!(s.group(&other).unwrap().members.is_empty());
    }

    #[test]
    fn test_move_section_errors() {
        let mut s = session();
        let g1 = s.add_section("CIGD3212-01", None).unwrap();
        let g2 = s.create_group(None);
        s.move_section("CIGD3212-01", &g2).unwrap();
        assert_eq!(s.group_of("CIGD3212-01").unwrap().id, g2);
        assert!(s.group(&g1).unwrap().members.is_empty());

        assert!(matches!(
            s.move_section("MATH101-01", &g1),
            Err(RescheduleError::NotInWorkingSet(_))
        ));
        assert!(matches!(
            s.move_section("CIGD3212-01", &GroupId::from("group_9")),
            Err(RescheduleError::UnknownGroup(_))
        ));
    }

    #[test]
    fn test_remove_section_resets_freed_contribution() {
        let mut s = session();
        s.add_section("CIGD3212-01", None);
        assert_eq!(s.freed_slots().len(), 2);
        assert!(s.remove_section("CIGD3212-01"));
        assert!(s.freed_slots().is_empty());
        assert_eq!(s.move_selections().count(), 0);
        assert!(!s.remove_section("CIGD3212-01"));
    }

    #[test]
    fn test_remove_group_cascades() {
        let mut s = session();
        let g = s.add_section("CIGD3212-01", None).unwrap();
        s.add_section("MATH101-01", Some(&g));
        assert!(s.remove_group(&g));
        assert_eq!(s.groups().count(), 0);
        assert_eq!(s.working_sections().count(), 0);
        assert!(s.freed_slots().is_empty());
        assert!(!s.remove_group(&g));
    }

    #[test]
    fn test_toggle_move() {
        let mut s = session();
        s.add_section("CIGD3212-01", None);
        assert!(s.is_move_selected("CIGD3212-01", Weekday::Mon, 9));
        assert_eq!(s.toggle_move("CIGD3212-01", Weekday::Mon, 9), Some(false));
        assert!(s.freed_slots().is_empty());
        assert_eq!(s.toggle_move("CIGD3212-01", Weekday::Tue, 9), None);
        assert!(s.is_move_selected("CIGD3212-01", Weekday::Tue, 9));
    }

    #[test]
    fn test_settings_lazy_default_and_update() {
        let mut s = session();
        assert_eq!(s.peek_settings("MATH101-01"), SectionSettings::default());
        assert_eq!(s.settings("MATH101-01").times_per_week, 2);

        let updated = s.update_settings("MATH101-01", Some(3), None).unwrap();
        assert_eq!(updated.times_per_week, 3);
        assert_eq!(updated.hours_per_session, 2);

        assert!(matches!(
            s.update_settings("MATH101-01", None, Some(0)),
            Err(RescheduleError::InvalidSettings { .. })
        ));
        assert!(matches!(
            s.update_settings("NOPE-01", Some(1), None),
            Err(RescheduleError::UnknownSection(_))
        ));
        assert_eq!(s.peek_settings("MATH101-01").times_per_week, 3);
    }

    #[test]
    fn test_groups_blocked_at() {
        let mut s = session();
        let g = s.add_section("CIGD3212-01", None).unwrap();
        s.set_avoid_courses(&g, ["math101"]).unwrap();

        let blocked = s.groups_blocked_at(Weekday::Mon, 14);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].course_code, "MATH101");
        assert!(s.groups_blocked_at(Weekday::Mon, 15).is_empty());
    }

    #[test]
    fn test_commit_assignment_checks() {
        let mut s = session();
        s.add_section("CIGD3212-01", None);
        s.add_section("MATH101-01", None);

        // R101 09-11 Monday is freed by CIGD3212-01's own move.
        s.commit_assignment(Assignment::new(Weekday::Mon, 9, 11, "CIGD3212-01", "R101"))
            .unwrap();

        let err = s
            .commit_assignment(Assignment::new(Weekday::Mon, 12, 14, "CIGD3212-01", "R103"))
            .unwrap_err();
        assert!(matches!(err, RescheduleError::DuplicateDay { .. }));

        let err = s
            .commit_assignment(Assignment::new(Weekday::Mon, 10, 12, "MATH101-01", "r101"))
            .unwrap_err();
        assert!(matches!(err, RescheduleError::RoomTaken { ref holder, .. } if holder == "CIGD3212-01"));

        let err = s
            .commit_assignment(Assignment::new(Weekday::Tue, 9, 11, "MATH101-01", "R101"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "R101 is occupied on Tue at 09:00: PHYS200 sec 02"
        );

        let err = s
            .commit_assignment(Assignment::new(Weekday::Tue, 9, 11, "PHYS200-02", "R105"))
            .unwrap_err();
        assert!(matches!(err, RescheduleError::NotInWorkingSet(_)));

        let err = s
            .commit_assignment(Assignment::new(Weekday::Tue, 9, 9, "MATH101-01", "R105"))
            .unwrap_err();
        assert!(matches!(err, RescheduleError::InvalidDuration));
        assert_eq!(s.assignments().len(), 1);
    }

    #[test]
    fn test_change_room_and_remove() {
        let mut s = session();
        s.add_section("MATH101-01", None);
        s.commit_assignment(Assignment::new(Weekday::Wed, 8, 10, "MATH101-01", "R200"))
            .unwrap();

        // Re-selecting its own room does not collide with itself.
        s.change_assignment_room(Weekday::Wed, 8, "MATH101-01", "R200")
            .unwrap();
        s.change_assignment_room(Weekday::Wed, 8, "MATH101-01", "R201")
            .unwrap();
        assert_eq!(
            s.assignments()
                .find(Weekday::Wed, 8, "MATH101-01")
                .unwrap()
                .classroom,
            "R201"
        );

        assert!(matches!(
            s.change_assignment_room(Weekday::Thu, 8, "MATH101-01", "R201"),
            Err(RescheduleError::AssignmentNotFound { .. })
        ));
        s.remove_assignment(Weekday::Wed, 8, "MATH101-01").unwrap();
        assert!(s.assignments().is_empty());
    }

    #[test]
    fn test_filter_valid_rooms() {
        let s = session();
        let rooms = s.filter_valid_rooms(&["R101", "R102", "R300"], Weekday::Mon, 9, 2, "X-01");
        assert_eq!(rooms, vec!["R102", "R300"]);
    }

    #[test]
    fn test_unassigned_and_reset() {
        let mut s = session();
        s.add_section("MATH101-01", None);
        s.commit_assignment(Assignment::new(Weekday::Wed, 8, 10, "MATH101-01", "R200"))
            .unwrap();
        let missing = s.unassigned_sections();
        assert_eq!(missing.len(), 1);
        assert_eq!((missing[0].assigned, missing[0].required), (1, 2));

        s.reset();
        assert_eq!(s.groups().count(), 0);
        assert!(s.assignments().is_empty());
        assert!(s.freed_slots().is_empty());
        assert_eq!(s.create_group(None).as_str(), "group_1");
    }

    #[test]
    fn test_classroom_utilization_follows_config() {
        let s = session();
        // R101: two hours on Monday and two on Tuesday, five days of eight hours.
        let u = s.classroom_utilization("R101").unwrap();
        assert!((u - 4.0 / 40.0).abs() < 1e-10);

        let catalog = catalog();
        let occupancy = OccupancyModel::from_catalog(&catalog);
        let config = EngineConfig {
            work_days: vec![Weekday::Mon],
            full_occupancy_hours: 4,
            ..EngineConfig::default()
        };
        let narrow = RescheduleSession::with_config(catalog, occupancy, config).unwrap();
        let u = narrow.classroom_utilization("R101").unwrap();
        assert!((u - 2.0 / 4.0).abs() < 1e-10);
        assert!(narrow.classroom_utilization("R999").is_none());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = session();
        let b = session();
        a.add_section("CIGD3212-01", None);
        assert_eq!(b.working_sections().count(), 0);
        assert!(b.freed_slots().is_empty());
    }
}
