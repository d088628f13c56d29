//! Pending moves and the freed-slot overlay.
//!
//! When a section enters the working set, each of its current weekly
//! meetings gets a [`MoveSelection`], selected by default. The
//! [`FreedSlotSet`] is derived from the selected entries: every
//! `(day, hour, room)` they span, tagged with the owning section. It is
//! the only place that decides "this occupancy hit is being vacated".
//!
//! # Invariant
//! `freed` always equals a full rebuild from `selections`. Every mutation
//! rebuilds it; there is no incremental maintenance.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Hour, Section, Weekday};

/// Identity of one original meeting: `(section key, day, start hour)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveKey {
    pub section_key: String,
    pub day: Weekday,
    pub start_hour: Hour,
}

impl MoveKey {
    pub fn new(section_key: impl Into<String>, day: Weekday, start_hour: Hour) -> Self {
        Self {
            section_key: section_key.into(),
            day,
            start_hour,
        }
    }
}

/// One original meeting and whether it is being vacated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSelection {
    /// Owning section.
    pub section_key: String,
    /// Meeting day.
    pub day: Weekday,
    /// Start hour (inclusive).
    pub start_hour: Hour,
    /// End hour (exclusive).
    pub end_hour: Hour,
    /// Room the meeting currently uses.
    pub room: String,
    /// Whether this meeting will be vacated.
    pub selected: bool,
}

/// A single vacated hour of a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FreedSlot {
    pub day: Weekday,
    pub hour: Hour,
    /// Room name, uppercased.
    pub room: String,
    /// Section vacating the hour.
    pub section_key: String,
}

/// Derived set of vacated `(day, hour, room)` triples.
///
/// Serializes as the flat slot list for report consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FreedSlotSet {
    slots: Vec<FreedSlot>,
    #[serde(skip)]
    rooms: HashSet<(Weekday, Hour, String)>,
    #[serde(skip)]
    owners: HashSet<(Weekday, Hour, String)>,
}

impl FreedSlotSet {
    fn rebuild<'a>(selections: impl Iterator<Item = &'a MoveSelection>) -> Self {
        let mut set = Self::default();
        for sel in selections.filter(|s| s.selected) {
            let room = sel.room.to_uppercase();
            for hour in sel.start_hour..sel.end_hour {
                set.rooms.insert((sel.day, hour, room.clone()));
                set.owners.insert((sel.day, hour, sel.section_key.clone()));
                set.slots.push(FreedSlot {
                    day: sel.day,
                    hour,
                    room: room.clone(),
                    section_key: sel.section_key.clone(),
                });
            }
        }
        set
    }

    /// Whether `room` is being vacated at `(day, hour)`. Room names
    /// compare case-insensitively.
    pub fn frees_room(&self, room: &str, day: Weekday, hour: Hour) -> bool {
        self.rooms.contains(&(day, hour, room.to_uppercase()))
    }

    /// Whether `section_key` itself vacates some meeting at `(day, hour)`.
    pub fn freed_by(&self, section_key: &str, day: Weekday, hour: Hour) -> bool {
        self.owners.contains(&(day, hour, section_key.to_string()))
    }

    /// Freed slots on `day`.
    pub fn on_day(&self, day: Weekday) -> impl Iterator<Item = &FreedSlot> {
        self.slots.iter().filter(move |s| s.day == day)
    }

    /// Freed slots contributed by one section.
    pub fn for_section<'a>(&'a self, section_key: &'a str) -> impl Iterator<Item = &'a FreedSlot> {
        self.slots.iter().filter(move |s| s.section_key == section_key)
    }

    /// Iterates all freed slots.
    pub fn iter(&self) -> impl Iterator<Item = &FreedSlot> {
        self.slots.iter()
    }

    /// Number of freed room-hours.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is being vacated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Move selections of the working set plus the derived freed slots.
#[derive(Debug, Clone, Default)]
pub struct PendingMoveSet {
    selections: BTreeMap<(String, u8, Hour), MoveSelection>,
    freed: FreedSlotSet,
}

fn sort_key(key: &MoveKey) -> (String, u8, Hour) {
    (
        key.section_key.clone(),
        key.day.num_days_from_monday() as u8,
        key.start_hour,
    )
}

impl PendingMoveSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one selected entry per current meeting of `section`.
    pub fn seed(&mut self, section: &Section) {
        for m in &section.meetings {
            let key = MoveKey::new(&section.key, m.day, m.start_hour);
            self.selections.insert(
                sort_key(&key),
                MoveSelection {
                    section_key: section.key.clone(),
                    day: m.day,
                    start_hour: m.start_hour,
                    end_hour: m.end_hour,
                    room: m.room.clone(),
                    selected: true,
                },
            );
        }
        self.rebuild();
    }

    /// Drops every entry of a section.
    pub fn remove_section(&mut self, section_key: &str) {
        self.selections.retain(|(k, _, _), _| k != section_key);
        self.rebuild();
    }

    /// Flips one entry. Returns the new state, or `None` if no such
    /// meeting is tracked.
    pub fn toggle(&mut self, key: &MoveKey) -> Option<bool> {
        let sel = self.selections.get_mut(&sort_key(key))?;
        sel.selected = !sel.selected;
        let state = sel.selected;
        self.rebuild();
        Some(state)
    }

    /// Sets one entry explicitly. Returns `false` if it is not tracked.
    pub fn set_selected(&mut self, key: &MoveKey, selected: bool) -> bool {
        match self.selections.get_mut(&sort_key(key)) {
            Some(sel) => {
                sel.selected = selected;
                self.rebuild();
                true
            }
            None => false,
        }
    }

    /// Whether a meeting is selected for removal.
    ///
    /// Untracked meetings read as selected.
    pub fn is_selected(&self, key: &MoveKey) -> bool {
        self.selections
            .get(&sort_key(key))
            .map_or(true, |s| s.selected)
    }

    /// Entries of a section (selected or not).
    pub fn for_section<'a>(&'a self, section_key: &'a str) -> impl Iterator<Item = &'a MoveSelection> {
        self.selections
            .values()
            .filter(move |s| s.section_key == section_key)
    }

    /// Selected entries of a section.
    pub fn selected_for_section<'a>(
        &'a self,
        section_key: &'a str,
    ) -> impl Iterator<Item = &'a MoveSelection> {
        self.for_section(section_key).filter(|s| s.selected)
    }

    /// Iterates all entries.
    pub fn iter(&self) -> impl Iterator<Item = &MoveSelection> {
        self.selections.values()
    }

    /// The derived freed-slot set.
    pub fn freed(&self) -> &FreedSlotSet {
        &self.freed
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.selections.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.freed = FreedSlotSet::rebuild(self.selections.values());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> Section {
        Section::new("CIGD3212", "01")
            .with_instructor("Dr. A")
            .with_meeting(Weekday::Mon, 9, 11, "r101")
            .with_meeting(Weekday::Wed, 13, 15, "R102")
    }

    #[test]
    fn test_seed_selects_all_meetings() {
        let mut p = PendingMoveSet::new();
        p.seed(&section());

        assert_eq!(p.for_section("CIGD3212-01").count(), 2);
        assert_eq!(p.freed().len(), 4);
        assert!(p.freed().frees_room("R101", Weekday::Mon, 9));
        assert!(p.freed().frees_room("r101", Weekday::Mon, 10));
        assert!(!p.freed().frees_room("R101", Weekday::Mon, 11));
        assert!(p.freed().freed_by("CIGD3212-01", Weekday::Wed, 14));
        assert!(!p.freed().freed_by("OTHER-01", Weekday::Wed, 14));
    }

    #[test]
    fn test_toggle_rebuilds_freed() {
        let mut p = PendingMoveSet::new();
        p.seed(&section());
        let key = MoveKey::new("CIGD3212-01", Weekday::Mon, 9);

        assert_eq!(p.toggle(&key), Some(false));
        assert!(!p.is_selected(&key));
        assert!(!p.freed().frees_room("R101", Weekday::Mon, 9));
        assert_eq!(p.freed().len(), 2);

        assert_eq!(p.toggle(&key), Some(true));
        assert!(p.freed().frees_room("R101", Weekday::Mon, 9));
    }

    #[test]
    fn test_untracked_reads_selected() {
        let mut p = PendingMoveSet::new();
        let key = MoveKey::new("NOPE-01", Weekday::Tue, 8);
        assert!(p.is_selected(&key));
        assert_eq!(p.toggle(&key), None);
        assert!(!p.set_selected(&key, false));
    }

    #[test]
    fn test_remove_section_clears_contribution() {
        let mut p = PendingMoveSet::new();
        p.seed(&section());
        p.seed(
            &Section::new("MATH101", "01")
                .with_instructor("Dr. B")
                .with_meeting(Weekday::Mon, 8, 9, "R200"),
        );
        p.remove_section("CIGD3212-01");

        assert_eq!(p.iter().count(), 1);
        assert_eq!(p.freed().len(), 1);
        assert_eq!(p.freed().for_section("CIGD3212-01").count(), 0);
        assert_eq!(p.freed().on_day(Weekday::Mon).count(), 1);
    }

    #[test]
    fn test_selected_for_section() {
        let mut p = PendingMoveSet::new();
        p.seed(&section());
        p.set_selected(&MoveKey::new("CIGD3212-01", Weekday::Wed, 13), false);
        let selected: Vec<_> = p.selected_for_section("CIGD3212-01").collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].day, Weekday::Mon);
    }
}
