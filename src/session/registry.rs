//! Conflict group registry.
//!
//! Holds the conflict groups of a session in creation order. The
//! registry alone enforces the partition invariant: a section key is a
//! member of at most one group, because every move removes it from its
//! old group before adding it to the new one.

use crate::config::EngineConfig;
use crate::models::{normalize_codes, ConflictGroup, GroupId};

/// Conflict groups of one session.
#[derive(Debug, Clone)]
pub struct ConflictGroupRegistry {
    groups: Vec<ConflictGroup>,
    next_id: u32,
}

impl Default for ConflictGroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictGroupRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            next_id: 1,
        }
    }

    /// Creates a group. Without a name, the next default name from
    /// `config` is used.
    pub fn create(&mut self, name: Option<&str>, config: &EngineConfig) -> GroupId {
        let n = self.next_id;
        self.next_id += 1;
        let id = GroupId::numbered(n);
        let name = match name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => config.group_name(n),
        };
        self.groups.push(ConflictGroup::new(id.clone(), name));
        id
    }

    /// The first group, created if none exists.
    pub fn first_or_create(&mut self, config: &EngineConfig) -> GroupId {
        match self.groups.first() {
            Some(g) => g.id.clone(),
            None => self.create(None, config),
        }
    }

    /// Looks up a group.
    pub fn get(&self, id: &GroupId) -> Option<&ConflictGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    fn get_mut(&mut self, id: &GroupId) -> Option<&mut ConflictGroup> {
        self.groups.iter_mut().find(|g| &g.id == id)
    }

    /// Whether a group exists.
    pub fn contains(&self, id: &GroupId) -> bool {
        self.get(id).is_some()
    }

    /// The group a section belongs to.
    pub fn group_of(&self, section_key: &str) -> Option<&ConflictGroup> {
        self.groups.iter().find(|g| g.contains(section_key))
    }

    /// Adds a section to a group. The caller guarantees the section is
    /// not yet a member of any group.
    pub(crate) fn add_member(&mut self, id: &GroupId, section_key: &str) -> bool {
        debug_assert!(
            self.group_of(section_key).is_none(),
            "section {section_key} is already grouped"
        );
        match self.get_mut(id) {
            Some(g) => {
                g.members.push(section_key.to_string());
                true
            }
            None => false,
        }
    }

    /// Detaches a section from whichever group holds it.
    pub(crate) fn detach(&mut self, section_key: &str) -> Option<GroupId> {
        let g = self.groups.iter_mut().find(|g| g.contains(section_key))?;
        g.remove_member(section_key);
        Some(g.id.clone())
    }

    /// Moves a section to another existing group.
    ///
    /// Returns `false` without changes if the target group does not exist.
    pub(crate) fn move_member(&mut self, section_key: &str, to: &GroupId) -> bool {
        if !self.contains(to) {
            return false;
        }
        self.detach(section_key);
        self.add_member(to, section_key)
    }

    /// Removes a group, returning it with its remaining members.
    pub(crate) fn remove(&mut self, id: &GroupId) -> Option<ConflictGroup> {
        let idx = self.groups.iter().position(|g| &g.id == id)?;
        Some(self.groups.remove(idx))
    }

    /// Replaces a group's avoid-list wholesale.
    pub fn set_avoid_codes<I, S>(&mut self, id: &GroupId, codes: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.get_mut(id) {
            Some(g) => {
                g.avoid_codes = normalize_codes(codes);
                true
            }
            None => false,
        }
    }

    /// Renames a group. Blank names are ignored.
    pub fn rename(&mut self, id: &GroupId, name: &str) -> bool {
        let name = name.trim();
        match self.get_mut(id) {
            Some(g) if !name.is_empty() => {
                g.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    /// Groups in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ConflictGroup> {
        self.groups.iter()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Removes all groups and restarts numbering at 1.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.next_id = 1;
    }
}
