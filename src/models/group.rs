//! Conflict groups.
//!
//! A conflict group is a named partition of the working set (e.g. all
//! year-2 sections) that shares one list of courses its members must not
//! overlap with.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Conflict group identifier (`"group_<n>"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    /// Builds the id for the `n`-th created group.
    pub fn numbered(n: u32) -> Self {
        Self(format!("group_{n}"))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named set of working-set sections with a shared avoid-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictGroup {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Member section keys, in insertion order.
    pub members: Vec<String>,
    /// Course codes the members must not overlap with.
    pub avoid_codes: Vec<String>,
}

impl ConflictGroup {
    /// Creates an empty group.
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
            avoid_codes: Vec::new(),
        }
    }

    /// Whether `key` is a member.
    pub fn contains(&self, key: &str) -> bool {
        self.members.iter().any(|m| m == key)
    }

    /// Removes `key`; returns whether it was a member.
    pub(crate) fn remove_member(&mut self, key: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != key);
        self.members.len() != before
    }
}

/// Normalizes a user-entered avoid-list: trims, uppercases, drops blanks
/// and repeated codes while keeping first-seen order.
pub fn normalize_codes<I, S>(codes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for code in codes {
        let code = code.as_ref().trim().to_uppercase();
        if !code.is_empty() && !out.contains(&code) {
            out.push(code);
        }
    }
    out
}
