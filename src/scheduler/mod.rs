//! Greedy auto-assignment of candidate windows.
//!
//! # Algorithm
//!
//! `AutoAssigner` ranks every window of a search once, then walks the
//! working set in order and hands each section its best remaining windows
//! until its weekly frequency is met. It is a single-pass heuristic: fast
//! and deterministic, but not optimal.
//!
//! # Ranking
//!
//! `rank_windows` orders windows by start hour (with a penalty for the
//! restricted afternoon), then by the requested day order, then by start
//! hour.

mod auto;
mod ranking;

pub use auto::{AutoAssignOutcome, AutoAssigner, Unassigned, NO_SLOTS_WARNING};
pub use ranking::{rank_windows, window_score, RankedWindow};
