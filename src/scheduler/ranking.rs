//! Window ranking for auto-assignment.
//!
//! Windows from every searched day are merged into one list and ordered
//! sequentially by three keys, each used only to break ties in the one
//! before it:
//!
//! 1. score = start hour, plus the afternoon penalty when the window
//!    starts in the restricted afternoon (Thursday from 14:00 by default)
//! 2. position of the day in the request's day list
//! 3. start hour
//!
//! The sort is stable, so equal windows keep their search order.

use crate::config::EngineConfig;
use crate::models::{Hour, Weekday};
use crate::search::{CandidateSlot, SearchOutcome};

/// A candidate window with its ranking keys.
#[derive(Debug, Clone, Copy)]
pub struct RankedWindow<'a> {
    pub slot: &'a CandidateSlot,
    /// Primary key; lower is better.
    pub score: u32,
    /// Index of the window's day in the searched day list.
    pub day_index: usize,
}

/// Primary ranking score of a window start.
pub fn window_score(day: Weekday, start_hour: Hour, config: &EngineConfig) -> u32 {
    let penalty = if config.is_restricted_afternoon(day, start_hour) {
        config.afternoon_penalty
    } else {
        0
    };
    u32::from(start_hour).saturating_add(penalty)
}

/// Ranks every window of `outcome`, best first.
pub fn rank_windows<'a>(outcome: &'a SearchOutcome, config: &EngineConfig) -> Vec<RankedWindow<'a>> {
    let mut ranked: Vec<RankedWindow<'a>> = outcome
        .days
        .iter()
        .enumerate()
        .flat_map(move |(day_index, &day)| {
            outcome.slots_on(day).iter().map(move |slot| RankedWindow {
                slot,
                score: window_score(day, slot.start_hour, config),
                day_index,
            })
        })
        .collect();

    ranked.sort_by_key(|w| (w.score, w.day_index, w.slot.start_hour));
    ranked
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn slot(day: Weekday, start: Hour) -> CandidateSlot {
        CandidateSlot {
            day,
            start_hour: start,
            end_hour: start + 2,
            classrooms: vec!["R1".into()],
            eligible_sections: vec!["A-01".into()],
            ineligible_sections: Vec::new(),
        }
    }

    fn outcome(days: Vec<Weekday>, slots: Vec<CandidateSlot>) -> SearchOutcome {
        let mut slots_by_day: HashMap<Weekday, Vec<CandidateSlot>> = HashMap::new();
        for s in slots {
            slots_by_day.entry(s.day).or_default().push(s);
        }
        SearchOutcome {
            days,
            slots_by_day,
            unresolved_avoid_codes: Vec::new(),
        }
    }

    #[test]
    fn test_window_score_penalizes_thursday_afternoon() {
        let config = EngineConfig::default();
        assert_eq!(window_score(Weekday::Mon, 15, &config), 15);
        assert_eq!(window_score(Weekday::Thu, 13, &config), 13);
        assert_eq!(window_score(Weekday::Thu, 14, &config), 114);
    }

    #[test]
    fn test_window_score_saturates() {
        let config = EngineConfig {
            afternoon_penalty: u32::MAX,
            ..EngineConfig::default()
        };
        assert_eq!(window_score(Weekday::Thu, 15, &config), u32::MAX);
        assert_eq!(window_score(Weekday::Thu, 9, &config), 9);
    }

    #[test]
    fn test_rank_orders_by_hour_then_day() {
        let config = EngineConfig::default();
        let o = outcome(
            vec![Weekday::Tue, Weekday::Mon],
            vec![
                slot(Weekday::Mon, 8),
                slot(Weekday::Mon, 10),
                slot(Weekday::Tue, 9),
                slot(Weekday::Tue, 8),
            ],
        );
        let order: Vec<_> = rank_windows(&o, &config)
            .iter()
            .map(|w| (w.slot.day, w.slot.start_hour))
            .collect();
        assert_eq!(
            order,
            vec![
                (Weekday::Tue, 8),
                (Weekday::Mon, 8),
                (Weekday::Tue, 9),
                (Weekday::Mon, 10),
            ]
        );
    }

    #[test]
    fn test_thursday_afternoon_ranks_last() {
        let config = EngineConfig::default();
        let o = outcome(
            vec![Weekday::Thu, Weekday::Fri],
            vec![slot(Weekday::Thu, 14), slot(Weekday::Fri, 16)],
        );
        let ranked = rank_windows(&o, &config);
        assert_eq!(ranked[0].slot.day, Weekday::Fri);
        assert_eq!(ranked[1].score, 114);
    }
}
