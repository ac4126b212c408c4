//! Consecutive-day training streak detection.
//!
//! Streaks operate on the set of distinct calendar dates that carry at
//! least one session; several sessions on one date collapse to one day.
//! A streak is unbroken while consecutive dates are exactly one day
//! apart. "Today" is the UTC date of the run.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Longest and current consecutive-day streaks
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub longest: u32,
    pub current: u32,
}

/// Compute streaks over distinct session dates
///
/// The current streak is zero unless the most recent session date is
/// today or yesterday; otherwise it counts backwards until the first gap
/// of more than one day.
pub fn compute_streaks(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> StreakStats {
    let ordered: Vec<NaiveDate> = dates.iter().copied().collect();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &date in &ordered {
        match prev {
            Some(p) if date - p == Duration::days(1) => run += 1,
            _ => run = 1,
        }
        longest = longest.max(run);
        prev = Some(date);
    }

    let current = match ordered.last() {
        Some(&last) if today - last <= Duration::days(1) => {
            let mut count = 1u32;
            for pair in ordered.windows(2).rev() {
                if pair[1] - pair[0] == Duration::days(1) {
                    count += 1;
                } else {
                    break;
                }
            }
            count
        }
        _ => 0,
    };

    StreakStats { longest, current }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(days: &[(i32, u32, u32)]) -> BTreeSet<NaiveDate> {
        days.iter().map(|&(y, m, d)| day(y, m, d)).collect()
    }

    #[test]
    fn test_longest_streak_with_gap() {
        // Three consecutive days, then a gap
        let set = dates(&[(2024, 1, 1), (2024, 1, 2), (2024, 1, 3), (2024, 1, 5)]);
        let stats = compute_streaks(&set, day(2024, 6, 1));
        assert_eq!(stats.longest, 3);
        assert_eq!(stats.current, 0);
    }

    #[test]
    fn test_current_streak_ending_today() {
        let set = dates(&[(2024, 1, 3), (2024, 1, 4), (2024, 1, 5)]);
        let stats = compute_streaks(&set, day(2024, 1, 5));
        assert_eq!(stats.current, 3);
        assert_eq!(stats.longest, 3);
    }

    #[test]
    fn test_current_streak_valid_from_yesterday() {
        let set = dates(&[(2024, 1, 4), (2024, 1, 5)]);
        let stats = compute_streaks(&set, day(2024, 1, 6));
        assert_eq!(stats.current, 2);
    }

    #[test]
    fn test_current_streak_expires_after_yesterday() {
        let set = dates(&[(2024, 1, 4), (2024, 1, 5)]);
        let stats = compute_streaks(&set, day(2024, 1, 7));
        assert_eq!(stats.current, 0);
        assert_eq!(stats.longest, 2);
    }

    #[test]
    fn test_current_streak_stops_at_gap() {
        let set = dates(&[(2024, 1, 1), (2024, 1, 2), (2024, 1, 5), (2024, 1, 6)]);
        let stats = compute_streaks(&set, day(2024, 1, 6));
        assert_eq!(stats.current, 2);
        assert_eq!(stats.longest, 2);
    }

    #[test]
    fn test_empty_history() {
        let stats = compute_streaks(&BTreeSet::new(), day(2024, 1, 1));
        assert_eq!(stats.longest, 0);
        assert_eq!(stats.current, 0);
    }

    #[test]
    fn test_single_date() {
        let set = dates(&[(2024, 1, 5)]);
        assert_eq!(compute_streaks(&set, day(2024, 1, 5)).current, 1);
        assert_eq!(compute_streaks(&set, day(2024, 1, 5)).longest, 1);
    }
}
