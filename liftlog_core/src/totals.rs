//! Powerlifting composite-total tracking.
//!
//! Combines the squat, bench and deadlift running best estimated maxima
//! into one total. The walk visits the sorted union of all dates on which
//! any of the three lifts was trained; a lift not trained on a given date
//! keeps its prior running maximum, so the total never decreases.

use crate::canonical::AliasTable;
use crate::metrics::{estimated_max, round2, E1RM_MAX_REPS};
use crate::{CanonicalLift, Snapshot};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Composite-total thresholds ("the clubs"), lbs
pub const CLUB_LADDER: [u32; 8] = [500, 750, 1000, 1100, 1200, 1300, 1400, 1500];

/// One point of the composite-total series
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TotalPoint {
    pub date: NaiveDate,
    pub total_lbs: f64,
    pub total_kg: f64,
    pub squat_e1rm: f64,
    pub bench_e1rm: f64,
    pub deadlift_e1rm: f64,
}

/// Values at the first crossing of one club threshold
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClubMilestone {
    pub date: NaiveDate,
    pub total_lbs: f64,
    pub total_kg: f64,
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
}

/// Full composite-total result
///
/// The report serializes only current/peak/club milestones; the history
/// feeds those and the tests.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerliftingTotals {
    #[serde(skip_serializing)]
    pub history: Vec<TotalPoint>,
    pub current: Option<TotalPoint>,
    pub peak: Option<TotalPoint>,
    pub club_milestones: BTreeMap<u32, ClubMilestone>,
}

/// Track the composite total over the union of big-three training dates
pub fn powerlifting_totals(snapshot: &Snapshot, aliases: &AliasTable) -> PowerliftingTotals {
    // Best e1RM per (lift, date), reps 1-10 only
    let mut daily_best: BTreeMap<CanonicalLift, BTreeMap<NaiveDate, (f64, f64)>> = BTreeMap::new();
    for row in snapshot.working_rows() {
        let Some(lift) = aliases.lookup(row.exercise_name) else {
            continue;
        };
        if !CanonicalLift::BIG_THREE.contains(&lift) || row.reps > E1RM_MAX_REPS {
            continue;
        }

        let e1rm_lbs = estimated_max(row.weight_lbs, row.reps);
        let e1rm_kg = estimated_max(row.weight_kg, row.reps);
        let day = daily_best
            .entry(lift)
            .or_default()
            .entry(row.date)
            .or_insert((0.0, 0.0));
        if e1rm_lbs > day.0 {
            *day = (e1rm_lbs, e1rm_kg);
        }
    }

    // Sorted union of all training dates
    let mut dates: Vec<NaiveDate> = daily_best
        .values()
        .flat_map(|days| days.keys().copied())
        .collect();
    dates.sort();
    dates.dedup();

    let mut running_lbs: BTreeMap<CanonicalLift, f64> = BTreeMap::new();
    let mut running_kg: BTreeMap<CanonicalLift, f64> = BTreeMap::new();
    let mut history = Vec::with_capacity(dates.len());
    let mut club_milestones: BTreeMap<u32, ClubMilestone> = BTreeMap::new();

    for date in dates {
        for lift in CanonicalLift::BIG_THREE {
            if let Some(&(lbs, kg)) = daily_best.get(&lift).and_then(|days| days.get(&date)) {
                let best = running_lbs.entry(lift).or_insert(0.0);
                if lbs > *best {
                    *best = lbs;
                    running_kg.insert(lift, kg);
                }
            }
        }

        let at = |lift: CanonicalLift| running_lbs.get(&lift).copied().unwrap_or(0.0);
        let at_kg = |lift: CanonicalLift| running_kg.get(&lift).copied().unwrap_or(0.0);
        let total_lbs: f64 = CanonicalLift::BIG_THREE.iter().map(|&l| at(l)).sum();
        let total_kg: f64 = CanonicalLift::BIG_THREE.iter().map(|&l| at_kg(l)).sum();

        let point = TotalPoint {
            date,
            total_lbs: round2(total_lbs),
            total_kg: round2(total_kg),
            squat_e1rm: round2(at(CanonicalLift::Squat)),
            bench_e1rm: round2(at(CanonicalLift::Bench)),
            deadlift_e1rm: round2(at(CanonicalLift::Deadlift)),
        };

        for threshold in CLUB_LADDER {
            if !club_milestones.contains_key(&threshold) && total_lbs >= f64::from(threshold) {
                club_milestones.insert(
                    threshold,
                    ClubMilestone {
                        date,
                        total_lbs: point.total_lbs,
                        total_kg: point.total_kg,
                        squat: point.squat_e1rm,
                        bench: point.bench_e1rm,
                        deadlift: point.deadlift_e1rm,
                    },
                );
            }
        }

        history.push(point);
    }

    let current = history.last().cloned();
    // Earliest occurrence wins ties for the peak
    let mut peak: Option<TotalPoint> = None;
    for point in &history {
        if peak
            .as_ref()
            .map_or(true, |best| point.total_lbs > best.total_lbs)
        {
            peak = Some(point.clone());
        }
    }

    PowerliftingTotals {
        history,
        current,
        peak,
        club_milestones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Exercise, Session, SetEntry};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ms(date: NaiveDate) -> i64 {
        date.and_hms_opt(17, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    /// Sessions with one named set each
    fn snapshot(sets: Vec<(NaiveDate, &str, f64, i32)>) -> Snapshot {
        let mut sessions = Vec::new();
        let mut entries = Vec::new();
        let mut exercises = Vec::new();
        for (i, (date, name, lbs, reps)) in sets.into_iter().enumerate() {
            let id = i as i64 + 1;
            sessions.push(Session {
                id,
                date_ms: ms(date),
                duration_minutes: 45.0,
                program_id: None,
                day_name: None,
            });
            let exercise_id = match exercises.iter().find(|e: &&Exercise| e.name == name) {
                Some(e) => e.id,
                None => {
                    let eid = exercises.len() as i64 + 1;
                    exercises.push(Exercise {
                        id: eid,
                        name: name.into(),
                    });
                    eid
                }
            };
            entries.push(SetEntry {
                session_id: id,
                exercise_id,
                weight_kg: lbs * 0.453592,
                weight_lbs: lbs,
                reps,
                set_number: 1,
            });
        }
        Snapshot::new(sessions, entries, exercises, vec![], vec![])
    }

    #[test]
    fn test_total_is_sum_of_running_maxima() {
        let snap = snapshot(vec![
            (day(2024, 1, 1), "Squat", 300.0, 1),
            (day(2024, 1, 2), "Bench Press", 200.0, 1),
            (day(2024, 1, 3), "Deadlift", 350.0, 1),
        ]);
        let totals = powerlifting_totals(&snap, &AliasTable::default());
        assert_eq!(totals.history.len(), 3);
        let last = totals.current.as_ref().unwrap();
        assert_eq!(last.total_lbs, 850.0);
        assert_eq!(last.squat_e1rm, 300.0);
        assert_eq!(last.bench_e1rm, 200.0);
        assert_eq!(last.deadlift_e1rm, 350.0);
    }

    #[test]
    fn test_untrained_lift_retains_prior_maximum() {
        let snap = snapshot(vec![
            (day(2024, 1, 1), "Squat", 300.0, 1),
            (day(2024, 1, 8), "Squat", 280.0, 1), // lighter day: max holds
        ]);
        let totals = powerlifting_totals(&snap, &AliasTable::default());
        assert_eq!(totals.history[1].squat_e1rm, 300.0);
        assert_eq!(totals.history[1].total_lbs, 300.0);
    }

    #[test]
    fn test_club_milestone_first_crossing() {
        let snap = snapshot(vec![
            (day(2024, 1, 1), "Squat", 200.0, 1),
            (day(2024, 1, 2), "Bench Press", 150.0, 1),
            (day(2024, 1, 3), "Deadlift", 250.0, 1), // total hits 600
        ]);
        let totals = powerlifting_totals(&snap, &AliasTable::default());
        let club = totals.club_milestones.get(&500).unwrap();
        assert_eq!(club.date, day(2024, 1, 3));
        assert_eq!(club.total_lbs, 600.0);
        assert!(!totals.club_milestones.contains_key(&750));
    }

    #[test]
    fn test_peak_prefers_earliest_on_tie() {
        let snap = snapshot(vec![
            (day(2024, 1, 1), "Squat", 300.0, 1),
            (day(2024, 2, 1), "Squat", 280.0, 1),
        ]);
        let totals = powerlifting_totals(&snap, &AliasTable::default());
        assert_eq!(totals.peak.as_ref().unwrap().date, day(2024, 1, 1));
    }

    #[test]
    fn test_high_rep_sets_excluded() {
        let snap = snapshot(vec![(day(2024, 1, 1), "Squat", 200.0, 20)]);
        let totals = powerlifting_totals(&snap, &AliasTable::default());
        assert!(totals.history.is_empty());
        assert!(totals.current.is_none());
        assert!(totals.peak.is_none());
    }

    #[test]
    fn test_ohp_does_not_enter_total() {
        let snap = snapshot(vec![
            (day(2024, 1, 1), "Squat", 300.0, 1),
            (day(2024, 1, 2), "Overhead Press", 150.0, 1),
        ]);
        let totals = powerlifting_totals(&snap, &AliasTable::default());
        assert_eq!(totals.history.len(), 1);
        assert_eq!(totals.current.as_ref().unwrap().total_lbs, 300.0);
    }
}
