//! One-shot milestone detection.
//!
//! Two kinds of fixed ascending threshold ladders, each walked forward in
//! chronological order with a cursor that only ever advances:
//! - cumulative ladders over total volume and total workout count
//! - per-lift "plate" ladders over the day's heaviest working set
//!
//! A threshold is emitted at most once, at the earliest date the running
//! quantity reaches it. A single large session may cross several
//! thresholds at once.

use crate::canonical::AliasTable;
use crate::metrics::{round1, round2};
use crate::{CanonicalLift, Snapshot};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cumulative total-volume thresholds, lbs
pub const VOLUME_LADDER: [f64; 13] = [
    100_000.0,
    250_000.0,
    500_000.0,
    750_000.0,
    1_000_000.0,
    1_500_000.0,
    2_000_000.0,
    2_500_000.0,
    3_000_000.0,
    4_000_000.0,
    5_000_000.0,
    6_000_000.0,
    7_000_000.0,
];

/// Cumulative workout-count thresholds
pub const WORKOUT_LADDER: [u64; 7] = [100, 250, 500, 750, 1000, 1250, 1500];

/// Per-side plate counts and the matching bar weight, lbs
pub const PLATE_LADDER: [(u8, f64); 5] = [
    (1, 135.0),
    (2, 225.0),
    (3, 315.0),
    (4, 405.0),
    (5, 495.0),
];

const KG_PER_LB: f64 = 0.453_592;

/// A crossed cumulative milestone
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub date: NaiveDate,
    pub milestone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
}

/// First achievement of one plate threshold
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlateMilestone {
    pub date: NaiveDate,
    pub weight_lbs: f64,
    pub weight_kg: f64,
    pub actual_weight_lbs: f64,
    pub actual_weight_kg: f64,
}

/// Volume and workout-count milestones in chronological order
pub fn cumulative_milestones(snapshot: &Snapshot) -> Vec<Milestone> {
    let mut milestones = Vec::new();
    let mut cumulative_volume = 0.0;
    let mut workout_count = 0u64;
    let mut volume_idx = 0;
    let mut workout_idx = 0;

    for totals in snapshot.session_totals() {
        cumulative_volume += totals.volume_lbs;
        workout_count += 1;

        while volume_idx < VOLUME_LADDER.len() && cumulative_volume >= VOLUME_LADDER[volume_idx] {
            milestones.push(Milestone {
                date: totals.date,
                milestone: format!(
                    "{} lbs total volume",
                    format_thousands(VOLUME_LADDER[volume_idx] as u64)
                ),
                kind: "volume".into(),
                icon: "📊".into(),
            });
            volume_idx += 1;
        }

        while workout_idx < WORKOUT_LADDER.len() && workout_count >= WORKOUT_LADDER[workout_idx] {
            milestones.push(Milestone {
                date: totals.date,
                milestone: format!("{} workouts completed", WORKOUT_LADDER[workout_idx]),
                kind: "workouts".into(),
                icon: "🏋️".into(),
            });
            workout_idx += 1;
        }
    }

    milestones.sort_by_key(|m| m.date);
    milestones
}

/// Plate milestones per canonical lift
///
/// Walks each lift's daily maximum working-set weight forward by date;
/// records each threshold once at its first crossing, together with the
/// actual weight that triggered it. Lifts with no recorded sets are
/// absent.
pub fn plate_milestones(
    snapshot: &Snapshot,
    aliases: &AliasTable,
) -> BTreeMap<CanonicalLift, BTreeMap<u8, PlateMilestone>> {
    // Daily max weight per lift
    let mut daily_max: BTreeMap<CanonicalLift, BTreeMap<NaiveDate, (f64, f64)>> = BTreeMap::new();
    for row in snapshot.working_rows() {
        let Some(lift) = aliases.lookup(row.exercise_name) else {
            continue;
        };
        let day = daily_max
            .entry(lift)
            .or_default()
            .entry(row.date)
            .or_insert((0.0, 0.0));
        if row.weight_lbs > day.0 {
            *day = (row.weight_lbs, row.weight_kg);
        }
    }

    daily_max
        .into_iter()
        .map(|(lift, days)| {
            let mut achieved: BTreeMap<u8, PlateMilestone> = BTreeMap::new();
            for (date, (max_lbs, max_kg)) in days {
                for (plates, threshold) in PLATE_LADDER {
                    if !achieved.contains_key(&plates) && max_lbs >= threshold {
                        achieved.insert(
                            plates,
                            PlateMilestone {
                                date,
                                weight_lbs: threshold,
                                weight_kg: round1(threshold * KG_PER_LB),
                                actual_weight_lbs: round2(max_lbs),
                                actual_weight_kg: round2(max_kg),
                            },
                        );
                    }
                }
            }
            (lift, achieved)
        })
        .collect()
}

/// Format an integer with comma thousands separators
fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Exercise, Session, SetEntry};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ms(date: NaiveDate) -> i64 {
        date.and_hms_opt(7, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    fn snapshot(name: &str, sets: Vec<(NaiveDate, f64, i32)>) -> Snapshot {
        let mut sessions = Vec::new();
        let mut entries = Vec::new();
        for (i, (date, lbs, reps)) in sets.into_iter().enumerate() {
            let id = i as i64 + 1;
            sessions.push(Session {
                id,
                date_ms: ms(date),
                duration_minutes: 45.0,
                program_id: None,
                day_name: None,
            });
            entries.push(SetEntry {
                session_id: id,
                exercise_id: 1,
                weight_kg: lbs * 0.453592,
                weight_lbs: lbs,
                reps,
                set_number: 1,
            });
        }
        Snapshot::new(
            sessions,
            entries,
            vec![Exercise {
                id: 1,
                name: name.into(),
            }],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_volume_milestone_at_crossing_session() {
        // Cumulative volume: 40k, 70k, 120k -> single crossing at the third
        let snap = snapshot(
            "Squat",
            vec![
                (day(2024, 1, 1), 4_000.0, 10),
                (day(2024, 1, 8), 3_000.0, 10),
                (day(2024, 1, 15), 5_000.0, 10),
            ],
        );
        let milestones = cumulative_milestones(&snap);
        let volume: Vec<_> = milestones.iter().filter(|m| m.kind == "volume").collect();
        assert_eq!(volume.len(), 1);
        assert_eq!(volume[0].date, day(2024, 1, 15));
        assert_eq!(volume[0].milestone, "100,000 lbs total volume");
    }

    #[test]
    fn test_thresholds_emitted_once_in_ascending_order() {
        // One huge session crosses the first two volume thresholds at once
        let snap = snapshot("Deadlift", vec![(day(2024, 1, 1), 30_000.0, 10)]);
        let milestones = cumulative_milestones(&snap);
        let volume: Vec<_> = milestones.iter().filter(|m| m.kind == "volume").collect();
        assert_eq!(volume.len(), 2);
        assert!(volume[0].milestone.starts_with("100,000"));
        assert!(volume[1].milestone.starts_with("250,000"));
        assert_eq!(volume[0].date, volume[1].date);
    }

    #[test]
    fn test_plate_milestones_first_crossing() {
        let snap = snapshot(
            "Squat",
            vec![
                (day(2024, 1, 1), 135.0, 5),
                (day(2024, 2, 1), 250.0, 3), // crosses 225 with 250 on the bar
                (day(2024, 3, 1), 230.0, 3), // later, lighter: no new milestone
            ],
        );
        let by_lift = plate_milestones(&snap, &AliasTable::default());
        let squat = by_lift.get(&CanonicalLift::Squat).unwrap();
        assert_eq!(squat.len(), 2);
        assert_eq!(squat[&1].date, day(2024, 1, 1));
        assert_eq!(squat[&2].date, day(2024, 2, 1));
        assert_eq!(squat[&2].weight_lbs, 225.0);
        assert_eq!(squat[&2].actual_weight_lbs, 250.0);
    }

    #[test]
    fn test_unmapped_exercise_has_no_plate_milestones() {
        let snap = snapshot("Leg Press", vec![(day(2024, 1, 1), 400.0, 10)]);
        let by_lift = plate_milestones(&snap, &AliasTable::default());
        assert!(by_lift.is_empty());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(100), "100");
        assert_eq!(format_thousands(100_000), "100,000");
        assert_eq!(format_thousands(1_500_000), "1,500,000");
    }
}
