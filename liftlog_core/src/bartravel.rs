//! Bar-travel distance statistics.
//!
//! Stateless fun-fact layer over total qualifying rep counts: each
//! canonical lift has a fixed full-rep travel distance, and the summed
//! distances are converted across units and compared against landmark
//! heights. Recomputed fully from totals each run.

use crate::canonical::AliasTable;
use crate::metrics::{round1, round2};
use crate::{CanonicalLift, Snapshot};
use serde::Serialize;
use std::collections::BTreeMap;

/// Full-rep bar travel per lift, inches (down + up)
pub fn travel_inches_per_rep(lift: CanonicalLift) -> f64 {
    match lift {
        CanonicalLift::Squat => 47.0,
        CanonicalLift::Bench => 38.0,
        CanonicalLift::Deadlift => 50.3,
        CanonicalLift::Ohp => 48.0,
    }
}

/// Landmark heights in inches
const EVEREST_IN: f64 = 29_032.0 * 12.0;
const EMPIRE_STATE_IN: f64 = 1_454.0 * 12.0;
const EIFFEL_TOWER_IN: f64 = 1_083.0 * 12.0;
const STATUE_LIBERTY_IN: f64 = 305.0 * 12.0;

const INCHES_PER_FOOT: f64 = 12.0;
const FEET_PER_MILE: f64 = 5_280.0;
const METERS_PER_INCH: f64 = 0.0254;

/// Travel totals for one lift
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiftTravel {
    pub total_reps: i64,
    pub distance_per_rep_inches: f64,
    pub total_inches: f64,
    pub total_feet: f64,
    pub total_miles: f64,
    pub total_meters: f64,
    pub total_km: f64,
}

/// Combined travel distance in every unit
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TravelTotal {
    pub inches: f64,
    pub feet: f64,
    pub miles: f64,
    pub meters: f64,
    pub km: f64,
}

/// Ratios of total travel against landmark heights
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Landmarks {
    pub everest_climbs: f64,
    pub empire_state_climbs: f64,
    pub eiffel_tower_climbs: f64,
    pub statue_of_liberty_climbs: f64,
}

/// The full bar-travel section of the report
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarTravel {
    pub by_lift: BTreeMap<CanonicalLift, LiftTravel>,
    pub total: TravelTotal,
    pub landmarks: Landmarks,
    pub distance_per_rep_inches: BTreeMap<CanonicalLift, f64>,
}

/// Compute bar-travel statistics from total working reps per lift
pub fn bar_travel(snapshot: &Snapshot, aliases: &AliasTable) -> BarTravel {
    let mut reps: BTreeMap<CanonicalLift, i64> = BTreeMap::new();
    for row in snapshot.working_rows() {
        if let Some(lift) = aliases.lookup(row.exercise_name) {
            *reps.entry(lift).or_insert(0) += i64::from(row.reps);
        }
    }

    let mut by_lift = BTreeMap::new();
    let mut total_inches = 0.0;
    for lift in CanonicalLift::ALL {
        let total_reps = reps.get(&lift).copied().unwrap_or(0);
        let per_rep = travel_inches_per_rep(lift);
        let inches = total_reps as f64 * per_rep;
        total_inches += inches;

        let feet = inches / INCHES_PER_FOOT;
        let meters = inches * METERS_PER_INCH;
        by_lift.insert(
            lift,
            LiftTravel {
                total_reps,
                distance_per_rep_inches: per_rep,
                total_inches: round2(inches),
                total_feet: round2(feet),
                total_miles: round2(feet / FEET_PER_MILE),
                total_meters: round2(meters),
                total_km: round2(meters / 1_000.0),
            },
        );
    }

    let total_feet = total_inches / INCHES_PER_FOOT;
    let total_meters = total_inches * METERS_PER_INCH;

    BarTravel {
        by_lift,
        total: TravelTotal {
            inches: round2(total_inches),
            feet: round2(total_feet),
            miles: round2(total_feet / FEET_PER_MILE),
            meters: round2(total_meters),
            km: round2(total_meters / 1_000.0),
        },
        landmarks: Landmarks {
            everest_climbs: round2(total_inches / EVEREST_IN),
            empire_state_climbs: round1(total_inches / EMPIRE_STATE_IN),
            eiffel_tower_climbs: round1(total_inches / EIFFEL_TOWER_IN),
            statue_of_liberty_climbs: round1(total_inches / STATUE_LIBERTY_IN),
        },
        distance_per_rep_inches: CanonicalLift::ALL
            .into_iter()
            .map(|lift| (lift, travel_inches_per_rep(lift)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Exercise, Session, SetEntry};
    use chrono::NaiveDate;

    fn snapshot(reps: i32) -> Snapshot {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Snapshot::new(
            vec![Session {
                id: 1,
                date_ms: date.and_hms_opt(8, 0, 0).unwrap().and_utc().timestamp_millis(),
                duration_minutes: 45.0,
                program_id: None,
                day_name: None,
            }],
            vec![SetEntry {
                session_id: 1,
                exercise_id: 1,
                weight_kg: 100.0,
                weight_lbs: 220.46,
                reps,
                set_number: 1,
            }],
            vec![Exercise {
                id: 1,
                name: "Squat".into(),
            }],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_travel_accumulates_per_lift() {
        let travel = bar_travel(&snapshot(10), &AliasTable::default());
        let squat = travel.by_lift.get(&CanonicalLift::Squat).unwrap();
        assert_eq!(squat.total_reps, 10);
        assert_eq!(squat.total_inches, 470.0);
        assert_eq!(travel.total.inches, 470.0);
    }

    #[test]
    fn test_unit_conversions() {
        let travel = bar_travel(&snapshot(100), &AliasTable::default());
        let squat = travel.by_lift.get(&CanonicalLift::Squat).unwrap();
        assert_eq!(squat.total_feet, round2(4_700.0 / 12.0));
        assert_eq!(squat.total_meters, round2(4_700.0 * 0.0254));
    }

    #[test]
    fn test_all_lifts_present_without_data() {
        let travel = bar_travel(&Snapshot::default(), &AliasTable::default());
        assert_eq!(travel.by_lift.len(), 4);
        assert_eq!(
            travel.by_lift.get(&CanonicalLift::Bench).unwrap().total_reps,
            0
        );
        assert_eq!(travel.total.miles, 0.0);
    }
}
