//! Headline lifetime statistics.
//!
//! One flat block of totals and averages over the whole training log,
//! plus the single best month and best year by volume.

use crate::buckets::month_key;
use crate::metrics::{round1, round2};
use crate::Snapshot;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Best calendar month by total working volume
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BestMonth {
    pub month: String,
    pub volume_lbs: f64,
    pub volume_kg: f64,
}

/// Best calendar year by total working volume
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BestYear {
    pub year: i32,
    pub volume_lbs: f64,
    pub volume_kg: f64,
    pub workouts: usize,
}

/// Lifetime summary block of the report
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_workouts: usize,
    pub total_sets: usize,
    pub total_volume_lbs: f64,
    pub total_volume_kg: f64,
    pub total_hours: f64,
    pub total_reps: i64,
    pub total_tons: f64,
    pub best_month_ever: Option<BestMonth>,
    pub best_year_ever: Option<BestYear>,
    pub first_workout: Option<NaiveDate>,
    pub last_workout: Option<NaiveDate>,
    pub avg_workout_duration: f64,
    pub avg_volume_per_workout_lbs: f64,
    pub avg_volume_per_workout_kg: f64,
    pub avg_sets_per_workout: f64,
    pub workouts_per_week_avg: f64,
}

/// Compute the lifetime summary; every average degrades to zero on an
/// empty log rather than dividing by zero
pub fn lifetime_summary(snapshot: &Snapshot) -> Summary {
    let totals = snapshot.session_totals();
    let workouts = totals.len();

    let mut volume_lbs = 0.0;
    let mut volume_kg = 0.0;
    let mut minutes = 0.0;
    let mut sets = 0;
    for t in &totals {
        volume_lbs += t.volume_lbs;
        volume_kg += t.volume_kg;
        minutes += t.session.duration_minutes;
        sets += t.working_sets;
    }
    // Straight over the raw sets: a set whose exercise row is gone still
    // counts, matching the volume and set totals above
    let reps: i64 = snapshot
        .sets()
        .iter()
        .filter(|e| e.is_working())
        .map(|e| i64::from(e.reps))
        .sum();

    // Volume per month / year
    let mut monthly: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    let mut yearly: BTreeMap<i32, (f64, f64, usize)> = BTreeMap::new();
    for t in &totals {
        let m = monthly.entry(month_key(t.date)).or_insert((0.0, 0.0));
        m.0 += t.volume_lbs;
        m.1 += t.volume_kg;
        let y = yearly.entry(t.date.year()).or_insert((0.0, 0.0, 0));
        y.0 += t.volume_lbs;
        y.1 += t.volume_kg;
        y.2 += 1;
    }
    let best_month_ever = monthly
        .into_iter()
        .max_by(|a, b| a.1 .0.total_cmp(&b.1 .0))
        .map(|(month, (lbs, kg))| BestMonth {
            month,
            volume_lbs: round2(lbs),
            volume_kg: round2(kg),
        });
    let best_year_ever = yearly
        .into_iter()
        .max_by(|a, b| a.1 .0.total_cmp(&b.1 .0))
        .map(|(year, (lbs, kg, count))| BestYear {
            year,
            volume_lbs: round2(lbs),
            volume_kg: round2(kg),
            workouts: count,
        });

    let first_workout = totals.first().map(|t| t.date);
    let last_workout = totals.last().map(|t| t.date);

    let per_workout = |value: f64| {
        if workouts > 0 {
            value / workouts as f64
        } else {
            0.0
        }
    };
    let workouts_per_week_avg = match (first_workout, last_workout) {
        (Some(first), Some(last)) => {
            let weeks = ((last - first).num_days() + 1) as f64 / 7.0;
            round1(workouts as f64 / weeks)
        }
        _ => 0.0,
    };

    Summary {
        total_workouts: workouts,
        total_sets: sets,
        total_volume_lbs: round2(volume_lbs),
        total_volume_kg: round2(volume_kg),
        total_hours: round1(minutes / 60.0),
        total_reps: reps,
        total_tons: round1(volume_lbs / 2000.0),
        best_month_ever,
        best_year_ever,
        first_workout,
        last_workout,
        avg_workout_duration: round1(per_workout(minutes)),
        avg_volume_per_workout_lbs: round2(per_workout(volume_lbs)),
        avg_volume_per_workout_kg: round2(per_workout(volume_kg)),
        avg_sets_per_workout: round1(per_workout(sets as f64)),
        workouts_per_week_avg,
    }
}
