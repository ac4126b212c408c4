//! Program history summaries.
//!
//! Groups sessions by the program they belonged to and reports each
//! program's date range, workout count, volume, and how many distinct
//! (exercise, rep-count) pairs set a PR while the program ran. Sessions
//! without a program reference are not attributed to any program.

use crate::metrics::round2;
use crate::{ExerciseId, ProgramId, Snapshot};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Summary of one training program
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSummary {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub workouts: usize,
    pub total_volume_lbs: f64,
    pub total_volume_kg: f64,
    pub prs_set: usize,
}

/// Summaries for every program with at least one session, ordered by
/// start date
pub fn program_summaries(snapshot: &Snapshot) -> Vec<ProgramSummary> {
    struct Acc {
        start: NaiveDate,
        end: NaiveDate,
        workouts: usize,
        volume_lbs: f64,
        volume_kg: f64,
    }

    let mut by_program: BTreeMap<ProgramId, Acc> = BTreeMap::new();
    for totals in snapshot.session_totals() {
        let Some(program_id) = totals.session.program_id else {
            continue;
        };
        let acc = by_program.entry(program_id).or_insert(Acc {
            start: totals.date,
            end: totals.date,
            workouts: 0,
            volume_lbs: 0.0,
            volume_kg: 0.0,
        });
        acc.start = acc.start.min(totals.date);
        acc.end = acc.end.max(totals.date);
        acc.workouts += 1;
        acc.volume_lbs += totals.volume_lbs;
        acc.volume_kg += totals.volume_kg;
    }

    let pr_events = pr_event_dates(snapshot);

    let mut summaries: Vec<ProgramSummary> = by_program
        .into_iter()
        .map(|(program_id, acc)| {
            // Distinct pairs that improved an existing record in range
            let pairs: BTreeSet<(ExerciseId, i32)> = pr_events
                .iter()
                .filter(|(date, _, _)| *date >= acc.start && *date <= acc.end)
                .map(|(_, exercise_id, reps)| (*exercise_id, *reps))
                .collect();
            ProgramSummary {
                name: snapshot
                    .program_name(program_id)
                    .unwrap_or("Unknown Program")
                    .to_string(),
                start_date: acc.start,
                end_date: acc.end,
                workouts: acc.workouts,
                total_volume_lbs: round2(acc.volume_lbs),
                total_volume_kg: round2(acc.volume_kg),
                prs_set: pairs.len(),
            }
        })
        .collect();

    summaries.sort_by_key(|s| s.start_date);
    summaries
}

/// Dates on which a (exercise, rep-count) pair improved its prior
/// daily-maximum record
///
/// A pair's first-ever training day establishes the baseline and is not
/// counted as a PR here.
fn pr_event_dates(snapshot: &Snapshot) -> Vec<(NaiveDate, ExerciseId, i32)> {
    // Daily max weight per (exercise, reps)
    let mut daily_max: BTreeMap<(ExerciseId, i32), BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for row in snapshot.working_rows() {
        let day = daily_max
            .entry((row.exercise_id, row.reps))
            .or_default()
            .entry(row.date)
            .or_insert(0.0);
        if row.weight_lbs > *day {
            *day = row.weight_lbs;
        }
    }

    let mut events = Vec::new();
    for ((exercise_id, reps), days) in daily_max {
        let mut prev_max: Option<f64> = None;
        for (date, max) in days {
            if let Some(prev) = prev_max {
                if max > prev {
                    events.push((date, exercise_id, reps));
                }
            }
            prev_max = Some(prev_max.map_or(max, |p: f64| p.max(max)));
        }
    }
    events
}
