//! Personal-record tracking.
//!
//! Three related reductions over chronologically ordered working sets:
//! - per-exercise best weight per rep-count (raw names, every exercise)
//! - the all-time PR table for the canonical lifts (reps 1-10, with e1RM)
//! - days since the running maximum last increased, per canonical lift
//!
//! Every running maximum is strictly increasing: a later set at equal or
//! lower weight never supersedes an existing record.

use crate::canonical::AliasTable;
use crate::metrics::{estimated_max, round2, set_volume, E1RM_MAX_REPS};
use crate::{CanonicalLift, Snapshot};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// The best recorded weight for one (exercise, rep-count) pair
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrRecord {
    pub date: NaiveDate,
    pub weight_lbs: f64,
    pub weight_kg: f64,
    pub reps: i32,
}

/// Aggregate statistics and PR records for one exercise (raw name)
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
    pub total_volume_lbs: f64,
    pub total_volume_kg: f64,
    pub first_performed: NaiveDate,
    pub last_performed: NaiveDate,
    pub prs: Vec<PrRecord>,
}

/// Max weight and derived e1RM at one rep-count
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepPr {
    pub weight_lbs: f64,
    pub weight_kg: f64,
    pub e1rm_lbs: f64,
    pub e1rm_kg: f64,
}

/// Heaviest weight ever lifted, any rep-count
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaxEver {
    pub weight_lbs: f64,
    pub weight_kg: f64,
}

/// All-time PR table for one canonical lift
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTimePr {
    #[serde(rename = "repPRs")]
    pub rep_prs: BTreeMap<i32, RepPr>,
    pub max_ever: MaxEver,
    pub best_e1rm: Option<RepPr>,
}

/// One point of a canonical lift's estimated-max history
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct E1rmPoint {
    pub date: NaiveDate,
    pub e1rm_lbs: f64,
    pub e1rm_kg: f64,
    pub actual_weight_lbs: f64,
    pub actual_weight_kg: f64,
    pub reps: i32,
}

/// Estimated-max history for one canonical lift
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftE1rmSeries {
    pub exercise_name: String,
    pub e1rm_history: Vec<E1rmPoint>,
}

/// Per-exercise progress and PR records, ordered by total volume descending
///
/// Exercises are keyed by raw display name (not canonicalized), so every
/// logged movement appears here regardless of alias coverage.
pub fn exercise_progress(snapshot: &Snapshot) -> Vec<(String, ExerciseProgress)> {
    struct Acc {
        volume_lbs: f64,
        volume_kg: f64,
        first: NaiveDate,
        last: NaiveDate,
        best_per_reps: BTreeMap<i32, PrRecord>,
        order: usize,
    }

    let mut by_exercise: BTreeMap<String, Acc> = BTreeMap::new();
    let mut next_order = 0;

    for row in snapshot.working_rows() {
        let acc = by_exercise
            .entry(row.exercise_name.to_string())
            .or_insert_with(|| {
                let order = next_order;
                next_order += 1;
                Acc {
                    volume_lbs: 0.0,
                    volume_kg: 0.0,
                    first: row.date,
                    last: row.date,
                    best_per_reps: BTreeMap::new(),
                    order,
                }
            });
        acc.volume_lbs += set_volume(row.weight_lbs, row.reps);
        acc.volume_kg += set_volume(row.weight_kg, row.reps);
        acc.first = acc.first.min(row.date);
        acc.last = acc.last.max(row.date);

        // Strict increase only; ties keep the earlier record
        let current = acc.best_per_reps.get(&row.reps);
        if current.map_or(true, |pr| row.weight_lbs > pr.weight_lbs) {
            acc.best_per_reps.insert(
                row.reps,
                PrRecord {
                    date: row.date,
                    weight_lbs: round2(row.weight_lbs),
                    weight_kg: round2(row.weight_kg),
                    reps: row.reps,
                },
            );
        }
    }

    let mut progress: Vec<(String, ExerciseProgress, usize)> = by_exercise
        .into_iter()
        .map(|(name, acc)| {
            let mut prs: Vec<PrRecord> = acc.best_per_reps.into_values().collect();
            prs.sort_by_key(|pr| (pr.date, pr.reps));
            (
                name,
                ExerciseProgress {
                    total_volume_lbs: round2(acc.volume_lbs),
                    total_volume_kg: round2(acc.volume_kg),
                    first_performed: acc.first,
                    last_performed: acc.last,
                    prs,
                },
                acc.order,
            )
        })
        .collect();

    // Highest-volume exercises first; ties keep first-seen order
    progress.sort_by(|a, b| {
        b.1.total_volume_lbs
            .partial_cmp(&a.1.total_volume_lbs)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.2.cmp(&b.2))
    });

    progress
        .into_iter()
        .map(|(name, stats, _)| (name, stats))
        .collect()
}

/// Estimated-max history per canonical lift
///
/// One point per training date, carrying the set that produced the best
/// e1RM that day. Sets above the rep cutoff are ignored.
pub fn big_lift_e1rm_history(
    snapshot: &Snapshot,
    aliases: &AliasTable,
) -> BTreeMap<CanonicalLift, LiftE1rmSeries> {
    let mut names: BTreeMap<CanonicalLift, String> = BTreeMap::new();
    let mut best: BTreeMap<CanonicalLift, BTreeMap<NaiveDate, E1rmPoint>> = BTreeMap::new();

    for row in snapshot.working_rows() {
        let Some(lift) = aliases.lookup(row.exercise_name) else {
            continue;
        };
        names
            .entry(lift)
            .or_insert_with(|| row.exercise_name.to_string());
        if row.reps > E1RM_MAX_REPS {
            continue;
        }

        let e1rm_lbs = estimated_max(row.weight_lbs, row.reps);
        let days = best.entry(lift).or_default();
        let replace = days
            .get(&row.date)
            .map_or(true, |point| e1rm_lbs > point.e1rm_lbs);
        if replace {
            days.insert(
                row.date,
                E1rmPoint {
                    date: row.date,
                    e1rm_lbs,
                    e1rm_kg: estimated_max(row.weight_kg, row.reps),
                    actual_weight_lbs: row.weight_lbs,
                    actual_weight_kg: row.weight_kg,
                    reps: row.reps,
                },
            );
        }
    }

    best.into_iter()
        .filter(|(_, days)| !days.is_empty())
        .map(|(lift, days)| {
            let e1rm_history = days
                .into_values()
                .map(|p| E1rmPoint {
                    e1rm_lbs: round2(p.e1rm_lbs),
                    e1rm_kg: round2(p.e1rm_kg),
                    actual_weight_lbs: round2(p.actual_weight_lbs),
                    actual_weight_kg: round2(p.actual_weight_kg),
                    ..p
                })
                .collect();
            (
                lift,
                LiftE1rmSeries {
                    exercise_name: names.get(&lift).cloned().unwrap_or_default(),
                    e1rm_history,
                },
            )
        })
        .collect()
}

/// All-time PR table for every canonical lift
///
/// Each of the four lifts is present even without qualifying history
/// (empty rep table, zero max, absent best e1RM).
pub fn all_time_prs(
    snapshot: &Snapshot,
    aliases: &AliasTable,
) -> BTreeMap<CanonicalLift, AllTimePr> {
    let mut rep_best: BTreeMap<CanonicalLift, BTreeMap<i32, (f64, f64)>> = BTreeMap::new();
    let mut max_ever: BTreeMap<CanonicalLift, (f64, f64)> = BTreeMap::new();

    for row in snapshot.working_rows() {
        let Some(lift) = aliases.lookup(row.exercise_name) else {
            continue;
        };

        let max = max_ever.entry(lift).or_insert((0.0, 0.0));
        if row.weight_lbs > max.0 {
            *max = (row.weight_lbs, row.weight_kg);
        }

        if row.reps >= 1 && row.reps <= E1RM_MAX_REPS {
            let best = rep_best
                .entry(lift)
                .or_default()
                .entry(row.reps)
                .or_insert((0.0, 0.0));
            if row.weight_lbs > best.0 {
                *best = (row.weight_lbs, row.weight_kg);
            }
        }
    }

    CanonicalLift::ALL
        .into_iter()
        .map(|lift| {
            let rep_prs: BTreeMap<i32, RepPr> = rep_best
                .get(&lift)
                .map(|by_reps| {
                    by_reps
                        .iter()
                        .map(|(&reps, &(lbs, kg))| {
                            (
                                reps,
                                RepPr {
                                    weight_lbs: round2(lbs),
                                    weight_kg: round2(kg),
                                    e1rm_lbs: round2(estimated_max(lbs, reps)),
                                    e1rm_kg: round2(estimated_max(kg, reps)),
                                },
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();

            // First rep-count with the highest e1RM wins ties
            let mut best_e1rm: Option<RepPr> = None;
            for pr in rep_prs.values() {
                if best_e1rm
                    .as_ref()
                    .map_or(true, |best| pr.e1rm_lbs > best.e1rm_lbs)
                {
                    best_e1rm = Some(pr.clone());
                }
            }

            let (lbs, kg) = max_ever.get(&lift).copied().unwrap_or((0.0, 0.0));
            (
                lift,
                AllTimePr {
                    rep_prs,
                    max_ever: MaxEver {
                        weight_lbs: round2(lbs),
                        weight_kg: round2(kg),
                    },
                    best_e1rm,
                },
            )
        })
        .collect()
}

/// Whole days elapsed since each canonical lift's running maximum
/// (reps <= 10) last increased; `None` for lifts without history
///
/// A lift's first qualifying set counts as its first PR.
pub fn days_since_last_pr(
    snapshot: &Snapshot,
    aliases: &AliasTable,
    today: NaiveDate,
) -> BTreeMap<CanonicalLift, Option<i64>> {
    let mut last_pr: BTreeMap<CanonicalLift, NaiveDate> = BTreeMap::new();
    let mut running: BTreeMap<(CanonicalLift, i32), f64> = BTreeMap::new();

    for row in snapshot.working_rows() {
        let Some(lift) = aliases.lookup(row.exercise_name) else {
            continue;
        };
        if row.reps > E1RM_MAX_REPS {
            continue;
        }

        let best = running.entry((lift, row.reps)).or_insert(f64::NEG_INFINITY);
        if row.weight_lbs > *best {
            *best = row.weight_lbs;
            let latest = last_pr.entry(lift).or_insert(row.date);
            *latest = (*latest).max(row.date);
        }
    }

    CanonicalLift::ALL
        .into_iter()
        .map(|lift| {
            let days = last_pr
                .get(&lift)
                .map(|date| (today - *date).num_days());
            (lift, days)
        })
        .collect()
}
