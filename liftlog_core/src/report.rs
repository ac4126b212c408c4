//! Report assembly.
//!
//! Runs every analysis pass over one immutable snapshot and collects the
//! results into the single JSON document consumers read. Key casing and
//! section names are part of the output contract and must not drift.

use crate::bartravel::{bar_travel, BarTravel};
use crate::buckets::{
    big_lift_daily_volume, volume_time_series, workout_calendar, workouts_by_day_of_week,
    CalendarDay, DayOfWeekStats, LiftVolumeSeries, VolumeTimeSeries,
};
use crate::canonical::AliasTable;
use crate::milestones::{cumulative_milestones, plate_milestones, Milestone, PlateMilestone};
use crate::notable::{notable_workouts, NotableWorkout};
use crate::prs::{
    all_time_prs, big_lift_e1rm_history, days_since_last_pr, exercise_progress, AllTimePr,
    ExerciseProgress, LiftE1rmSeries,
};
use crate::programs::{program_summaries, ProgramSummary};
use crate::streaks::{compute_streaks, StreakStats};
use crate::summary::{lifetime_summary, Summary};
use crate::totals::{powerlifting_totals, PowerliftingTotals};
use crate::types::{CanonicalLift, Snapshot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// The full analytics report
///
/// Field order here is serialization order in the emitted document.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub streaks: StreakStats,
    pub volume_time_series: VolumeTimeSeries,
    pub workout_calendar: BTreeMap<NaiveDate, CalendarDay>,
    #[serde(serialize_with = "ordered_pairs")]
    pub exercise_progress: Vec<(String, ExerciseProgress)>,
    #[serde(rename = "bigThreeE1RM")]
    pub big_three_e1rm: BTreeMap<CanonicalLift, LiftE1rmSeries>,
    pub big_three_volume: BTreeMap<CanonicalLift, LiftVolumeSeries>,
    pub programs: Vec<ProgramSummary>,
    pub workouts_by_day_of_week: BTreeMap<String, DayOfWeekStats>,
    pub notable_workouts: Vec<NotableWorkout>,
    pub milestones: Vec<Milestone>,
    pub plate_milestones: BTreeMap<CanonicalLift, BTreeMap<u8, PlateMilestone>>,
    pub powerlifting_totals: PowerliftingTotals,
    #[serde(rename = "allTimePRs")]
    pub all_time_prs: BTreeMap<CanonicalLift, AllTimePr>,
    #[serde(rename = "daysSinceLastPR")]
    pub days_since_last_pr: BTreeMap<CanonicalLift, Option<i64>>,
    pub bar_travel: BarTravel,
}

/// Serialize name/value pairs as a JSON object in their given order
fn ordered_pairs<S, V>(pairs: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Run every analysis over the snapshot as of `now`
///
/// `now` drives the streak "today" anchor, days-since-PR counts, and the
/// `generatedAt` stamp; everything else is a pure function of the
/// snapshot, so repeated runs over the same store differ only in
/// `generatedAt`.
pub fn build_report(snapshot: &Snapshot, aliases: &AliasTable, now: DateTime<Utc>) -> Report {
    let today = now.date_naive();
    let session_dates = snapshot
        .sessions()
        .iter()
        .map(|s| s.date())
        .collect();

    tracing::debug!(
        sessions = snapshot.sessions().len(),
        sets = snapshot.sets().len(),
        "assembling report"
    );

    Report {
        generated_at: now,
        summary: lifetime_summary(snapshot),
        streaks: compute_streaks(&session_dates, today),
        volume_time_series: volume_time_series(snapshot),
        workout_calendar: workout_calendar(snapshot),
        exercise_progress: exercise_progress(snapshot),
        big_three_e1rm: big_lift_e1rm_history(snapshot, aliases),
        big_three_volume: big_lift_daily_volume(snapshot, aliases),
        programs: program_summaries(snapshot),
        workouts_by_day_of_week: workouts_by_day_of_week(snapshot),
        notable_workouts: notable_workouts(snapshot),
        milestones: cumulative_milestones(snapshot),
        plate_milestones: plate_milestones(snapshot, aliases),
        powerlifting_totals: powerlifting_totals(snapshot, aliases),
        all_time_prs: all_time_prs(snapshot, aliases),
        days_since_last_pr: days_since_last_pr(snapshot, aliases, today),
        bar_travel: bar_travel(snapshot, aliases),
    }
}
