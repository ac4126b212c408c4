//! Calendar-bucket volume aggregation.
//!
//! Groups working sets into day / ISO-week / month / year buckets and
//! produces the volume time series, the date-indexed workout calendar,
//! per-canonical-lift daily volume, and day-of-week averages. Every
//! series is an ordered map ascending by bucket key, so output order is
//! a contract rather than an accident of grouping.

use crate::canonical::AliasTable;
use crate::metrics::{round2, set_volume};
use crate::{CanonicalLift, SessionId, Snapshot};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub volume_lbs: f64,
    pub volume_kg: f64,
    pub workouts: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyVolume {
    pub week: String,
    pub volume_lbs: f64,
    pub volume_kg: f64,
    pub workouts: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyVolume {
    pub month: String,
    pub volume_lbs: f64,
    pub volume_kg: f64,
    pub workouts: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearlyVolume {
    pub year: i32,
    pub volume_lbs: f64,
    pub volume_kg: f64,
    pub workouts: usize,
}

/// Volume series at all four granularities
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeTimeSeries {
    pub daily: Vec<DailyVolume>,
    pub weekly: Vec<WeeklyVolume>,
    pub monthly: Vec<MonthlyVolume>,
    pub yearly: Vec<YearlyVolume>,
}

/// One calendar day in the workout heatmap
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub count: usize,
    pub volume_lbs: f64,
    pub volume_kg: f64,
}

/// Daily volume series for one canonical lift
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftVolumeSeries {
    pub exercise_name: String,
    pub daily_volume: Vec<LiftDailyVolume>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiftDailyVolume {
    pub date: NaiveDate,
    pub volume_lbs: f64,
    pub volume_kg: f64,
}

/// Session count and average per-session volume for one weekday
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayOfWeekStats {
    pub count: usize,
    pub avg_volume_lbs: f64,
    pub avg_volume_kg: f64,
}

#[derive(Default)]
struct BucketAcc {
    lbs: f64,
    kg: f64,
    sessions: BTreeSet<SessionId>,
}

impl BucketAcc {
    fn add(&mut self, lbs: f64, kg: f64, session: SessionId) {
        self.lbs += lbs;
        self.kg += kg;
        self.sessions.insert(session);
    }
}

/// ISO week key, e.g. `2024-W05`
fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Month key, e.g. `2024-01`
pub(crate) fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Summed working-set volume per day/week/month/year bucket
///
/// Built from the raw sets keyed by session date, so a set whose
/// exercise row is missing still lands in its bucket and the series
/// agrees with the calendar and session totals. Bucket sums are
/// commutative, so the result is invariant to the ordering of sets
/// within a bucket.
pub fn volume_time_series(snapshot: &Snapshot) -> VolumeTimeSeries {
    let dates: HashMap<SessionId, NaiveDate> = snapshot
        .sessions()
        .iter()
        .map(|s| (s.id, s.date()))
        .collect();

    let mut daily: BTreeMap<NaiveDate, BucketAcc> = BTreeMap::new();
    let mut weekly: BTreeMap<String, BucketAcc> = BTreeMap::new();
    let mut monthly: BTreeMap<String, BucketAcc> = BTreeMap::new();
    let mut yearly: BTreeMap<i32, BucketAcc> = BTreeMap::new();

    for entry in snapshot.sets().iter().filter(|e| e.is_working()) {
        let Some(&date) = dates.get(&entry.session_id) else {
            continue;
        };
        let lbs = set_volume(entry.weight_lbs, entry.reps);
        let kg = set_volume(entry.weight_kg, entry.reps);
        daily
            .entry(date)
            .or_default()
            .add(lbs, kg, entry.session_id);
        weekly
            .entry(week_key(date))
            .or_default()
            .add(lbs, kg, entry.session_id);
        monthly
            .entry(month_key(date))
            .or_default()
            .add(lbs, kg, entry.session_id);
        yearly
            .entry(date.year())
            .or_default()
            .add(lbs, kg, entry.session_id);
    }

    VolumeTimeSeries {
        daily: daily
            .into_iter()
            .map(|(date, acc)| DailyVolume {
                date,
                volume_lbs: round2(acc.lbs),
                volume_kg: round2(acc.kg),
                workouts: acc.sessions.len(),
            })
            .collect(),
        weekly: weekly
            .into_iter()
            .map(|(week, acc)| WeeklyVolume {
                week,
                volume_lbs: round2(acc.lbs),
                volume_kg: round2(acc.kg),
                workouts: acc.sessions.len(),
            })
            .collect(),
        monthly: monthly
            .into_iter()
            .map(|(month, acc)| MonthlyVolume {
                month,
                volume_lbs: round2(acc.lbs),
                volume_kg: round2(acc.kg),
                workouts: acc.sessions.len(),
            })
            .collect(),
        yearly: yearly
            .into_iter()
            .map(|(year, acc)| YearlyVolume {
                year,
                volume_lbs: round2(acc.lbs),
                volume_kg: round2(acc.kg),
                workouts: acc.sessions.len(),
            })
            .collect(),
    }
}

/// Date-indexed workout calendar for the heatmap
///
/// Every session date appears, including dates whose sessions had no
/// qualifying working sets (zero volume).
pub fn workout_calendar(snapshot: &Snapshot) -> BTreeMap<NaiveDate, CalendarDay> {
    let mut calendar: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();

    for totals in snapshot.session_totals() {
        let day = calendar.entry(totals.date).or_insert(CalendarDay {
            count: 0,
            volume_lbs: 0.0,
            volume_kg: 0.0,
        });
        day.count += 1;
        day.volume_lbs += totals.volume_lbs;
        day.volume_kg += totals.volume_kg;
    }

    for day in calendar.values_mut() {
        day.volume_lbs = round2(day.volume_lbs);
        day.volume_kg = round2(day.volume_kg);
    }
    calendar
}

/// Daily volume series per canonical lift
///
/// Only lifts the alias table recognized at least once are present. The
/// `exercise_name` is the raw name of the lift's first recorded set.
pub fn big_lift_daily_volume(
    snapshot: &Snapshot,
    aliases: &AliasTable,
) -> BTreeMap<CanonicalLift, LiftVolumeSeries> {
    let mut names: BTreeMap<CanonicalLift, String> = BTreeMap::new();
    let mut series: BTreeMap<CanonicalLift, BTreeMap<NaiveDate, (f64, f64)>> = BTreeMap::new();

    for row in snapshot.working_rows() {
        let Some(lift) = aliases.lookup(row.exercise_name) else {
            continue;
        };
        names
            .entry(lift)
            .or_insert_with(|| row.exercise_name.to_string());
        let day = series.entry(lift).or_default().entry(row.date).or_insert((0.0, 0.0));
        day.0 += set_volume(row.weight_lbs, row.reps);
        day.1 += set_volume(row.weight_kg, row.reps);
    }

    series
        .into_iter()
        .map(|(lift, days)| {
            let daily_volume = days
                .into_iter()
                .map(|(date, (lbs, kg))| LiftDailyVolume {
                    date,
                    volume_lbs: round2(lbs),
                    volume_kg: round2(kg),
                })
                .collect();
            (
                lift,
                LiftVolumeSeries {
                    exercise_name: names.get(&lift).cloned().unwrap_or_default(),
                    daily_volume,
                },
            )
        })
        .collect()
}

/// Session counts and average per-session volume by day of week
///
/// Sessions with no working sets count as zero volume in the average.
pub fn workouts_by_day_of_week(snapshot: &Snapshot) -> BTreeMap<String, DayOfWeekStats> {
    let mut acc: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();

    for totals in snapshot.session_totals() {
        let name = weekday_name(totals.date);
        let entry = acc.entry(name.to_string()).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += totals.volume_lbs;
        entry.2 += totals.volume_kg;
    }

    acc.into_iter()
        .map(|(day, (count, lbs, kg))| {
            let divisor = count.max(1) as f64;
            (
                day,
                DayOfWeekStats {
                    count,
                    avg_volume_lbs: round2(lbs / divisor),
                    avg_volume_kg: round2(kg / divisor),
                },
            )
        })
        .collect()
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
        chrono::Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Exercise, Session, SetEntry};

    fn ms(date: NaiveDate) -> i64 {
        date.and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot(sets_per_session: Vec<(NaiveDate, Vec<(f64, i32)>)>) -> Snapshot {
        let mut sessions = Vec::new();
        let mut sets = Vec::new();
        for (i, (date, entries)) in sets_per_session.into_iter().enumerate() {
            let id = i as i64 + 1;
            sessions.push(Session {
                id,
                date_ms: ms(date),
                duration_minutes: 60.0,
                program_id: None,
                day_name: None,
            });
            for (n, (lbs, reps)) in entries.into_iter().enumerate() {
                sets.push(SetEntry {
                    session_id: id,
                    exercise_id: 1,
                    weight_kg: lbs * 0.453592,
                    weight_lbs: lbs,
                    reps,
                    set_number: n as i32 + 1,
                });
            }
        }
        Snapshot::new(
            sessions,
            sets,
            vec![Exercise {
                id: 1,
                name: "Squat".into(),
            }],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_daily_buckets_sorted_and_summed() {
        let snap = snapshot(vec![
            (day(2024, 1, 5), vec![(100.0, 5)]),
            (day(2024, 1, 1), vec![(100.0, 5), (200.0, 3)]),
        ]);
        let series = volume_time_series(&snap);
        assert_eq!(series.daily.len(), 2);
        assert_eq!(series.daily[0].date, day(2024, 1, 1));
        assert_eq!(series.daily[0].volume_lbs, 1100.0);
        assert_eq!(series.daily[1].volume_lbs, 500.0);
    }

    #[test]
    fn test_bucket_sum_is_order_invariant() {
        let a = snapshot(vec![(day(2024, 1, 1), vec![(100.0, 5), (200.0, 3)])]);
        let b = snapshot(vec![(day(2024, 1, 1), vec![(200.0, 3), (100.0, 5)])]);
        assert_eq!(
            volume_time_series(&a).daily,
            volume_time_series(&b).daily
        );
    }

    #[test]
    fn test_buckets_agree_with_calendar_without_exercise_row() {
        // Second set references exercise id 2, which has no exercises row
        let date = day(2024, 1, 1);
        let snap = Snapshot::new(
            vec![Session {
                id: 1,
                date_ms: ms(date),
                duration_minutes: 60.0,
                program_id: None,
                day_name: None,
            }],
            vec![
                SetEntry {
                    session_id: 1,
                    exercise_id: 1,
                    weight_kg: 100.0 * 0.453592,
                    weight_lbs: 100.0,
                    reps: 5,
                    set_number: 1,
                },
                SetEntry {
                    session_id: 1,
                    exercise_id: 2,
                    weight_kg: 200.0 * 0.453592,
                    weight_lbs: 200.0,
                    reps: 3,
                    set_number: 2,
                },
            ],
            vec![Exercise {
                id: 1,
                name: "Squat".into(),
            }],
            vec![],
            vec![],
        );
        let series = volume_time_series(&snap);
        let calendar = workout_calendar(&snap);
        assert_eq!(series.daily[0].volume_lbs, 1100.0);
        assert_eq!(series.daily[0].volume_lbs, calendar[&date].volume_lbs);
        assert_eq!(series.yearly[0].volume_lbs, 1100.0);
    }

    #[test]
    fn test_iso_week_key() {
        // 2024-01-01 is a Monday in ISO week 1 of 2024
        assert_eq!(week_key(day(2024, 1, 1)), "2024-W01");
        // 2023-01-01 is a Sunday belonging to ISO week 52 of 2022
        assert_eq!(week_key(day(2023, 1, 1)), "2022-W52");
    }

    #[test]
    fn test_calendar_keeps_zero_volume_sessions() {
        let snap = snapshot(vec![
            (day(2024, 1, 1), vec![(100.0, 5)]),
            (day(2024, 1, 2), vec![(45.0, -1)]), // warmup only
        ]);
        let calendar = workout_calendar(&snap);
        assert_eq!(calendar.len(), 2);
        let empty = &calendar[&day(2024, 1, 2)];
        assert_eq!(empty.count, 1);
        assert_eq!(empty.volume_lbs, 0.0);
    }

    #[test]
    fn test_big_lift_daily_volume_uses_aliases() {
        let snap = snapshot(vec![(day(2024, 1, 1), vec![(100.0, 5)])]);
        let by_lift = big_lift_daily_volume(&snap, &AliasTable::default());
        let squat = by_lift.get(&CanonicalLift::Squat).unwrap();
        assert_eq!(squat.exercise_name, "Squat");
        assert_eq!(squat.daily_volume[0].volume_lbs, 500.0);
        assert!(!by_lift.contains_key(&CanonicalLift::Bench));
    }

    #[test]
    fn test_day_of_week_averages() {
        // Two Mondays, one with 500 lbs and one with 1500 lbs
        let snap = snapshot(vec![
            (day(2024, 1, 1), vec![(100.0, 5)]),
            (day(2024, 1, 8), vec![(300.0, 5)]),
        ]);
        let by_day = workouts_by_day_of_week(&snap);
        let monday = &by_day["Monday"];
        assert_eq!(monday.count, 2);
        assert_eq!(monday.avg_volume_lbs, 1000.0);
    }
}
