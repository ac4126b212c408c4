//! Core domain types for the Liftlog analytics engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Raw records read from the training log (sessions, set entries,
//!   exercises, programs, body-weight samples)
//! - The materialized `Snapshot` the whole engine operates on
//! - Canonical lift identities
//!
//! All epoch-millisecond timestamps are interpreted in UTC when converted
//! to calendar dates. The original log was written on one machine in one
//! timezone; pinning UTC keeps every derived date deterministic.

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Row id types from the external store
pub type SessionId = i64;
pub type ExerciseId = i64;
pub type ProgramId = i64;

/// Convert an epoch-millisecond timestamp to a UTC calendar date
pub fn ms_to_date(ms: i64) -> NaiveDate {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

// ============================================================================
// Raw Record Types
// ============================================================================

/// A recorded training session (one row of the `history` relation)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Start timestamp, epoch milliseconds
    pub date_ms: i64,
    /// Duration in minutes, coalesced to zero when the store held NULL
    pub duration_minutes: f64,
    pub program_id: Option<ProgramId>,
    pub day_name: Option<String>,
}

impl Session {
    /// Calendar date of this session (UTC)
    pub fn date(&self) -> NaiveDate {
        ms_to_date(self.date_ms)
    }
}

/// One set within a session (one row of the `history_exercises` relation)
///
/// Weight is carried in both units exactly as the store records it; the
/// engine never converts between them. A repetition count <= 0 marks a
/// warmup set (the store uses a -1 sentinel) and is excluded from every
/// aggregate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetEntry {
    pub session_id: SessionId,
    pub exercise_id: ExerciseId,
    pub weight_kg: f64,
    pub weight_lbs: f64,
    pub reps: i32,
    pub set_number: i32,
}

impl SetEntry {
    /// Working sets have a positive repetition count
    pub fn is_working(&self) -> bool {
        self.reps > 0
    }
}

/// An exercise definition; many display names may denote one canonical lift
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
}

/// A training program; a session optionally belongs to exactly one
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
}

/// An independent body-weight measurement
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BodyWeightSample {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

// ============================================================================
// Canonical Lifts
// ============================================================================

/// The four tracked core barbell movements
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalLift {
    Squat,
    Bench,
    Deadlift,
    Ohp,
}

impl CanonicalLift {
    /// All four canonical lifts
    pub const ALL: [CanonicalLift; 4] = [
        CanonicalLift::Squat,
        CanonicalLift::Bench,
        CanonicalLift::Deadlift,
        CanonicalLift::Ohp,
    ];

    /// The three lifts that make up the powerlifting total
    pub const BIG_THREE: [CanonicalLift; 3] = [
        CanonicalLift::Squat,
        CanonicalLift::Bench,
        CanonicalLift::Deadlift,
    ];

    /// The key used for this lift in the output document
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalLift::Squat => "squat",
            CanonicalLift::Bench => "bench",
            CanonicalLift::Deadlift => "deadlift",
            CanonicalLift::Ohp => "ohp",
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// A joined, chronological view of one working set
///
/// Borrowed from the snapshot; this is what most of the engine iterates.
#[derive(Clone, Copy, Debug)]
pub struct SetRow<'a> {
    pub date: NaiveDate,
    pub session_id: SessionId,
    pub exercise_id: ExerciseId,
    pub exercise_name: &'a str,
    pub weight_lbs: f64,
    pub weight_kg: f64,
    pub reps: i32,
    pub set_number: i32,
}

/// Per-session totals in chronological order
#[derive(Clone, Debug)]
pub struct SessionTotals<'a> {
    pub session: &'a Session,
    pub date: NaiveDate,
    pub volume_lbs: f64,
    pub volume_kg: f64,
    pub working_sets: usize,
}

/// The complete, immutable snapshot of the training log for one run
///
/// Constructed once at the store boundary; sessions are sorted ascending
/// by (timestamp, id) and sets follow session order with set ordinal as
/// tie-breaker, so every downstream iteration order is defined by input.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    sessions: Vec<Session>,
    sets: Vec<SetEntry>,
    exercises: Vec<Exercise>,
    programs: Vec<Program>,
    body_weight: Vec<BodyWeightSample>,
}

impl Snapshot {
    pub fn new(
        mut sessions: Vec<Session>,
        mut sets: Vec<SetEntry>,
        exercises: Vec<Exercise>,
        programs: Vec<Program>,
        mut body_weight: Vec<BodyWeightSample>,
    ) -> Self {
        sessions.sort_by_key(|s| (s.date_ms, s.id));

        // Order sets by their session's chronological position, then ordinal
        let position: HashMap<SessionId, usize> = sessions
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, i))
            .collect();
        sets.sort_by_key(|e| (position.get(&e.session_id).copied(), e.set_number));

        body_weight.sort_by_key(|b| b.date);

        Self {
            sessions,
            sets,
            exercises,
            programs,
            body_weight,
        }
    }

    /// All sessions, chronological
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// All set entries (warmups included), chronological
    pub fn sets(&self) -> &[SetEntry] {
        &self.sets
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn body_weight(&self) -> &[BodyWeightSample] {
        &self.body_weight
    }

    /// Display name for an exercise id
    pub fn exercise_name(&self, id: ExerciseId) -> Option<&str> {
        self.exercises
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.as_str())
    }

    /// Display name for a program id
    pub fn program_name(&self, id: ProgramId) -> Option<&str> {
        self.programs
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    /// Joined working-set rows in chronological order
    ///
    /// Warmup sets (reps <= 0) and sets referencing an unknown exercise
    /// are excluded.
    pub fn working_rows(&self) -> Vec<SetRow<'_>> {
        let dates: HashMap<SessionId, NaiveDate> = self
            .sessions
            .iter()
            .map(|s| (s.id, s.date()))
            .collect();
        let names: HashMap<ExerciseId, &str> = self
            .exercises
            .iter()
            .map(|e| (e.id, e.name.as_str()))
            .collect();

        self.sets
            .iter()
            .filter(|e| e.is_working())
            .filter_map(|e| {
                let date = *dates.get(&e.session_id)?;
                let exercise_name = *names.get(&e.exercise_id)?;
                Some(SetRow {
                    date,
                    session_id: e.session_id,
                    exercise_id: e.exercise_id,
                    exercise_name,
                    weight_lbs: e.weight_lbs,
                    weight_kg: e.weight_kg,
                    reps: e.reps,
                    set_number: e.set_number,
                })
            })
            .collect()
    }

    /// Per-session volume and set-count totals in chronological order
    ///
    /// Sessions with zero working sets appear with zero volume.
    pub fn session_totals(&self) -> Vec<SessionTotals<'_>> {
        let mut by_session: HashMap<SessionId, (f64, f64, usize)> = HashMap::new();
        for entry in self.sets.iter().filter(|e| e.is_working()) {
            let acc = by_session.entry(entry.session_id).or_insert((0.0, 0.0, 0));
            acc.0 += entry.weight_lbs * f64::from(entry.reps);
            acc.1 += entry.weight_kg * f64::from(entry.reps);
            acc.2 += 1;
        }

        self.sessions
            .iter()
            .map(|session| {
                let (volume_lbs, volume_kg, working_sets) = by_session
                    .get(&session.id)
                    .copied()
                    .unwrap_or((0.0, 0.0, 0));
                SessionTotals {
                    session,
                    date: session.date(),
                    volume_lbs,
                    volume_kg,
                    working_sets,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64, ms: i64) -> Session {
        Session {
            id,
            date_ms: ms,
            duration_minutes: 60.0,
            program_id: None,
            day_name: None,
        }
    }

    fn set(session_id: i64, exercise_id: i64, lbs: f64, reps: i32, n: i32) -> SetEntry {
        SetEntry {
            session_id,
            exercise_id,
            weight_kg: lbs * 0.453592,
            weight_lbs: lbs,
            reps,
            set_number: n,
        }
    }

    #[test]
    fn test_ms_to_date_is_utc() {
        // 2024-01-02T00:30:00Z
        let date = ms_to_date(1_704_155_400_000);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_snapshot_orders_sessions_chronologically() {
        let snap = Snapshot::new(
            vec![session(2, 2_000), session(1, 1_000)],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        let ids: Vec<i64> = snap.sessions().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_working_rows_exclude_warmups() {
        let snap = Snapshot::new(
            vec![session(1, 1_000)],
            vec![set(1, 10, 100.0, 5, 1), set(1, 10, 45.0, -1, 2)],
            vec![Exercise {
                id: 10,
                name: "Squat".into(),
            }],
            vec![],
            vec![],
        );
        let rows = snap.working_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reps, 5);
        assert_eq!(rows[0].exercise_name, "Squat");
    }

    #[test]
    fn test_session_totals_include_empty_sessions() {
        let snap = Snapshot::new(
            vec![session(1, 1_000), session(2, 2_000)],
            vec![set(1, 10, 100.0, 5, 1)],
            vec![Exercise {
                id: 10,
                name: "Squat".into(),
            }],
            vec![],
            vec![],
        );
        let totals = snap.session_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].volume_lbs, 500.0);
        assert_eq!(totals[0].working_sets, 1);
        assert_eq!(totals[1].volume_lbs, 0.0);
        assert_eq!(totals[1].working_sets, 0);
    }
}
