//! Read-only snapshot loader for the SQLite training log.
//!
//! The store is an external collaborator: the engine never writes to it.
//! Cursor iteration is materialized into an in-memory [`Snapshot`] here at
//! the boundary, so every downstream algorithm works on a well-defined,
//! chronologically ordered sequence.
//!
//! Relations read:
//! - `history` (sessions): id, date (epoch ms), duration (minutes), program_id, day_name
//! - `history_exercises` (sets): history_id, exercise_id, weightkg, weightlb, reps, set_number
//! - `exercises`: id, exercise_name
//! - `programs`: id, routine
//! - `body_weight` (optional table): date (epoch ms), weightkg
//!
//! NULL numeric fields are coalesced to zero on read, never carried as
//! nulls into an aggregate.

use crate::{
    BodyWeightSample, Error, Exercise, Program, Result, Session, SetEntry, Snapshot,
};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Open the training log and materialize a full snapshot
///
/// Fails outright if the database is missing or unreadable; no partial
/// snapshot is ever returned.
pub fn open_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Err(Error::Store(format!(
            "training log not found at {}",
            path.display()
        )));
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    load_snapshot(&conn)
}

/// Materialize a snapshot from an open connection
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    let sessions = load_sessions(conn)?;
    let sets = load_sets(conn)?;
    let exercises = load_exercises(conn)?;
    let programs = load_programs(conn)?;
    let body_weight = load_body_weight(conn)?;

    tracing::info!(
        "Loaded snapshot: {} sessions, {} sets, {} exercises, {} programs",
        sessions.len(),
        sets.len(),
        exercises.len(),
        programs.len()
    );

    Ok(Snapshot::new(sessions, sets, exercises, programs, body_weight))
}

fn load_sessions(conn: &Connection) -> Result<Vec<Session>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, duration, program_id, day_name
         FROM history ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Session {
            id: row.get(0)?,
            date_ms: row.get(1)?,
            duration_minutes: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
            program_id: row.get(3)?,
            day_name: row.get(4)?,
        })
    })?;

    let mut sessions = Vec::new();
    for row in rows {
        sessions.push(row?);
    }
    Ok(sessions)
}

fn load_sets(conn: &Connection) -> Result<Vec<SetEntry>> {
    let mut stmt = conn.prepare(
        "SELECT history_id, exercise_id, weightkg, weightlb, reps, set_number
         FROM history_exercises ORDER BY history_id, set_number",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(SetEntry {
            session_id: row.get(0)?,
            exercise_id: row.get(1)?,
            weight_kg: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
            weight_lbs: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            reps: row.get::<_, Option<i32>>(4)?.unwrap_or(0),
            set_number: row.get::<_, Option<i32>>(5)?.unwrap_or(0),
        })
    })?;

    let mut sets = Vec::new();
    for row in rows {
        sets.push(row?);
    }
    Ok(sets)
}

fn load_exercises(conn: &Connection) -> Result<Vec<Exercise>> {
    let mut stmt = conn.prepare("SELECT id, exercise_name FROM exercises ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Exercise {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    let mut exercises = Vec::new();
    for row in rows {
        exercises.push(row?);
    }
    Ok(exercises)
}

fn load_programs(conn: &Connection) -> Result<Vec<Program>> {
    let mut stmt = conn.prepare("SELECT id, routine FROM programs ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Program {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    let mut programs = Vec::new();
    for row in rows {
        programs.push(row?);
    }
    Ok(programs)
}

/// The body-weight relation is independent of sessions and optional;
/// an absent table yields an empty sequence.
fn load_body_weight(conn: &Connection) -> Result<Vec<BodyWeightSample>> {
    if !table_exists(conn, "body_weight")? {
        tracing::debug!("No body_weight table in store");
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare("SELECT date, weightkg FROM body_weight ORDER BY date")?;
    let rows = stmt.query_map([], |row| {
        let date_ms: i64 = row.get(0)?;
        let weight_kg: Option<f64> = row.get(1)?;
        Ok((date_ms, weight_kg.unwrap_or(0.0)))
    })?;

    let mut samples = Vec::new();
    for row in rows {
        let (date_ms, weight_kg) = row?;
        samples.push(BodyWeightSample {
            date: crate::ms_to_date(date_ms),
            weight_kg,
        });
    }
    Ok(samples)
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
