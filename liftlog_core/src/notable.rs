//! Notable-session ranking.
//!
//! Three capped rankings over sessions: highest volume, most working
//! sets, and comebacks after a layoff of fourteen days or more. The
//! merged result is presented newest first with a human-readable reason
//! per entry.

use crate::metrics::round2;
use crate::Snapshot;
use chrono::NaiveDate;
use serde::Serialize;

/// Entries kept per category
const TOP_N: usize = 5;

/// Minimum gap, in days, for a session to qualify as a comeback
pub const COMEBACK_GAP_DAYS: i64 = 14;

/// One notable session with its qualifying reason
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotableWorkout {
    pub date: NaiveDate,
    pub reason: String,
    pub volume_lbs: f64,
    pub volume_kg: f64,
    pub details: String,
    pub category: String,
}

/// Rank sessions by volume, set count and comeback gap
pub fn notable_workouts(snapshot: &Snapshot) -> Vec<NotableWorkout> {
    let totals = snapshot.session_totals();
    let mut notable = Vec::new();

    let program_name = |program_id: Option<i64>| -> String {
        program_id
            .and_then(|id| snapshot.program_name(id))
            .unwrap_or("Unknown Program")
            .to_string()
    };

    // Top volume; stable sort keeps original order on ties
    let mut by_volume: Vec<usize> = (0..totals.len()).collect();
    by_volume.sort_by(|&a, &b| {
        totals[b]
            .volume_lbs
            .partial_cmp(&totals[a].volume_lbs)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (rank, &i) in by_volume.iter().take(TOP_N).enumerate() {
        let t = &totals[i];
        notable.push(NotableWorkout {
            date: t.date,
            reason: format!("Volume Record #{}", rank + 1),
            volume_lbs: round2(t.volume_lbs),
            volume_kg: round2(t.volume_kg),
            details: program_name(t.session.program_id),
            category: "volume".into(),
        });
    }

    // Most working sets
    let mut by_sets: Vec<usize> = (0..totals.len()).collect();
    by_sets.sort_by(|&a, &b| totals[b].working_sets.cmp(&totals[a].working_sets));
    for (rank, &i) in by_sets.iter().take(TOP_N).enumerate() {
        let t = &totals[i];
        notable.push(NotableWorkout {
            date: t.date,
            reason: format!("Most Sets #{} ({} sets)", rank + 1, t.working_sets),
            volume_lbs: round2(t.volume_lbs),
            volume_kg: round2(t.volume_kg),
            details: program_name(t.session.program_id),
            category: "sets".into(),
        });
    }

    // Comebacks: the five most recent sessions after a 14+ day gap
    let mut comebacks = Vec::new();
    for pair in totals.windows(2) {
        let gap = (pair[1].date - pair[0].date).num_days();
        if gap >= COMEBACK_GAP_DAYS {
            comebacks.push((pair[1].clone(), gap));
        }
    }
    comebacks.sort_by(|a, b| b.0.date.cmp(&a.0.date));
    for (t, gap) in comebacks.into_iter().take(TOP_N) {
        notable.push(NotableWorkout {
            date: t.date,
            reason: format!("Comeback ({} days off)", gap),
            volume_lbs: round2(t.volume_lbs),
            volume_kg: round2(t.volume_kg),
            details: program_name(t.session.program_id),
            category: "comeback".into(),
        });
    }

    // Presentation order: newest first across all categories
    notable.sort_by(|a, b| b.date.cmp(&a.date));
    notable
}
