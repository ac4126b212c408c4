//! Pure metric calculations.
//!
//! The estimated-max (e1RM) formula and per-set volume. Rounding helpers
//! live here too; they are applied only when output values are built,
//! never between intermediate computations.

/// Rep-count cutoff for e1RM-derived aggregates. The Epley estimate
/// degrades for high-rep sets, so PR tables, progression curves and
/// composite totals ignore sets above this count. Raw volume does not.
pub const E1RM_MAX_REPS: i32 = 10;

/// Estimated one-rep max via the Epley formula.
///
/// Returns the weight unchanged for a single. Defined for reps >= 1;
/// callers must filter warmup sentinels first.
pub fn estimated_max(weight: f64, reps: i32) -> f64 {
    if reps == 1 {
        weight
    } else {
        weight * (1.0 + f64::from(reps) / 30.0)
    }
}

/// Volume of one set: weight x reps
pub fn set_volume(weight: f64, reps: i32) -> f64 {
    weight * f64::from(reps)
}

/// Round to two decimal places (output serialization only)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to one decimal place (output serialization only)
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
