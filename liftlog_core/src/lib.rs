#![forbid(unsafe_code)]

//! Core domain model and analytics engine for the Liftlog dashboard.
//!
//! This crate provides:
//! - Domain types (sessions, set entries, exercises, programs)
//! - A materialized snapshot reader over the SQLite training log
//! - Canonical-lift name resolution
//! - The aggregation engine (volume buckets, PRs, streaks, milestones,
//!   composite totals, notable sessions, bar travel)
//! - Report document assembly

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod canonical;
pub mod store;
pub mod metrics;
pub mod buckets;
pub mod prs;
pub mod streaks;
pub mod milestones;
pub mod totals;
pub mod notable;
pub mod bartravel;
pub mod programs;
pub mod summary;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use canonical::AliasTable;
pub use store::open_snapshot;
pub use report::{build_report, Report};
