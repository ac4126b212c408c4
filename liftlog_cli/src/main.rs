use chrono::Utc;
use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Training log analytics engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override path to the SQLite training log
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Override path the report is written to
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Pretty-print the emitted JSON
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the training log and write the report document (default)
    Report,

    /// Print headline lifetime statistics without writing anything
    Summary,
}

fn main() -> Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let db_path = cli.db.unwrap_or_else(|| config.data.database.clone());
    let out_path = cli.out.unwrap_or_else(|| config.data.output.clone());
    let aliases = AliasTable::from_config(&config.aliases);

    match cli.command {
        Some(Commands::Summary) => cmd_summary(&db_path, &aliases),
        Some(Commands::Report) | None => cmd_report(&db_path, &out_path, cli.pretty, &aliases),
    }
}

fn cmd_report(
    db_path: &std::path::Path,
    out_path: &std::path::Path,
    pretty: bool,
    aliases: &AliasTable,
) -> Result<()> {
    let snapshot = open_snapshot(db_path)?;
    let report = build_report(&snapshot, aliases, Utc::now());

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    std::fs::write(out_path, json)?;

    tracing::info!(path = %out_path.display(), "report written");
    println!("✓ Report written to {}", out_path.display());
    println!(
        "  {} workouts, {} sets, {} lbs total volume",
        report.summary.total_workouts,
        report.summary.total_sets,
        report.summary.total_volume_lbs
    );

    Ok(())
}

fn cmd_summary(db_path: &std::path::Path, aliases: &AliasTable) -> Result<()> {
    let snapshot = open_snapshot(db_path)?;
    let report = build_report(&snapshot, aliases, Utc::now());
    let summary = &report.summary;

    println!("Lifetime summary");
    println!("  Workouts:        {}", summary.total_workouts);
    println!("  Sets:            {}", summary.total_sets);
    println!(
        "  Volume:          {} lbs ({} kg)",
        summary.total_volume_lbs, summary.total_volume_kg
    );
    println!("  Hours trained:   {}", summary.total_hours);
    println!("  Reps:            {}", summary.total_reps);
    if let (Some(first), Some(last)) = (summary.first_workout, summary.last_workout) {
        println!("  First workout:   {}", first);
        println!("  Last workout:    {}", last);
    }
    println!(
        "  Streak:          {} current / {} longest",
        report.streaks.current, report.streaks.longest
    );
    if let Some(current) = &report.powerlifting_totals.current {
        println!("  Composite total: {} lbs", current.total_lbs);
    }
    println!(
        "  Bar travel:      {} miles",
        report.bar_travel.total.miles
    );

    Ok(())
}
