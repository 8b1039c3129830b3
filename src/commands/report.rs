//! Report command - generate a markdown report file.

use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregation::{Granularity, RatingPolicy, WeekStart};
use crate::commands::{fast_mode_ready, load_records};
use crate::report::build_report;


/// Run the report command.
pub fn run(
    granularity: Granularity,
    week_start: WeekStart,
    policy: RatingPolicy,
    year: Option<i32>,
    out: &Path,
    fast: bool,
    data_dir: &Path,
) -> Result<()> {
    if !fast_mode_ready(fast) {
        return Ok(());
    }

    let (feedback, users) = load_records(fast, data_dir)?;

    if feedback.is_empty() && users.is_empty() {
        println!(
            "No TourKita data found in {}. Nothing to report on.",
            data_dir.display()
        );
        return Ok(());
    }

    let report = build_report(granularity, week_start, policy, year, &feedback, &users);

    std::fs::write(out, report)
        .with_context(|| format!("Failed to write report to {}", out.display()))?;

    println!("Report written to {}", out.display());

    Ok(())
}
