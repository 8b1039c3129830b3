//! Dashboard command.

use std::path::Path;

use anyhow::Result;

use crate::commands::{fast_mode_ready, load_records};
use crate::visualization::render_dashboard;


/// Run the dashboard command.
pub fn run(fast: bool, data_dir: &Path) -> Result<()> {
    if !fast_mode_ready(fast) {
        return Ok(());
    }

    let (feedback, users) = load_records(fast, data_dir)?;

    if feedback.is_empty() && users.is_empty() {
        println!(
            "No TourKita data found in {}. Export the feedbacks/users collections there, \
             or pass --data-dir.",
            data_dir.display()
        );
        return Ok(());
    }

    // Date range from dated feedback
    let mut dates: Vec<String> = feedback.iter().filter_map(|r| r.date_key()).collect();
    dates.sort();
    dates.dedup();
    let date_range = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => Some(format!("{} to {}", first, last)),
        _ => None,
    };

    render_dashboard(&feedback, &users, date_range.as_deref(), fast, true);

    Ok(())
}
