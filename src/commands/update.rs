//! Update the snapshot database from dump files.

use std::path::Path;

use anyhow::Result;

use crate::config::get_db_path;
use crate::data::{load_feedback, load_users_with_archived};
use crate::format::format_average;
use crate::storage::{get_database_stats, save_feedback_snapshot, save_user_snapshot};


/// Run the update command.
pub fn run(data_dir: &Path) -> Result<()> {
    println!("Updating snapshot database from {}...", data_dir.display());

    let feedback = load_feedback(data_dir)?;
    // Archived users are stored too; only listings exclude them
    let users = load_users_with_archived(data_dir)?;

    if feedback.is_empty() && users.is_empty() {
        println!("No dump files found. Expected feedbacks.json and/or users.json.");
        return Ok(());
    }

    let db_path = get_db_path();
    let saved_feedback = save_feedback_snapshot(&feedback, &db_path)?;
    let saved_users = save_user_snapshot(&users, &db_path)?;

    println!("Saved {} feedback records and {} users", saved_feedback, saved_users);

    let stats = get_database_stats(&db_path)?;
    if let (Some(oldest), Some(newest)) = (&stats.oldest_date, &stats.newest_date) {
        println!("Feedback range: {} to {}", oldest, newest);
    }
    println!("Overall average rating: {}", format_average(stats.average_rating));

    let mut by_type: Vec<_> = stats.feedback_by_type.iter().collect();
    by_type.sort();
    for (kind, count) in by_type {
        println!("  {}: {}", kind, count);
    }

    println!(
        "Database: {} ({} feedback, {} active users)",
        db_path.display(),
        stats.total_feedback,
        stats.total_users
    );

    Ok(())
}
