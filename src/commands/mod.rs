//! CLI command implementations.

pub mod dashboard;
pub mod drill;
pub mod export;
pub mod report;
pub mod update;

use std::path::Path;

use anyhow::Result;

use crate::config::get_db_path;
use crate::data;
use crate::models::{FeedbackRecord, UserRecord};
use crate::storage::{load_feedback_records, load_user_records};


/// Load feedback and users either from dump files or, in fast mode, from
/// the snapshot database. Archived users are excluded either way.
pub(crate) fn load_records(
    fast: bool,
    data_dir: &Path,
) -> Result<(Vec<FeedbackRecord>, Vec<UserRecord>)> {
    if fast {
        let db_path = get_db_path();
        Ok((
            load_feedback_records(&db_path)?,
            load_user_records(&db_path, false)?,
        ))
    } else {
        Ok((data::load_feedback(data_dir)?, data::load_users(data_dir)?))
    }
}


/// Guard for fast mode when no snapshot database exists yet.
pub(crate) fn fast_mode_ready(fast: bool) -> bool {
    if fast && !get_db_path().exists() {
        eprintln!("Error: Cannot use --fast flag without existing snapshot database.");
        eprintln!("Run 'tki update' first to ingest dump files.");
        return false;
    }
    true
}
