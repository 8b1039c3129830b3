//! Data access layer for exported collection dumps.

mod collection;
mod instant;

pub use collection::{parse_feedback_file, parse_user_file};
pub use instant::to_instant;

use std::path::Path;

use anyhow::Result;

use crate::config::{find_feedback_dump, find_user_dump};
use crate::models::{FeedbackRecord, UserRecord};


/// Load all feedback records from the dump directory.
///
/// A missing dump file is not an error; it loads as an empty list so the
/// caller can decide how to present "no data".
pub fn load_feedback(data_dir: &Path) -> Result<Vec<FeedbackRecord>> {
    match find_feedback_dump(data_dir) {
        Some(path) => parse_feedback_file(&path),
        None => Ok(Vec::new()),
    }
}


/// Load non-archived user records from the dump directory.
pub fn load_users(data_dir: &Path) -> Result<Vec<UserRecord>> {
    let users = load_users_with_archived(data_dir)?;
    Ok(users.into_iter().filter(|u| !u.is_archived()).collect())
}


/// Load all user records including archived ones.
pub fn load_users_with_archived(data_dir: &Path) -> Result<Vec<UserRecord>> {
    match find_user_dump(data_dir) {
        Some(path) => parse_user_file(&path),
        None => Ok(Vec::new()),
    }
}
