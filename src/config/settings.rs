//! Application settings and path constants.

use std::path::{Path, PathBuf};


/// Dump file names probed for the feedbacks collection, in order.
const FEEDBACK_DUMPS: &[&str] = &["feedbacks.json", "feedbacks.jsonl", "feedback.json"];

/// Dump file names probed for the users collection, in order.
const USER_DUMPS: &[&str] = &["users.json", "users.jsonl"];


/// Get the default directory holding exported collection dumps.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tourkita")
        .join("exports")
}


/// Get the snapshot database path.
pub fn get_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tourkita")
        .join("insights")
        .join("insights.db")
}


/// Locate the feedbacks dump inside a data directory.
pub fn find_feedback_dump(data_dir: &Path) -> Option<PathBuf> {
    find_dump(data_dir, FEEDBACK_DUMPS)
}


/// Locate the users dump inside a data directory.
pub fn find_user_dump(data_dir: &Path) -> Option<PathBuf> {
    find_dump(data_dir, USER_DUMPS)
}


fn find_dump(data_dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| data_dir.join(name))
        .find(|path| path.exists())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_live_under_tourkita() {
        assert!(default_data_dir().to_string_lossy().contains(".tourkita"));
        assert!(get_db_path().to_string_lossy().contains("insights.db"));
    }

    #[test]
    fn test_find_dump_probes_candidates() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(find_feedback_dump(tmp.path()).is_none());

        std::fs::write(tmp.path().join("feedbacks.jsonl"), "").unwrap();
        let found = find_feedback_dump(tmp.path()).unwrap();
        assert!(found.ends_with("feedbacks.jsonl"));

        // .json wins over .jsonl when both exist
        std::fs::write(tmp.path().join("feedbacks.json"), "[]").unwrap();
        let found = find_feedback_dump(tmp.path()).unwrap();
        assert!(found.ends_with("feedbacks.json"));
    }
}
