//! User record models for TourKita accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::NA;


/// Lifecycle tag marking soft-deleted accounts.
pub const STATUS_ARCHIVED: &str = "archived";


/// A single user profile from the users collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    /// 0 means unknown.
    pub age: u32,
    /// Free-form source string; use `gender_label` for display.
    pub gender: String,
    pub user_type: String,
    /// None when the source timestamp was missing or unparseable.
    pub registered_date: Option<DateTime<Utc>>,
    pub active_status: bool,
    /// Lifecycle tag: registered/guest/archived.
    pub status: String,
}


impl UserRecord {
    /// Whether this account has been soft-deleted.
    pub fn is_archived(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ARCHIVED)
    }

    /// Age bracket label for demographic grouping; unknown ages map to N/A.
    pub fn age_bracket(&self) -> &'static str {
        match self.age {
            0 => NA,
            1..=17 => "Under 18",
            18..=24 => "18-24",
            25..=34 => "25-34",
            35..=44 => "35-44",
            45..=54 => "45-54",
            55..=64 => "55-64",
            _ => "65+",
        }
    }

    /// Case-normalized gender label; empty input maps to N/A.
    pub fn gender_label(&self) -> String {
        let trimmed = self.gender.trim();
        if trimmed.is_empty() {
            return NA.to_string();
        }

        let lower = trimmed.to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => NA.to_string(),
        }
    }

}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample(age: u32, gender: &str, status: &str) -> UserRecord {
        UserRecord {
            id: "u-1".to_string(),
            email: "juan@example.com".to_string(),
            name: "Juan".to_string(),
            age,
            gender: gender.to_string(),
            user_type: "registered".to_string(),
            registered_date: None,
            active_status: true,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_age_brackets() {
        assert_eq!(sample(0, "m", "registered").age_bracket(), "N/A");
        assert_eq!(sample(16, "m", "registered").age_bracket(), "Under 18");
        assert_eq!(sample(18, "m", "registered").age_bracket(), "18-24");
        assert_eq!(sample(34, "m", "registered").age_bracket(), "25-34");
        assert_eq!(sample(70, "m", "registered").age_bracket(), "65+");
    }

    #[test]
    fn test_gender_label_normalizes_case() {
        assert_eq!(sample(20, "MALE", "registered").gender_label(), "Male");
        assert_eq!(sample(20, "female", "registered").gender_label(), "Female");
        assert_eq!(sample(20, "  ", "registered").gender_label(), "N/A");
    }

    #[test]
    fn test_archived_check_is_case_insensitive() {
        assert!(sample(20, "m", "Archived").is_archived());
        assert!(!sample(20, "m", "registered").is_archived());
    }
}
