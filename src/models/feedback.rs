//! Feedback record models for TourKita submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


/// Which surface a feedback entry talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    /// Feedback about an app feature.
    App,
    /// Feedback about a physical location.
    Location,
}


impl FeedbackKind {
    /// Human-readable label used in tables and exports.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackKind::App => "App",
            FeedbackKind::Location => "Location",
        }
    }
}


/// A single feedback submission from the feedbacks collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub email: Option<String>,
    pub kind: FeedbackKind,
    pub feature: Option<String>,
    pub location: Option<String>,
    /// 1-5; absent or zero in the source means "no rating".
    pub rating: Option<u8>,
    pub comment: String,
    pub image_url: Option<String>,
    /// None when the source timestamp was missing or unparseable.
    pub created_at: Option<DateTime<Utc>>,
}


impl FeedbackRecord {
    /// The categorical value this record groups under: feature for app
    /// feedback, location for location feedback.
    pub fn group_key(&self) -> Option<String> {
        match self.kind {
            FeedbackKind::App => self.feature.clone(),
            FeedbackKind::Location => self.location.clone(),
        }
    }

    /// Get date string in YYYY-MM-DD format for grouping.
    pub fn date_key(&self) -> Option<String> {
        self.created_at.map(|t| t.format("%Y-%m-%d").to_string())
    }

    /// Submitter identity shown in row tables; guests have no email.
    pub fn submitter(&self) -> &str {
        self.email.as_deref().unwrap_or("guest")
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(kind: FeedbackKind) -> FeedbackRecord {
        FeedbackRecord {
            id: "fb-1".to_string(),
            email: Some("maria@example.com".to_string()),
            kind,
            feature: Some("AR Camera".to_string()),
            location: Some("Fort Santiago".to_string()),
            rating: Some(4),
            comment: "Great".to_string(),
            image_url: None,
            created_at: Some(Utc.with_ymd_and_hms(2025, 9, 3, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_group_key_follows_kind() {
        assert_eq!(sample(FeedbackKind::App).group_key(), Some("AR Camera".to_string()));
        assert_eq!(
            sample(FeedbackKind::Location).group_key(),
            Some("Fort Santiago".to_string())
        );
    }

    #[test]
    fn test_date_key() {
        assert_eq!(sample(FeedbackKind::App).date_key(), Some("2025-09-03".to_string()));

        let mut undated = sample(FeedbackKind::App);
        undated.created_at = None;
        assert_eq!(undated.date_key(), None);
    }

    #[test]
    fn test_submitter_guest_fallback() {
        let mut record = sample(FeedbackKind::App);
        record.email = None;
        assert_eq!(record.submitter(), "guest");
    }
}
