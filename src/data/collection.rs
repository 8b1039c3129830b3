//! Readers for exported collection dumps.
//!
//! Dumps arrive in three shapes depending on which export tool produced
//! them: a top-level JSON array of documents, a keyed object mapping
//! document ids to documents, or JSONL with one document per line.
//! Malformed documents are skipped with a warning, never fatal.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::data::to_instant;
use crate::models::{FeedbackKind, FeedbackRecord, UserRecord};


/// Parse a feedback collection dump file.
pub fn parse_feedback_file(file_path: &Path) -> Result<Vec<FeedbackRecord>> {
    parse_collection_file(file_path, parse_feedback_doc)
}


/// Parse a users collection dump file.
pub fn parse_user_file(file_path: &Path) -> Result<Vec<UserRecord>> {
    parse_collection_file(file_path, parse_user_doc)
}


/// Read a dump file and run `parse_doc` over every document in it.
fn parse_collection_file<T>(
    file_path: &Path,
    parse_doc: fn(&str, &Value) -> Option<T>,
) -> Result<Vec<T>> {
    let mut file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

    // Whole-file JSON first; fall back to JSONL
    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Array(docs)) => {
            let mut records = Vec::new();
            for (idx, doc) in docs.iter().enumerate() {
                let id = doc
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| format!("doc-{}", idx));
                match parse_doc(&id, doc) {
                    Some(record) => records.push(record),
                    None => warn_skipped(file_path, &id),
                }
            }
            Ok(records)
        }
        Ok(Value::Object(map)) => {
            // Keyed dumps map document ids to documents; anything else is a
            // single bare document
            if !map.is_empty() && map.values().all(|v| v.is_object()) {
                let mut records = Vec::new();
                for (id, doc) in &map {
                    match parse_doc(id, doc) {
                        Some(record) => records.push(record),
                        None => warn_skipped(file_path, id),
                    }
                }
                Ok(records)
            } else {
                let doc = Value::Object(map);
                let id = doc
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("doc-0")
                    .to_string();
                Ok(parse_doc(&id, &doc).into_iter().collect())
            }
        }
        _ => parse_jsonl(file_path, &contents, parse_doc),
    }
}


/// Parse line-delimited JSON documents.
fn parse_jsonl<T>(
    file_path: &Path,
    contents: &str,
    parse_doc: fn(&str, &Value) -> Option<T>,
) -> Result<Vec<T>> {
    let reader = BufReader::new(contents.as_bytes());
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(l) => l,
            Err(_) => continue,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(doc) => {
                let id = doc
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| format!("line-{}", line_num + 1));
                if let Some(record) = parse_doc(&id, &doc) {
                    records.push(record);
                }
            }
            Err(e) => {
                eprintln!(
                    "Warning: Skipping malformed JSON at {}:{}: {}",
                    file_path.display(),
                    line_num + 1,
                    e
                );
            }
        }
    }

    Ok(records)
}


fn warn_skipped(file_path: &Path, id: &str) {
    eprintln!(
        "Warning: Skipping unreadable document '{}' in {}",
        id,
        file_path.display()
    );
}


/// Parse a single feedback document.
///
/// Returns None only for documents that are not objects; individual missing
/// fields degrade to their "absent" representations instead.
fn parse_feedback_doc(id: &str, doc: &Value) -> Option<FeedbackRecord> {
    let doc = doc.as_object()?;

    let feature = doc
        .get("feature")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(String::from);
    let location = doc
        .get("location")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(String::from);

    // feedbackType is authoritative; infer from the populated field when
    // an old document lacks it
    let kind = match doc.get("feedbackType").and_then(|v| v.as_str()) {
        Some(t) if t.eq_ignore_ascii_case("App Feedback") || t.eq_ignore_ascii_case("app") => {
            FeedbackKind::App
        }
        Some(t)
            if t.eq_ignore_ascii_case("Location Feedback")
                || t.eq_ignore_ascii_case("location") =>
        {
            FeedbackKind::Location
        }
        _ if location.is_some() && feature.is_none() => FeedbackKind::Location,
        _ => FeedbackKind::App,
    };

    let rating = doc
        .get("rating")
        .and_then(|v| v.as_u64())
        .and_then(|r| match r {
            1..=5 => Some(r as u8),
            _ => None,
        });

    let created_at = doc.get("createdAt").and_then(to_instant);

    Some(FeedbackRecord {
        id: id.to_string(),
        email: doc
            .get("email")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(String::from),
        kind,
        feature,
        location,
        rating,
        comment: doc
            .get("comment")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        image_url: doc
            .get("imageUrl")
            .and_then(|v| v.as_str())
            .map(String::from),
        created_at,
    })
}


/// Parse a single user document.
fn parse_user_doc(id: &str, doc: &Value) -> Option<UserRecord> {
    let doc = doc.as_object()?;

    let registered_date = doc.get("registeredDate").and_then(to_instant);

    Some(UserRecord {
        id: id.to_string(),
        email: doc
            .get("email")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        name: doc
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        age: doc.get("age").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        gender: doc
            .get("gender")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        user_type: doc
            .get("userType")
            .and_then(|v| v.as_str())
            .unwrap_or("guest")
            .to_string(),
        registered_date,
        active_status: doc
            .get("activeStatus")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        status: doc
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("registered")
            .to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_feedback_doc_location() {
        let doc = json!({
            "email": "maria@example.com",
            "feedbackType": "Location Feedback",
            "location": "Fort Santiago",
            "rating": 5,
            "comment": "Beautiful ruins",
            "createdAt": "2025-09-03T10:00:00Z"
        });

        let record = parse_feedback_doc("fb-1", &doc).unwrap();
        assert_eq!(record.kind, FeedbackKind::Location);
        assert_eq!(record.group_key(), Some("Fort Santiago".to_string()));
        assert_eq!(record.rating, Some(5));
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_parse_feedback_doc_zero_rating_is_none() {
        let doc = json!({
            "feedbackType": "App Feedback",
            "feature": "AR Camera",
            "rating": 0,
            "createdAt": "2025-09-03"
        });

        let record = parse_feedback_doc("fb-2", &doc).unwrap();
        assert_eq!(record.rating, None);
        assert_eq!(record.comment, "");
        assert!(record.email.is_none());
    }

    #[test]
    fn test_parse_feedback_doc_infers_kind() {
        let doc = json!({
            "location": "Rizal Park",
            "rating": 3
        });

        let record = parse_feedback_doc("fb-3", &doc).unwrap();
        assert_eq!(record.kind, FeedbackKind::Location);
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_parse_user_doc() {
        let doc = json!({
            "email": "juan@example.com",
            "name": "Juan",
            "age": 28,
            "gender": "MALE",
            "userType": "registered",
            "registeredDate": {"_seconds": 1756900800, "_nanoseconds": 0},
            "activeStatus": true,
            "status": "registered"
        });

        let record = parse_user_doc("u-1", &doc).unwrap();
        assert_eq!(record.age, 28);
        assert_eq!(record.gender_label(), "Male");
        assert!(record.registered_date.is_some());
        assert!(!record.is_archived());
    }

    #[test]
    fn test_parse_collection_array_and_keyed_object() {
        let tmp = tempfile::TempDir::new().unwrap();

        let array_path = tmp.path().join("feedbacks.json");
        std::fs::write(
            &array_path,
            r#"[{"feedbackType": "App Feedback", "feature": "Map", "rating": 4}]"#,
        )
        .unwrap();
        let records = parse_feedback_file(&array_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "doc-0");

        let keyed_path = tmp.path().join("keyed.json");
        std::fs::write(
            &keyed_path,
            r#"{"abc123": {"feedbackType": "App Feedback", "feature": "Map", "rating": 4}}"#,
        )
        .unwrap();
        let records = parse_feedback_file(&keyed_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "abc123");
    }

    #[test]
    fn test_parse_collection_jsonl_skips_malformed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("feedbacks.jsonl");
        std::fs::write(
            &path,
            "{\"id\": \"a\", \"feature\": \"Map\", \"rating\": 4}\nnot json\n{\"id\": \"b\", \"location\": \"Intramuros\"}\n",
        )
        .unwrap();

        let records = parse_feedback_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[1].id, "b");
    }
}
