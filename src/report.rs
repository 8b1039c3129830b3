//! Markdown report generation.
//!
//! Pure serialization over the aggregation output; nothing here recomputes
//! or fetches. Callers pass the in-memory record lists and write the
//! returned string wherever they want.

use std::fmt::Write;

use chrono::Datelike;

use crate::aggregation::{
    aggregate_by, change_series, chronological_ratings, count_urgent_runs, group_by_period,
    rank_extremes, Granularity, RatingPolicy, WeekStart,
};
use crate::format::{format_average, format_change, format_number};
use crate::models::{FeedbackRecord, UserRecord};


/// Build the full markdown report.
pub fn build_report(
    granularity: Granularity,
    week_start: WeekStart,
    policy: RatingPolicy,
    year: Option<i32>,
    feedback: &[FeedbackRecord],
    users: &[UserRecord],
) -> String {
    let feedback: Vec<FeedbackRecord> = match year {
        Some(y) => feedback
            .iter()
            .filter(|r| r.created_at.map(|t| t.year() == y).unwrap_or(false))
            .cloned()
            .collect(),
        None => feedback.to_vec(),
    };

    let mut output = String::new();
    let scope = year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "all time".to_string());

    let _ = writeln!(output, "# TourKita Feedback Report");
    let _ = writeln!(
        output,
        "Scope: {} ({} feedback entries)",
        scope,
        format_number(feedback.len() as i64)
    );

    write_volume_section(&mut output, granularity, week_start, &feedback);
    write_ranking_section(&mut output, "Location Ratings", policy, &feedback, |r| {
        r.location.clone()
    });
    write_ranking_section(&mut output, "Feature Ratings", policy, &feedback, |r| {
        r.feature.clone()
    });
    write_urgent_section(&mut output, granularity, week_start, &feedback);

    if !users.is_empty() {
        write_user_section(&mut output, granularity, week_start, year, users);
    }

    output
}


/// Entry counts per period with change against the previous period.
fn write_volume_section(
    output: &mut String,
    granularity: Granularity,
    week_start: WeekStart,
    feedback: &[FeedbackRecord],
) {
    let grouped = group_by_period(feedback, granularity, week_start, |r| r.created_at);
    let changes = change_series(&grouped.buckets);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Feedback Volume by {}", granularity.label());

    if grouped.buckets.is_empty() {
        let _ = writeln!(output, "No dated feedback in this window.");
    } else {
        for (bucket, change) in grouped.buckets.iter().zip(changes.iter()) {
            let _ = writeln!(
                output,
                "- {}: {} entries ({})",
                bucket.key,
                format_number(bucket.members.len() as i64),
                format_change(*change)
            );
        }
    }

    if grouped.skipped > 0 {
        let _ = writeln!(
            output,
            "({} entries had no usable date and were excluded)",
            format_number(grouped.skipped as i64)
        );
    }
}


/// Ranked averages for one categorical dimension.
fn write_ranking_section(
    output: &mut String,
    heading: &str,
    policy: RatingPolicy,
    feedback: &[FeedbackRecord],
    key_fn: impl Fn(&FeedbackRecord) -> Option<String>,
) {
    let with_key: Vec<&FeedbackRecord> = feedback.iter().filter(|r| key_fn(r).is_some()).collect();
    let summaries = aggregate_by(&with_key, |r| key_fn(r), |r| r.rating, policy);

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", heading);

    if summaries.is_empty() {
        let _ = writeln!(output, "No entries in this window.");
        return;
    }

    for summary in summaries.iter() {
        let _ = writeln!(
            output,
            "- {}: avg {} across {} entries",
            summary.key,
            format_average(summary.average),
            format_number(summary.count as i64)
        );
    }

    let extremes = rank_extremes(&summaries);
    let _ = writeln!(
        output,
        "Top rated: {}. Needs attention: {}.",
        extremes.top, extremes.low
    );
}


/// Periods containing runs of consecutive low ratings.
fn write_urgent_section(
    output: &mut String,
    granularity: Granularity,
    week_start: WeekStart,
    feedback: &[FeedbackRecord],
) {
    let grouped = group_by_period(feedback, granularity, week_start, |r| r.created_at);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Urgent Attention");

    let mut flagged = 0usize;
    for bucket in grouped.buckets.iter() {
        let ratings = chronological_ratings(bucket, |r| r.created_at, |r| r.rating);
        let runs = count_urgent_runs(&ratings);
        if runs > 0 {
            let _ = writeln!(
                output,
                "- {}: {} run{} of 3+ consecutive ratings of 2 or below",
                bucket.key,
                runs,
                if runs == 1 { "" } else { "s" }
            );
            flagged += runs;
        }
    }

    if flagged == 0 {
        let _ = writeln!(output, "No runs of consecutive low ratings in this window.");
    }
}


/// Demographics and registration trend for the users collection.
fn write_user_section(
    output: &mut String,
    granularity: Granularity,
    week_start: WeekStart,
    year: Option<i32>,
    users: &[UserRecord],
) {
    let users: Vec<&UserRecord> = match year {
        Some(y) => users
            .iter()
            .filter(|u| u.registered_date.map(|t| t.year() == y).unwrap_or(false))
            .collect(),
        None => users.iter().collect(),
    };

    let _ = writeln!(output);
    let _ = writeln!(output, "## User Demographics");

    if users.is_empty() {
        let _ = writeln!(output, "No user registrations in this window.");
        return;
    }

    let _ = writeln!(output, "Registered users: {}", format_number(users.len() as i64));

    let genders = aggregate_by(
        &users,
        |u| Some(u.gender_label()),
        |_| None,
        RatingPolicy::CountAll,
    );
    for summary in genders.iter() {
        let _ = writeln!(
            output,
            "- {}: {} users",
            summary.key,
            format_number(summary.count as i64)
        );
    }

    let brackets = aggregate_by(
        &users,
        |u| Some(u.age_bracket().to_string()),
        |_| None,
        RatingPolicy::CountAll,
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "### Age Brackets");
    for summary in brackets.iter() {
        let _ = writeln!(
            output,
            "- {}: {} users",
            summary.key,
            format_number(summary.count as i64)
        );
    }

    let grouped = group_by_period(&users, granularity, week_start, |u| u.registered_date);
    let changes = change_series(&grouped.buckets);

    let _ = writeln!(output);
    let _ = writeln!(output, "### Registrations by {}", granularity.label());
    if grouped.buckets.is_empty() {
        let _ = writeln!(output, "No dated registrations in this window.");
    } else {
        for (bucket, change) in grouped.buckets.iter().zip(changes.iter()) {
            let _ = writeln!(
                output,
                "- {}: {} registrations ({})",
                bucket.key,
                format_number(bucket.members.len() as i64),
                format_change(*change)
            );
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedbackKind;
    use chrono::{TimeZone, Utc};

    fn feedback(location: &str, rating: Option<u8>, m: u32, d: u32, h: u32) -> FeedbackRecord {
        FeedbackRecord {
            id: format!("{}-{}-{}", location, m, d),
            email: None,
            kind: FeedbackKind::Location,
            feature: None,
            location: Some(location.to_string()),
            rating,
            comment: String::new(),
            image_url: None,
            created_at: Some(Utc.with_ymd_and_hms(2025, m, d, h, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_report_sections_present() {
        let records = vec![
            feedback("Fort Santiago", Some(5), 9, 3, 8),
            feedback("Fort Santiago", Some(4), 9, 3, 9),
            feedback("Rizal Park", Some(2), 9, 4, 10),
        ];
        let report = build_report(Granularity::Monthly, WeekStart::Monday, RatingPolicy::CountAll, Some(2025), &records, &[]);

        assert!(report.contains("# TourKita Feedback Report"));
        assert!(report.contains("## Feedback Volume by Month"));
        assert!(report.contains("- Sep 2025: 3 entries (+100%)"));
        assert!(report.contains("## Location Ratings"));
        assert!(report.contains("- Fort Santiago: avg 4.5 across 2 entries"));
        assert!(report.contains("Top rated: Fort Santiago. Needs attention: Rizal Park."));
        assert!(report.contains("## Urgent Attention"));
        assert!(report.contains("No runs of consecutive low ratings"));
        // No users passed, no demographics section
        assert!(!report.contains("## User Demographics"));
    }

    #[test]
    fn test_report_flags_urgent_runs() {
        let records = vec![
            feedback("Rizal Park", Some(2), 9, 1, 8),
            feedback("Rizal Park", Some(1), 9, 2, 8),
            feedback("Rizal Park", Some(2), 9, 3, 8),
        ];
        let report = build_report(Granularity::Monthly, WeekStart::Monday, RatingPolicy::CountAll, None, &records, &[]);
        assert!(report.contains("- Sep 2025: 1 run of 3+ consecutive ratings"));
    }

    #[test]
    fn test_report_year_filter() {
        let mut records = vec![feedback("Fort Santiago", Some(5), 9, 3, 8)];
        records.push(FeedbackRecord {
            created_at: Some(Utc.with_ymd_and_hms(2024, 9, 3, 8, 0, 0).unwrap()),
            ..records[0].clone()
        });

        let report = build_report(Granularity::Yearly, WeekStart::Monday, RatingPolicy::CountAll, Some(2025), &records, &[]);
        assert!(report.contains("Scope: 2025 (1 feedback entries)"));
        assert!(!report.contains("- 2024:"));
    }

    #[test]
    fn test_report_empty_input() {
        let report = build_report(Granularity::Monthly, WeekStart::Monday, RatingPolicy::CountAll, None, &[], &[]);
        assert!(report.contains("No dated feedback in this window."));
        assert!(report.contains("No entries in this window."));
    }

    #[test]
    fn test_report_user_demographics() {
        let user = |id: &str, age: u32, gender: &str| UserRecord {
            id: id.to_string(),
            email: String::new(),
            name: String::new(),
            age,
            gender: gender.to_string(),
            user_type: "registered".to_string(),
            registered_date: Some(Utc.with_ymd_and_hms(2025, 9, 10, 0, 0, 0).unwrap()),
            active_status: true,
            status: "registered".to_string(),
        };
        let users = vec![user("u1", 20, "female"), user("u2", 30, "FEMALE"), user("u3", 0, "")];

        let report = build_report(Granularity::Monthly, WeekStart::Monday, RatingPolicy::CountAll, None, &[], &users);
        assert!(report.contains("## User Demographics"));
        assert!(report.contains("- Female: 2 users"));
        assert!(report.contains("- N/A: 1 users"));
        assert!(report.contains("### Age Brackets"));
        assert!(report.contains("- 18-24: 1 users"));
        assert!(report.contains("### Registrations by Month"));
        assert!(report.contains("- Sep 2025: 3 registrations (+100%)"));
    }
}
