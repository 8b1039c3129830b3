//! Flat-row CSV serialization of aggregation output.
//!
//! These writers only serialize what the aggregator produced; they never
//! recompute averages or counts on their own.

use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregation::{
    aggregate_by, change_series, group_by_period, Granularity, RatingPolicy, WeekStart,
};
use crate::drilldown::Dimension;
use crate::format::{format_average, format_change};
use crate::models::{FeedbackRecord, UserRecord};


/// Write one row per (period, group) with count and average rating.
///
/// Returns the number of data rows written.
pub fn export_feedback_summary_csv(
    feedback: &[FeedbackRecord],
    granularity: Granularity,
    week_start: WeekStart,
    dimension: Dimension,
    output_path: &Path,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create CSV at {}", output_path.display()))?;

    writer.write_record(["period", "group", "count", "rated_count", "average"])?;

    let grouped = group_by_period(feedback, granularity, week_start, |r| r.created_at);
    let mut rows = 0usize;

    for bucket in grouped.buckets.iter() {
        let summaries = aggregate_by(
            &bucket.members,
            |r| dimension.key_of(r),
            |r| r.rating,
            RatingPolicy::CountAll,
        );

        for summary in summaries.iter() {
            writer.write_record([
                bucket.key.clone(),
                summary.key.clone(),
                summary.count.to_string(),
                summary.rated_count.to_string(),
                format_average(summary.average),
            ])?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}


/// Write one row per period with registration count and change percentage.
pub fn export_registrations_csv(
    users: &[UserRecord],
    granularity: Granularity,
    week_start: WeekStart,
    output_path: &Path,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create CSV at {}", output_path.display()))?;

    writer.write_record(["period", "registrations", "change_pct"])?;

    let grouped = group_by_period(users, granularity, week_start, |u| u.registered_date);
    let changes = change_series(&grouped.buckets);
    let mut rows = 0usize;

    for (bucket, change) in grouped.buckets.iter().zip(changes.iter()) {
        writer.write_record([
            bucket.key.clone(),
            bucket.members.len().to_string(),
            format_change(*change),
        ])?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}
