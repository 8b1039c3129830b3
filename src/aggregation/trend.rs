//! Change-over-time and urgent-streak helpers.

use chrono::{DateTime, Utc};

use crate::aggregation::PeriodBucket;


/// A rating at or below this value counts toward an urgent run.
pub const URGENT_RATING_MAX: u8 = 2;

/// Consecutive low ratings needed to flag an urgent run.
pub const URGENT_RUN_LEN: usize = 3;


/// Percentage change between two adjacent period counts.
///
/// Defined as 0% when both are zero and +100% when growing from zero, so
/// the result is always finite.
pub fn percent_change(prev: usize, curr: usize) -> f64 {
    if prev == 0 {
        if curr == 0 {
            0.0
        } else {
            100.0
        }
    } else {
        (curr as f64 - prev as f64) / prev as f64 * 100.0
    }
}


/// Change percentage for each bucket against its chronological predecessor.
///
/// The caller must pass buckets in chronological order (as `group_by_period`
/// returns them); the first bucket is measured against an empty predecessor.
pub fn change_series<T>(buckets: &[PeriodBucket<'_, T>]) -> Vec<f64> {
    let mut prev = 0usize;
    let mut changes = Vec::with_capacity(buckets.len());

    for bucket in buckets {
        let curr = bucket.members.len();
        changes.push(percent_change(prev, curr));
        prev = curr;
    }

    changes
}


/// Count non-overlapping runs of at least `URGENT_RUN_LEN` consecutive
/// ratings at or below `URGENT_RATING_MAX`.
///
/// Ratings must be in chronological order. Once a run triggers, the streak
/// counter resets before scanning continues, so six straight low ratings
/// count as two runs.
pub fn count_urgent_runs(ratings: &[u8]) -> usize {
    let mut runs = 0usize;
    let mut streak = 0usize;

    for &rating in ratings {
        if rating <= URGENT_RATING_MAX {
            streak += 1;
            if streak == URGENT_RUN_LEN {
                runs += 1;
                streak = 0;
            }
        } else {
            streak = 0;
        }
    }

    runs
}


/// Extract valid ratings from a bucket in chronological member order.
///
/// Insertion order is not good enough for urgent detection; members are
/// sorted by their timestamp first.
pub fn chronological_ratings<T, F>(
    bucket: &PeriodBucket<'_, T>,
    timestamp: F,
    rating: impl Fn(&T) -> Option<u8>,
) -> Vec<u8>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut stamped: Vec<(&T, DateTime<Utc>)> = bucket
        .members
        .iter()
        .filter_map(|m| timestamp(m).map(|t| (*m, t)))
        .collect();
    stamped.sort_by_key(|(_, t)| *t);

    stamped
        .into_iter()
        .filter_map(|(m, _)| rating(m).filter(|r| (1..=5).contains(r)))
        .collect()
}
