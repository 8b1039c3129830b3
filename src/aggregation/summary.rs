//! Categorical aggregation and ranking within a record subset.

use std::cmp::Ordering;
use std::collections::HashMap;

use clap::ValueEnum;

use crate::format::NA;


/// How members without a valid rating participate in aggregation.
///
/// `CountAll` is the canonical mode: every member contributes to `count`,
/// only valid ratings contribute to `average`. `RatedOnly` drops unrated
/// members entirely; a few historical report screens wanted that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RatingPolicy {
    #[default]
    CountAll,
    RatedOnly,
}


/// Aggregated count/average for one categorical key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub rated_count: usize,
    /// None when no member carries a valid rating; rendered as "N/A".
    pub average: Option<f64>,
}


/// Top/low keys of a ranked summary list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedExtremes {
    pub top: String,
    pub low: String,
}


/// Group records by a categorical key and compute count/average per group.
///
/// Absent keys fall into a shared "N/A" group rather than being dropped, so
/// counts stay conserved. The returned list is in canonical rank order:
/// descending average (unrated groups last), ties broken by descending count,
/// then ascending key. That ordering is total, so reordering the input never
/// changes the output.
pub fn aggregate_by<T, K, R>(
    records: &[&T],
    key_fn: K,
    rating_fn: R,
    policy: RatingPolicy,
) -> Vec<GroupSummary>
where
    K: Fn(&T) -> Option<String>,
    R: Fn(&T) -> Option<u8>,
{
    let mut groups: HashMap<String, (usize, usize, u64)> = HashMap::new();

    for record in records {
        let rating = rating_fn(record).filter(|r| (1..=5).contains(r));

        if policy == RatingPolicy::RatedOnly && rating.is_none() {
            continue;
        }

        let key = key_fn(record).unwrap_or_else(|| NA.to_string());
        let entry = groups.entry(key).or_insert((0, 0, 0));
        entry.0 += 1;
        if let Some(r) = rating {
            entry.1 += 1;
            entry.2 += r as u64;
        }
    }

    let mut summaries: Vec<GroupSummary> = groups
        .into_iter()
        .map(|(key, (count, rated_count, rating_sum))| GroupSummary {
            key,
            count,
            rated_count,
            average: if rated_count > 0 {
                Some(rating_sum as f64 / rated_count as f64)
            } else {
                None
            },
        })
        .collect();

    summaries.sort_by(compare_rank);
    summaries
}


/// Canonical rank ordering for group summaries.
fn compare_rank(a: &GroupSummary, b: &GroupSummary) -> Ordering {
    match (a.average, b.average) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.key.cmp(&b.key)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)),
    }
}


/// First and last key of a ranked list; both "N/A" when the list is empty.
pub fn rank_extremes(summaries: &[GroupSummary]) -> RankedExtremes {
    match (summaries.first(), summaries.last()) {
        (Some(first), Some(last)) => RankedExtremes {
            top: first.key.clone(),
            low: last.key.clone(),
        },
        _ => RankedExtremes {
            top: NA.to_string(),
            low: NA.to_string(),
        },
    }
}
