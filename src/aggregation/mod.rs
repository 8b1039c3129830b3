//! Aggregation core: temporal grouping, categorical ranking, trends.

mod period;
mod summary;
mod trend;

pub use period::{
    daily_key,
    day_ceil,
    day_floor,
    group_by_period,
    last_day_of_month,
    monthly_key,
    period_key,
    quarterly_key,
    weekly_key,
    yearly_key,
    GroupedPeriods,
    Granularity,
    PeriodBucket,
    WeekStart,
};
pub use summary::{aggregate_by, rank_extremes, GroupSummary, RankedExtremes, RatingPolicy};
pub use trend::{
    change_series,
    chronological_ratings,
    count_urgent_runs,
    percent_change,
    URGENT_RATING_MAX,
    URGENT_RUN_LEN,
};
