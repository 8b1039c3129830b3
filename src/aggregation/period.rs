//! Temporal grouping of timestamped records into calendar periods.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use clap::ValueEnum;

use crate::format::month_abbrev;


/// Calendar resolution used for temporal grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}


impl Granularity {
    /// Human-readable label used in report headings.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Daily => "Day",
            Granularity::Weekly => "Week",
            Granularity::Monthly => "Month",
            Granularity::Quarterly => "Quarter",
            Granularity::Yearly => "Year",
        }
    }
}


/// First day of the week; historical screens disagreed, so it stays a
/// parameter with Monday (ISO) as the canonical choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}


impl WeekStart {
    fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}


/// A time-bounded subset of records sharing one calendar period.
#[derive(Debug, Clone)]
pub struct PeriodBucket<'a, T> {
    /// Canonical period label, e.g. "2025", "Q3 2025", "Sep 2025",
    /// "Sep 1-7 2025", "2025-09-03".
    pub key: String,
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Inclusive upper bound.
    pub end: DateTime<Utc>,
    pub members: Vec<&'a T>,
}


/// Output of `group_by_period`: chronologically sorted buckets plus the
/// number of records excluded for lacking a usable timestamp.
#[derive(Debug, Clone)]
pub struct GroupedPeriods<'a, T> {
    pub buckets: Vec<PeriodBucket<'a, T>>,
    pub skipped: usize,
}


impl<'a, T> GroupedPeriods<'a, T> {
    /// Total records across all buckets.
    #[allow(dead_code)]
    pub fn member_count(&self) -> usize {
        self.buckets.iter().map(|b| b.members.len()).sum()
    }
}


/// Partition records into calendar-period buckets.
///
/// Records whose timestamp accessor returns None are excluded from every
/// bucket and counted in `skipped` (never defaulted to the current time).
/// Buckets come back sorted by their start date, which is the ordering the
/// trend calculations require; the string keys do not sort chronologically
/// for month abbreviations.
pub fn group_by_period<'a, T, F>(
    records: &'a [T],
    granularity: Granularity,
    week_start: WeekStart,
    timestamp: F,
) -> GroupedPeriods<'a, T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut buckets: Vec<PeriodBucket<'a, T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        let instant = match timestamp(record) {
            Some(t) => t,
            None => {
                skipped += 1;
                continue;
            }
        };

        let (start_day, end_day) = period_span(instant.date_naive(), granularity, week_start);
        let key = period_key(granularity, start_day, end_day);

        let idx = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push(PeriodBucket {
                key,
                start: day_floor(start_day),
                end: day_ceil(end_day),
                members: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[idx].members.push(record);
    }

    buckets.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.key.cmp(&b.key)));

    GroupedPeriods { buckets, skipped }
}


/// Inclusive first/last calendar day of the period containing `day`.
fn period_span(day: NaiveDate, granularity: Granularity, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    match granularity {
        Granularity::Daily => (day, day),
        Granularity::Weekly => {
            let week = day.week(week_start.weekday());
            (week.first_day(), week.last_day())
        }
        Granularity::Monthly => (
            day.with_day(1).unwrap_or(day),
            last_day_of_month(day.year(), day.month()),
        ),
        Granularity::Quarterly => {
            let quarter = day.month0() / 3 + 1;
            let start_month = (quarter - 1) * 3 + 1;
            let end_month = quarter * 3;
            (
                NaiveDate::from_ymd_opt(day.year(), start_month, 1).unwrap_or(day),
                last_day_of_month(day.year(), end_month),
            )
        }
        Granularity::Yearly => (
            NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day),
            NaiveDate::from_ymd_opt(day.year(), 12, 31).unwrap_or(day),
        ),
    }
}


/// Canonical label for a period span; dispatch per granularity so each
/// format stays independently testable.
pub fn period_key(granularity: Granularity, start: NaiveDate, end: NaiveDate) -> String {
    match granularity {
        Granularity::Daily => daily_key(start),
        Granularity::Weekly => weekly_key(start, end),
        Granularity::Monthly => monthly_key(start),
        Granularity::Quarterly => quarterly_key(start),
        Granularity::Yearly => yearly_key(start),
    }
}


pub fn yearly_key(day: NaiveDate) -> String {
    format!("{}", day.year())
}


pub fn quarterly_key(day: NaiveDate) -> String {
    format!("Q{} {}", day.month0() / 3 + 1, day.year())
}


pub fn monthly_key(day: NaiveDate) -> String {
    format!("{} {}", month_abbrev(day.month()), day.year())
}


/// Week label like "Sep 1-7 2025"; the end month is spelled out when the
/// week crosses a month boundary ("Aug 31-Sep 6 2025"). The year is the
/// year of the week's start day.
pub fn weekly_key(start: NaiveDate, end: NaiveDate) -> String {
    if start.month() == end.month() {
        format!(
            "{} {}-{} {}",
            month_abbrev(start.month()),
            start.day(),
            end.day(),
            start.year()
        )
    } else {
        format!(
            "{} {}-{} {} {}",
            month_abbrev(start.month()),
            start.day(),
            month_abbrev(end.month()),
            end.day(),
            start.year()
        )
    }
}


pub fn daily_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}


/// 00:00:00 at the start of a day, UTC.
pub fn day_floor(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0)
        .expect("midnight exists for every date")
        .and_utc()
}


/// Last representable instant of a day, UTC.
pub fn day_ceil(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .expect("end of day exists for every date")
        .and_utc()
}


/// Last calendar day of a month.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).expect("valid date"))
}
