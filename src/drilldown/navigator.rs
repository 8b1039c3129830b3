//! Drill-down navigation over feedback records.
//!
//! One variant per navigation level, each carrying exactly the ancestor
//! keys it needs, so ascending can never leave a stale deeper selection
//! behind. Every view is recomputed from the records and the current
//! state; nothing is cached between transitions.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use clap::ValueEnum;

use crate::aggregation::{
    aggregate_by, daily_key, day_ceil, day_floor, group_by_period, last_day_of_month,
    rank_extremes, weekly_key, Granularity, RatingPolicy, WeekStart,
};
use crate::models::FeedbackRecord;


/// Which categorical field the per-card top/low ranking uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Dimension {
    #[default]
    Location,
    Feature,
}


impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Location => "location",
            Dimension::Feature => "feature",
        }
    }

    pub(crate) fn key_of(&self, record: &FeedbackRecord) -> Option<String> {
        match self {
            Dimension::Location => record.location.clone(),
            Dimension::Feature => record.feature.clone(),
        }
    }
}


/// Navigation state, one variant per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillState {
    Years,
    Quarters { year: i32 },
    Months { year: i32, quarter: u32 },
    Weeks { year: i32, month: u32 },
    Days { year: i32, month: u32, week_start: NaiveDate, week_end: NaiveDate },
    Rows { year: i32, month: u32, week_start: NaiveDate, week_end: NaiveDate, day: NaiveDate },
}


/// Summary card for one candidate child period.
#[derive(Debug, Clone)]
pub struct PeriodCard {
    pub key: String,
    pub start: DateTime<Utc>,
    #[allow(dead_code)]
    pub end: DateTime<Utc>,
    pub count: usize,
    pub average: Option<f64>,
    pub top: String,
    pub low: String,
}


impl DrillState {
    /// Advance to the immediate child level. `selected` is the start day of
    /// the clicked card's bucket; everything the child needs is derived from
    /// it plus the ancestors already in the state.
    pub fn descend(&self, selected: NaiveDate) -> DrillState {
        match *self {
            DrillState::Years => DrillState::Quarters {
                year: selected.year(),
            },
            DrillState::Quarters { year } => DrillState::Months {
                year,
                quarter: selected.month0() / 3 + 1,
            },
            DrillState::Months { year, .. } => DrillState::Weeks {
                year,
                month: selected.month(),
            },
            DrillState::Weeks { year, month } => DrillState::Days {
                year,
                month,
                week_start: selected,
                week_end: selected
                    .checked_add_days(Days::new(6))
                    .unwrap_or(selected),
            },
            DrillState::Days {
                year,
                month,
                week_start,
                week_end,
            } => DrillState::Rows {
                year,
                month,
                week_start,
                week_end,
                day: selected,
            },
            DrillState::Rows { .. } => self.clone(),
        }
    }

    /// Retreat to the immediate parent level; the top level stays put.
    pub fn ascend(&self) -> DrillState {
        match *self {
            DrillState::Years => DrillState::Years,
            DrillState::Quarters { .. } => DrillState::Years,
            DrillState::Months { year, .. } => DrillState::Quarters { year },
            DrillState::Weeks { year, month } => DrillState::Months {
                year,
                quarter: (month - 1) / 3 + 1,
            },
            DrillState::Days { year, month, .. } => DrillState::Weeks { year, month },
            DrillState::Rows {
                year,
                month,
                week_start,
                week_end,
                ..
            } => DrillState::Days {
                year,
                month,
                week_start,
                week_end,
            },
        }
    }

    /// Granularity of the candidate children, None at the terminal level.
    pub fn child_granularity(&self) -> Option<Granularity> {
        match self {
            DrillState::Years => Some(Granularity::Yearly),
            DrillState::Quarters { .. } => Some(Granularity::Quarterly),
            DrillState::Months { .. } => Some(Granularity::Monthly),
            DrillState::Weeks { .. } => Some(Granularity::Weekly),
            DrillState::Days { .. } => Some(Granularity::Daily),
            DrillState::Rows { .. } => None,
        }
    }

    /// Inclusive interval constraining candidate children; None at the top
    /// (all records are candidates).
    ///
    /// At the Days level the selected week is clipped to the calendar month,
    /// so a week straddling a month boundary only shows the days that belong
    /// to the month being drilled.
    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match *self {
            DrillState::Years => None,
            DrillState::Quarters { year } => {
                let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
                Some((day_floor(start), day_ceil(end)))
            }
            DrillState::Months { year, quarter } => {
                let start_month = (quarter - 1) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(year, start_month, 1)?;
                let end = last_day_of_month(year, quarter * 3);
                Some((day_floor(start), day_ceil(end)))
            }
            DrillState::Weeks { year, month } => {
                let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                let end = last_day_of_month(year, month);
                Some((day_floor(start), day_ceil(end)))
            }
            DrillState::Days {
                year,
                month,
                week_start,
                week_end,
            } => {
                let month_start = NaiveDate::from_ymd_opt(year, month, 1)?;
                let month_end = last_day_of_month(year, month);
                let start = week_start.max(month_start);
                let end = week_end.min(month_end);
                Some((day_floor(start), day_ceil(end)))
            }
            DrillState::Rows { day, .. } => Some((day_floor(day), day_ceil(day))),
        }
    }

    /// Heading for the current view.
    pub fn title(&self) -> String {
        match *self {
            DrillState::Years => "All years".to_string(),
            DrillState::Quarters { year } => format!("{}", year),
            DrillState::Months { year, quarter } => format!("Q{} {}", quarter, year),
            DrillState::Weeks { year, month } => {
                format!("{} {}", crate::format::month_abbrev(month), year)
            }
            DrillState::Days {
                week_start,
                week_end,
                ..
            } => weekly_key(week_start, week_end),
            DrillState::Rows { day, .. } => daily_key(day),
        }
    }

    /// Summary cards for the candidate child periods, chronological order.
    pub fn cards(&self, records: &[FeedbackRecord], dimension: Dimension) -> Vec<PeriodCard> {
        let granularity = match self.child_granularity() {
            Some(g) => g,
            None => return Vec::new(),
        };

        let in_window = self.filter_window(records);
        let grouped =
            group_by_period(&in_window, granularity, WeekStart::Monday, |r| r.created_at);

        grouped
            .buckets
            .into_iter()
            .map(|bucket| {
                let summaries = aggregate_by(
                    &bucket.members,
                    |r| dimension.key_of(r),
                    |r| r.rating,
                    RatingPolicy::CountAll,
                );
                let extremes = rank_extremes(&summaries);

                let rated: Vec<u8> = bucket
                    .members
                    .iter()
                    .filter_map(|r| r.rating.filter(|v| (1..=5).contains(v)))
                    .collect();
                let average = if rated.is_empty() {
                    None
                } else {
                    Some(rated.iter().map(|&r| r as f64).sum::<f64>() / rated.len() as f64)
                };

                PeriodCard {
                    key: bucket.key,
                    start: bucket.start,
                    end: bucket.end,
                    count: bucket.members.len(),
                    average,
                    top: extremes.top,
                    low: extremes.low,
                }
            })
            .collect()
    }

    /// Terminal row table: every record in the selected day, chronological.
    pub fn rows<'a>(&self, records: &'a [FeedbackRecord]) -> Vec<&'a FeedbackRecord> {
        if !matches!(self, DrillState::Rows { .. }) {
            return Vec::new();
        }

        let mut rows = self.filter_window(records);
        rows.sort_by_key(|r| r.created_at);
        rows
    }

    fn filter_window<'a>(&self, records: &'a [FeedbackRecord]) -> Vec<&'a FeedbackRecord> {
        match self.window() {
            Some((start, end)) => records
                .iter()
                .filter(|r| match r.created_at {
                    Some(t) => t >= start && t <= end,
                    None => false,
                })
                .collect(),
            None => records.iter().collect(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedbackKind;
    use chrono::TimeZone;

    fn record(id: &str, location: &str, rating: Option<u8>, y: i32, m: u32, d: u32, h: u32) -> FeedbackRecord {
        FeedbackRecord {
            id: id.to_string(),
            email: Some(format!("{}@example.com", id)),
            kind: FeedbackKind::Location,
            feature: None,
            location: Some(location.to_string()),
            rating,
            comment: String::new(),
            image_url: None,
            created_at: Some(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()),
        }
    }

    fn september_fixture() -> Vec<FeedbackRecord> {
        vec![
            record("in-1", "Fort Santiago", Some(5), 2025, 9, 3, 0),
            record("in-2", "Fort Santiago", Some(4), 2025, 9, 3, 12),
            record("in-3", "Rizal Park", Some(2), 2025, 9, 3, 23),
            record("out-same-week", "Rizal Park", Some(3), 2025, 9, 4, 0),
            record("out-month", "Intramuros", Some(4), 2025, 8, 30, 10),
            record("out-year", "Intramuros", Some(1), 2024, 9, 3, 10),
        ]
    }

    #[test]
    fn test_descend_and_ascend_are_inverse_through_all_levels() {
        let state = DrillState::Years;
        let q = state.descend(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(q, DrillState::Quarters { year: 2025 });

        let m = q.descend(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(m, DrillState::Months { year: 2025, quarter: 3 });

        let w = m.descend(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(w, DrillState::Weeks { year: 2025, month: 9 });

        let d = w.descend(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(
            d,
            DrillState::Days {
                year: 2025,
                month: 9,
                week_start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                week_end: NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(),
            }
        );

        let rows = d.descend(NaiveDate::from_ymd_opt(2025, 9, 3).unwrap());
        assert!(matches!(rows, DrillState::Rows { .. }));

        // Walk back up
        assert_eq!(rows.ascend(), d);
        assert_eq!(d.ascend(), w);
        assert_eq!(w.ascend(), m);
        assert_eq!(m.ascend(), q);
        assert_eq!(q.ascend(), DrillState::Years);
        assert_eq!(DrillState::Years.ascend(), DrillState::Years);
    }

    #[test]
    fn test_round_trip_row_table_matches_day_window() {
        let records = september_fixture();

        let mut state = DrillState::Years;
        for day in [(2025, 1, 1), (2025, 7, 1), (2025, 9, 1), (2025, 9, 1), (2025, 9, 3)] {
            state = state.descend(NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap());
        }

        let rows = state.rows(&records);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["in-1", "in-2", "in-3"]);
    }

    #[test]
    fn test_cards_constrained_to_parent_window() {
        let records = september_fixture();

        // Quarter cards for 2025 never include the 2024 record
        let state = DrillState::Quarters { year: 2025 };
        let cards = state.cards(&records, Dimension::Location);
        let total: usize = cards.iter().map(|c| c.count).sum();
        assert_eq!(total, 5);

        // Q3 contains both Aug and Sep records
        let q3 = cards.iter().find(|c| c.key == "Q3 2025").unwrap();
        assert_eq!(q3.count, 5);
        assert_eq!(q3.top, "Fort Santiago");
    }

    #[test]
    fn test_days_window_clipped_to_month() {
        // Week Sep 29 - Oct 5 2025 drilled from September
        let state = DrillState::Days {
            year: 2025,
            month: 9,
            week_start: NaiveDate::from_ymd_opt(2025, 9, 29).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
        };
        let (start, end) = state.window().unwrap();
        assert_eq!(start, day_floor(NaiveDate::from_ymd_opt(2025, 9, 29).unwrap()));
        assert_eq!(end, day_ceil(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()));

        let records = vec![
            record("sep", "Fort Santiago", Some(4), 2025, 9, 30, 10),
            record("oct", "Fort Santiago", Some(4), 2025, 10, 1, 10),
        ];
        let cards = state.cards(&records, Dimension::Location);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].key, "2025-09-30");
    }

    #[test]
    fn test_no_data_renders_empty() {
        let state = DrillState::Quarters { year: 1999 };
        assert!(state.cards(&september_fixture(), Dimension::Location).is_empty());
        assert!(state.rows(&september_fixture()).is_empty());
    }

    #[test]
    fn test_card_average_ignores_unrated() {
        let mut records = september_fixture();
        records.push(record("unrated", "Fort Santiago", None, 2025, 9, 3, 5));

        let state = DrillState::Days {
            year: 2025,
            month: 9,
            week_start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(),
        };
        let cards = state.cards(&records, Dimension::Location);
        let sep3 = cards.iter().find(|c| c.key == "2025-09-03").unwrap();

        // Four members, three rated: (5 + 4 + 2) / 3
        assert_eq!(sep3.count, 4);
        assert!((sep3.average.unwrap() - 11.0 / 3.0).abs() < 1e-9);
    }
}
