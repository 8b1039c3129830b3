//! Dashboard rendering using terminal output.

use crate::aggregation::{aggregate_by, rank_extremes, GroupSummary, RatingPolicy};
use crate::drilldown::PeriodCard;
use crate::format::{format_average, format_number};
use crate::models::{FeedbackRecord, UserRecord};


// Constants
const TEAL: &str = "\x1b[38;5;37m";
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 20;


/// Create a simple text bar for visualization.
fn create_bar(value: usize, max_value: usize, width: usize, color: &str) -> String {
    if max_value == 0 {
        return "░".repeat(width);
    }

    let filled = ((value as f64 / max_value as f64) * width as f64) as usize;
    let filled = filled.min(width);

    format!(
        "{}{}{}{}{}",
        color,
        "█".repeat(filled),
        RESET,
        DIM,
        "░".repeat(width - filled),
    ) + RESET
}


/// Render the complete dashboard.
pub fn render_dashboard(
    feedback: &[FeedbackRecord],
    users: &[UserRecord],
    date_range: Option<&str>,
    fast_mode: bool,
    clear_screen: bool,
) {
    if clear_screen {
        print!("\x1b[2J\x1b[H"); // Clear screen and move cursor to top
    }

    render_kpi_section(feedback, users);
    println!();

    render_breakdown("Locations by Rating", feedback, |r| r.location.clone());
    println!();

    render_breakdown("Features by Rating", feedback, |r| r.feature.clone());
    println!();

    render_footer(date_range, fast_mode);
}


/// Render the KPI cards section.
fn render_kpi_section(feedback: &[FeedbackRecord], users: &[UserRecord]) {
    let rated: Vec<u8> = feedback
        .iter()
        .filter_map(|r| r.rating.filter(|v| (1..=5).contains(v)))
        .collect();
    let average = if rated.is_empty() {
        None
    } else {
        Some(rated.iter().map(|&r| r as f64).sum::<f64>() / rated.len() as f64)
    };
    let active_users = users.iter().filter(|u| u.active_status).count();

    let width = 28;
    let border = "─".repeat(width - 2);

    println!("┌{}┐  ┌{}┐  ┌{}┐", border, border, border);

    println!(
        "│{:^26}│  │{:^26}│  │{:^26}│",
        "Total Feedback", "Avg Rating", "Active Users"
    );

    println!(
        "│{}{}{:^26}{}│  │{}{:^26}{}│  │{}{:^26}{}│",
        BOLD,
        TEAL,
        format_number(feedback.len() as i64),
        RESET,
        BOLD,
        format_average(average),
        RESET,
        BOLD,
        format_number(active_users as i64),
        RESET,
    );

    println!("└{}┘  └{}┘  └{}┘", border, border, border);
}


/// Render one ranked breakdown section with bars scaled by entry count.
fn render_breakdown(
    title: &str,
    feedback: &[FeedbackRecord],
    key_fn: impl Fn(&FeedbackRecord) -> Option<String>,
) {
    let with_key: Vec<&FeedbackRecord> = feedback.iter().filter(|r| key_fn(r).is_some()).collect();
    let summaries = aggregate_by(&with_key, |r| key_fn(r), |r| r.rating, RatingPolicy::CountAll);

    if summaries.is_empty() {
        println!("{}No {} data available{}", DIM, title.to_lowercase(), RESET);
        return;
    }

    let max_count = summaries.iter().map(|s| s.count).max().unwrap_or(0);
    let extremes = rank_extremes(&summaries);

    println!("┌────────────────────────────────────────────────────────────────────────────┐");
    println!("│ {}{:74}{} │", BOLD, title, RESET);
    println!("├────────────────────────────────────────────────────────────────────────────┤");

    for summary in summaries.iter().take(10) {
        print_summary_row(summary, max_count);
    }

    println!("├────────────────────────────────────────────────────────────────────────────┤");
    println!(
        "│ {}Top: {:<30} Low: {:<32}{} │",
        DIM,
        truncate(&extremes.top, 30),
        truncate(&extremes.low, 32),
        RESET
    );
    println!("└────────────────────────────────────────────────────────────────────────────┘");
}


fn print_summary_row(summary: &GroupSummary, max_count: usize) {
    let bar = create_bar(summary.count, max_count, BAR_WIDTH, TEAL);

    println!(
        "│ {:25} {} {}{:>5}{} {}avg {:>4}{}          │",
        truncate(&summary.key, 25),
        bar,
        TEAL,
        format_number(summary.count as i64),
        RESET,
        CYAN,
        format_average(summary.average),
        RESET,
    );
}


/// Render candidate period cards for one drill-down level.
pub fn render_period_cards(title: &str, cards: &[PeriodCard]) {
    println!("{}{}{}", BOLD, title, RESET);
    println!();

    if cards.is_empty() {
        println!("{}No data for this period{}", DIM, RESET);
        return;
    }

    for (idx, card) in cards.iter().enumerate() {
        println!(
            "  {}[{}]{} {:20} {}{:>6} entries{}  avg {:4}  {}top {} / low {}{}",
            CYAN,
            idx + 1,
            RESET,
            card.key,
            TEAL,
            format_number(card.count as i64),
            RESET,
            format_average(card.average),
            DIM,
            truncate(&card.top, 20),
            truncate(&card.low, 20),
            RESET,
        );
    }
}


/// Render the terminal row table for a single day.
pub fn render_row_table(rows: &[&FeedbackRecord]) {
    if rows.is_empty() {
        println!("{}No feedback on this day{}", DIM, RESET);
        return;
    }

    println!(
        "{}{:25} {:8} {:20} {:6} {}{}",
        BOLD, "Submitter", "Type", "Feature/Location", "Rating", "Comment", RESET
    );

    for row in rows {
        let rating = row
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let rating_color = match row.rating {
            Some(r) if r <= 2 => RED,
            _ => RESET,
        };

        println!(
            "{:25} {:8} {:20} {}{:6}{} {}",
            truncate(row.submitter(), 25),
            row.kind.label(),
            truncate(row.group_key().as_deref().unwrap_or("N/A"), 20),
            rating_color,
            rating,
            RESET,
            truncate(&row.comment, 40),
        );
    }
}


/// Render the footer with tips and date range.
fn render_footer(date_range: Option<&str>, fast_mode: bool) {
    if fast_mode {
        println!("{}{}! Fast mode: Reading from snapshot database{}", BOLD, RED, RESET);
        println!();
    }

    if let Some(range) = date_range {
        println!("{}Data range: {}{}{}", DIM, RESET, CYAN, range);
        println!("{}", RESET);
    }

    println!(
        "{}Tip: Explore periods interactively with {}{}tki drill{}",
        DIM, RESET, CYAN, RESET
    );
}


fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_bar_bounds() {
        assert_eq!(create_bar(0, 0, 4, TEAL), "░░░░");

        let full = create_bar(10, 10, 4, TEAL);
        assert!(full.contains("████"));

        let half = create_bar(5, 10, 4, TEAL);
        assert!(half.contains("██"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long location name", 6), "a very");
    }
}
