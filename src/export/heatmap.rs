//! Yearly feedback-activity heatmap export (SVG/PNG).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};

use crate::format::month_abbrev;


// TourKita console color scheme
const BG: &str = "#1F2430";
const TEXT: &str = "#F4F2EC";
const TEXT_SECONDARY: &str = "#B8BCC8";
const EMPTY_CELL: &str = "#3A4050";
const FUTURE_CELL: &str = "#62687A";

// Accent per average-rating band
const GOOD_RGB: (u8, u8, u8) = (98, 186, 128);
const MID_RGB: (u8, u8, u8) = (222, 178, 86);
const BAD_RGB: (u8, u8, u8) = (214, 94, 86);
const UNRATED_RGB: (u8, u8, u8) = (110, 140, 196);

// Cell dimensions (scaled for sharp output)
const SCALE_FACTOR: i32 = 3;
const CELL_SIZE: i32 = 12 * SCALE_FACTOR;
const CELL_GAP: i32 = 3 * SCALE_FACTOR;
const CELL_TOTAL: i32 = CELL_SIZE + CELL_GAP;


/// Daily feedback totals for heatmap rendering.
#[derive(Debug, Clone, Default)]
pub struct DayActivity {
    pub count: i64,
    pub rated: i64,
    pub rating_sum: i64,
}


impl DayActivity {
    /// Mean rating of the day, None when nothing was rated.
    pub fn average(&self) -> Option<f64> {
        if self.rated > 0 {
            Some(self.rating_sum as f64 / self.rated as f64)
        } else {
            None
        }
    }
}


/// Export the heatmap as SVG.
pub fn export_heatmap_svg(
    daily: &HashMap<String, DayActivity>,
    output_path: &Path,
    year: i32,
) -> Result<()> {
    let svg_content = generate_svg(daily, year);

    std::fs::write(output_path, svg_content)
        .with_context(|| format!("Failed to write SVG to {}", output_path.display()))?;

    Ok(())
}


/// Export the heatmap as PNG.
pub fn export_heatmap_png(
    daily: &HashMap<String, DayActivity>,
    output_path: &Path,
    year: i32,
) -> Result<()> {
    let svg_content = generate_svg(daily, year);

    let tree = resvg::usvg::Tree::from_str(&svg_content, &resvg::usvg::Options::default())
        .context("Failed to parse SVG")?;

    let size = tree.size();
    let width = size.width() as u32;
    let height = size.height() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .context("Failed to create pixmap")?;

    let bg = hex_to_rgb(BG);
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.0, bg.1, bg.2, 255));

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .save_png(output_path)
        .with_context(|| format!("Failed to save PNG to {}", output_path.display()))?;

    Ok(())
}


/// Generate SVG content for the heatmap.
fn generate_svg(daily: &HashMap<String, DayActivity>, year: i32) -> String {
    let today = Local::now().date_naive();
    let start_date = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid year start");
    let end_date = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid year end");

    // Build weeks structure, Sunday columns like a calendar wall
    let jan1_day = start_date.weekday().num_days_from_sunday() as usize;
    let mut weeks: Vec<Vec<Option<NaiveDate>>> = Vec::new();
    let mut current_week: Vec<Option<NaiveDate>> = Vec::new();

    for _ in 0..jan1_day {
        current_week.push(None);
    }

    let mut current_date = start_date;
    while current_date <= end_date {
        current_week.push(Some(current_date));

        if current_week.len() == 7 {
            weeks.push(current_week);
            current_week = Vec::new();
        }

        current_date = match current_date.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }

    if !current_week.is_empty() {
        while current_week.len() < 7 {
            current_week.push(None);
        }
        weeks.push(current_week);
    }

    let num_weeks = weeks.len() as i32;
    let width = (num_weeks * CELL_TOTAL) + 120;
    let height = (7 * CELL_TOTAL) + 80;

    let max_count = daily.values().map(|s| s.count).max().unwrap_or(1).max(1);

    let mut svg_parts = vec![
        format!(r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">"#, width, height),
        "<style>".to_string(),
        format!("  .day-cell {{ stroke: {}; stroke-width: 1; }}", BG),
        format!("  .month-label {{ fill: {}; font: 12px -apple-system, sans-serif; }}", TEXT_SECONDARY),
        format!("  .day-label {{ fill: {}; font: 10px -apple-system, sans-serif; }}", TEXT_SECONDARY),
        format!("  .title {{ fill: {}; font: bold 16px -apple-system, sans-serif; }}", TEXT),
        format!("  .legend-text {{ fill: {}; font: 10px -apple-system, sans-serif; }}", TEXT_SECONDARY),
        "</style>".to_string(),
        format!(r#"<rect width="{}" height="{}" fill="{}"/>"#, width, height, BG),
    ];

    svg_parts.push(format!(
        r#"<text x="10" y="25" class="title">TourKita feedback activity in {}</text>"#,
        year
    ));

    // Day labels
    let day_names = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    for (day_idx, day_name) in day_names.iter().enumerate() {
        let y = 60 + (day_idx as i32 * CELL_TOTAL) + (CELL_SIZE / 2);
        svg_parts.push(format!(
            r#"<text x="5" y="{}" class="day-label" text-anchor="start">{}</text>"#,
            y + 4,
            day_name
        ));
    }

    // Month labels
    let mut last_month = 0u32;
    for (week_idx, week) in weeks.iter().enumerate() {
        for date in week.iter().flatten() {
            let month = date.month();
            if month != last_month {
                let x = 40 + (week_idx as i32 * CELL_TOTAL);
                svg_parts.push(format!(
                    r#"<text x="{}" y="50" class="month-label">{}</text>"#,
                    x,
                    month_abbrev(month)
                ));
                last_month = month;
            }
            break;
        }
    }

    // Heatmap cells
    for (week_idx, week) in weeks.iter().enumerate() {
        for (day_idx, date_opt) in week.iter().enumerate() {
            let Some(date) = date_opt else { continue };

            let x = 40 + (week_idx as i32 * CELL_TOTAL);
            let y = 60 + (day_idx as i32 * CELL_TOTAL);

            let date_key = date.format("%Y-%m-%d").to_string();
            let day_activity = daily.get(&date_key);

            let color = cell_color(day_activity, max_count, *date, today);

            let tooltip = match day_activity {
                Some(activity) if activity.count > 0 => match activity.average() {
                    Some(avg) => format!(
                        "{}: {} entries, avg rating {:.1}",
                        date, activity.count, avg
                    ),
                    None => format!("{}: {} entries, no ratings", date, activity.count),
                },
                _ if *date > today => format!("{}: Future", date),
                _ => format!("{}: No feedback", date),
            };

            svg_parts.push(format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" class="day-cell"><title>{}</title></rect>"#,
                x, y, CELL_SIZE, CELL_SIZE, color, tooltip
            ));
        }
    }

    // Legend: count intensity in the good-rating accent
    let legend_y = height - 20;
    let legend_x = 40;
    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="legend-text">Fewer</text>"#,
        legend_x, legend_y
    ));

    for i in 0..5 {
        let ratio = 0.2 + (i as f64 / 4.0) * 0.8;
        let color = blend(hex_to_rgb(EMPTY_CELL), GOOD_RGB, ratio);
        let x = legend_x + 40 + (i * (CELL_SIZE + 2));
        svg_parts.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" class="day-cell"/>"#,
            x,
            legend_y - CELL_SIZE + 2,
            CELL_SIZE,
            CELL_SIZE,
            color
        ));
    }

    svg_parts.push(format!(
        r#"<text x="{}" y="{}" class="legend-text">More</text>"#,
        legend_x + 40 + (5 * (CELL_SIZE + 2)) + 5,
        legend_y
    ));

    svg_parts.push("</svg>".to_string());

    svg_parts.join("\n")
}


/// Cell color: intensity follows the day's entry count, hue follows the
/// day's average rating band.
fn cell_color(
    day_activity: Option<&DayActivity>,
    max_count: i64,
    date: NaiveDate,
    today: NaiveDate,
) -> String {
    if date > today {
        return FUTURE_CELL.to_string();
    }

    let count = day_activity.map(|s| s.count).unwrap_or(0);
    if count == 0 {
        return EMPTY_CELL.to_string();
    }

    let accent = match day_activity.and_then(|s| s.average()) {
        Some(avg) if avg >= 4.0 => GOOD_RGB,
        Some(avg) if avg >= 3.0 => MID_RGB,
        Some(_) => BAD_RGB,
        None => UNRATED_RGB,
    };

    // Non-linear scaling keeps sparse days visible
    let ratio = (count as f64 / max_count as f64).sqrt();
    blend(hex_to_rgb(EMPTY_CELL), accent, ratio)
}


fn blend(from: (u8, u8, u8), to: (u8, u8, u8), ratio: f64) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let r = (from.0 as f64 + (to.0 as f64 - from.0 as f64) * ratio) as u8;
    let g = (from.1 as f64 + (to.1 as f64 - from.1 as f64) * ratio) as u8;
    let b = (from.2 as f64 + (to.2 as f64 - from.2 as f64) * ratio) as u8;
    format!("rgb({},{},{})", r, g, b)
}


/// Convert hex color to RGB tuple.
fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    (r, g, b)
}


/// Open file with default application.
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    Ok(())
}
