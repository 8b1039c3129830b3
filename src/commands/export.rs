//! Export commands for CSV and heatmap generation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Datelike, Local};
use clap::ValueEnum;

use crate::aggregation::{group_by_period, Granularity, WeekStart};
use crate::commands::{fast_mode_ready, load_records};
use crate::drilldown::Dimension;
use crate::export::{
    export_feedback_summary_csv, export_heatmap_png, export_heatmap_svg,
    export_registrations_csv, open_file, DayActivity,
};


/// Which collection a CSV export summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CsvCollection {
    Feedback,
    Users,
}


/// Run the CSV export command.
pub fn run_csv(
    collection: CsvCollection,
    granularity: Granularity,
    week_start: WeekStart,
    dimension: Dimension,
    output: Option<String>,
    fast: bool,
    data_dir: &Path,
) -> Result<()> {
    if !fast_mode_ready(fast) {
        return Ok(());
    }

    let (feedback, users) = load_records(fast, data_dir)?;

    let output_path = match output {
        Some(path) => PathBuf::from(path),
        None => {
            let name = match collection {
                CsvCollection::Feedback => "tourkita-feedback-summary.csv",
                CsvCollection::Users => "tourkita-registrations.csv",
            };
            default_export_dir()?.join(name)
        }
    };

    let rows = match collection {
        CsvCollection::Feedback => {
            if feedback.is_empty() {
                println!("No feedback data to export.");
                return Ok(());
            }
            export_feedback_summary_csv(&feedback, granularity, week_start, dimension, &output_path)?
        }
        CsvCollection::Users => {
            if users.is_empty() {
                println!("No user data to export.");
                return Ok(());
            }
            export_registrations_csv(&users, granularity, week_start, &output_path)?
        }
    };

    println!(
        "\x1b[32m+ Exported {} rows to: {}\x1b[0m",
        rows,
        output_path.display()
    );

    Ok(())
}


/// Run the heatmap export command.
pub fn run_heatmap(
    svg: bool,
    should_open: bool,
    year: Option<i32>,
    output: Option<String>,
    fast: bool,
    data_dir: &Path,
) -> Result<()> {
    if !fast_mode_ready(fast) {
        return Ok(());
    }

    let display_year = year.unwrap_or_else(|| Local::now().year());
    if chrono::NaiveDate::from_ymd_opt(display_year, 1, 1).is_none() {
        anyhow::bail!("Invalid year: {}", display_year);
    }

    let format_type = if svg { "svg" } else { "png" };
    let output_path = match output {
        Some(path) => PathBuf::from(path),
        None => default_export_dir()?.join(format!("tourkita-feedback.{}", format_type)),
    };

    let (feedback, _) = load_records(fast, data_dir)?;

    if feedback.is_empty() {
        println!("No feedback data found. Run 'tki update' or check --data-dir.");
        return Ok(());
    }

    // One DayActivity per day of the target year
    let in_year: Vec<_> = feedback
        .iter()
        .filter(|r| r.created_at.map(|t| t.year() == display_year).unwrap_or(false))
        .collect();
    let grouped = group_by_period(&in_year, Granularity::Daily, WeekStart::Monday, |r| {
        r.created_at
    });

    let mut daily: HashMap<String, DayActivity> = HashMap::new();
    for bucket in grouped.buckets.iter() {
        let rated: Vec<u8> = bucket
            .members
            .iter()
            .filter_map(|r| r.rating.filter(|v| (1..=5).contains(v)))
            .collect();
        daily.insert(
            bucket.key.clone(),
            DayActivity {
                count: bucket.members.len() as i64,
                rated: rated.len() as i64,
                rating_sum: rated.iter().map(|&r| r as i64).sum(),
            },
        );
    }

    if daily.is_empty() {
        println!("No feedback found for year {}.", display_year);
        return Ok(());
    }

    println!("Exporting to {}...", format_type.to_uppercase());

    if svg {
        export_heatmap_svg(&daily, &output_path, display_year)?;
    } else {
        export_heatmap_png(&daily, &output_path, display_year)?;
    }

    println!("\x1b[32m+ Exported to: {}\x1b[0m", output_path.display());

    if should_open {
        println!("Opening {}...", format_type.to_uppercase());
        open_file(&output_path)?;
    }

    Ok(())
}


fn default_export_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tourkita")
        .join("insights");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
