//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::aggregation::{Granularity, RatingPolicy, WeekStart};
use crate::commands;
use crate::commands::export::CsvCollection;
use crate::config::default_data_dir;
use crate::drilldown::Dimension;


/// TourKita Insights - feedback analytics and reporting for TourKita
#[derive(Parser)]
#[command(name = "tki")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Show feedback dashboard with KPI cards and ranked breakdowns
    Dashboard {
        /// Skip dump parsing, read from snapshot database only (faster)
        #[arg(long)]
        fast: bool,

        /// Directory holding exported collection dumps
        #[arg(long, env = "TOURKITA_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Interactively drill from years down to single-day feedback
    Drill {
        /// Skip dump parsing, read from snapshot database only (faster)
        #[arg(long)]
        fast: bool,

        /// Categorical field used for per-period top/low ranking
        #[arg(long, value_enum, default_value = "location")]
        dimension: Dimension,

        /// Directory holding exported collection dumps
        #[arg(long, env = "TOURKITA_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Generate a markdown report with trends and rankings
    Report {
        /// Period resolution for trend sections
        #[arg(long, value_enum, default_value = "monthly")]
        granularity: Granularity,

        /// First day of the week for weekly grouping
        #[arg(long, value_enum, default_value = "monday")]
        week_start: WeekStart,

        /// How unrated entries participate in rankings
        #[arg(long, value_enum, default_value = "count-all")]
        rating_policy: RatingPolicy,

        /// Filter to a single year
        #[arg(short, long)]
        year: Option<i32>,

        /// Output file path
        #[arg(long, default_value = "report.md")]
        out: PathBuf,

        /// Skip dump parsing, read from snapshot database only (faster)
        #[arg(long)]
        fast: bool,

        /// Directory holding exported collection dumps
        #[arg(long, env = "TOURKITA_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Export aggregated data
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },

    /// Update the snapshot database from dump files
    Update {
        /// Directory holding exported collection dumps
        #[arg(long, env = "TOURKITA_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
}


#[derive(Subcommand)]
enum ExportCommands {
    /// Write period/group summaries as flat CSV rows
    Csv {
        /// Which collection to summarize
        #[arg(long, value_enum, default_value = "feedback")]
        collection: CsvCollection,

        /// Period resolution
        #[arg(long, value_enum, default_value = "monthly")]
        granularity: Granularity,

        /// First day of the week for weekly grouping
        #[arg(long, value_enum, default_value = "monday")]
        week_start: WeekStart,

        /// Categorical field for feedback summaries
        #[arg(long, value_enum, default_value = "location")]
        dimension: Dimension,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Skip dump parsing, read from snapshot database only (faster)
        #[arg(long)]
        fast: bool,

        /// Directory holding exported collection dumps
        #[arg(long, env = "TOURKITA_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Export yearly feedback heatmap as PNG or SVG
    Heatmap {
        /// Export as SVG instead of PNG
        #[arg(long)]
        svg: bool,

        /// Open file after export
        #[arg(long)]
        open: bool,

        /// Filter by year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Skip dump parsing, read from snapshot database only (faster)
        #[arg(long)]
        fast: bool,

        /// Directory holding exported collection dumps
        #[arg(long, env = "TOURKITA_DATA_DIR")]
        data_dir: Option<PathBuf>,
    },
}


/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Dashboard { fast, data_dir }) => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            commands::dashboard::run(fast, &data_dir)
        }
        Some(Commands::Drill {
            fast,
            dimension,
            data_dir,
        }) => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            commands::drill::run(fast, dimension, &data_dir)
        }
        Some(Commands::Report {
            granularity,
            week_start,
            rating_policy,
            year,
            out,
            fast,
            data_dir,
        }) => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            commands::report::run(granularity, week_start, rating_policy, year, &out, fast, &data_dir)
        }
        Some(Commands::Export { command }) => match command {
            ExportCommands::Csv {
                collection,
                granularity,
                week_start,
                dimension,
                output,
                fast,
                data_dir,
            } => {
                let data_dir = data_dir.unwrap_or_else(default_data_dir);
                commands::export::run_csv(
                    collection,
                    granularity,
                    week_start,
                    dimension,
                    output,
                    fast,
                    &data_dir,
                )
            }
            ExportCommands::Heatmap {
                svg,
                open,
                year,
                output,
                fast,
                data_dir,
            } => {
                let data_dir = data_dir.unwrap_or_else(default_data_dir);
                commands::export::run_heatmap(svg, open, year, output, fast, &data_dir)
            }
        },
        Some(Commands::Update { data_dir }) => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            commands::update::run(&data_dir)
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
