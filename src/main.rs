//! TourKita Insights CLI
//!
//! Feedback analytics and reporting for the TourKita tourism app.

mod aggregation;
mod cli;
mod commands;
mod config;
mod data;
mod drilldown;
mod export;
mod format;
mod models;
mod report;
mod storage;
mod visualization;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
