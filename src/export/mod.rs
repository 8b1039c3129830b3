//! Export sinks for aggregated output.

mod heatmap;
mod spreadsheet;

pub use heatmap::{export_heatmap_png, export_heatmap_svg, open_file, DayActivity};
pub use spreadsheet::{export_feedback_summary_csv, export_registrations_csv};
