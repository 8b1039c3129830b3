//! Visualization layer for dashboards and drill-down views.

mod dashboard;

pub use dashboard::{render_dashboard, render_period_cards, render_row_table};
