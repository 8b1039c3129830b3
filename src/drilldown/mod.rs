//! Interactive drill-down over time periods.

mod navigator;

pub use navigator::{Dimension, DrillState, PeriodCard};
