//! Configuration and settings for TourKita Insights.

mod settings;

pub use settings::{
    default_data_dir,
    find_feedback_dump,
    find_user_dump,
    get_db_path,
};
