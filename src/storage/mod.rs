//! Storage layer for ingested snapshot data.

mod database;

pub use database::{
    get_database_stats,
    init_database,
    load_feedback_records,
    load_user_records,
    save_feedback_snapshot,
    save_user_snapshot,
    DatabaseStats,
};
