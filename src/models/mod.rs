//! Record models for TourKita collections.

mod feedback;
mod user;

pub use feedback::{FeedbackKind, FeedbackRecord};
pub use user::{UserRecord, STATUS_ARCHIVED};
