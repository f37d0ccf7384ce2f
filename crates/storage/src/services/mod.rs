pub mod rating;
pub mod usage;

pub use rating::{DEFAULT_SKILL_ESTIMATE, MAX_RATING, fallback_rating, normalize_rating};
pub use usage::compute_usage;
