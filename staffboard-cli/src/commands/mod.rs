//! CLI command implementations

pub mod reviews;
pub mod serve;

pub use reviews::ReviewsArgs;
pub use serve::ServeArgs;
