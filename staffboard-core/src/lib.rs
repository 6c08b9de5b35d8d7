//! Staffboard Core - review selection for the Staffboard staffing dashboard
//!
//! This crate holds the review model, the store abstraction the selector
//! queries through, and the tiered selection policy that picks the reviews
//! shown on a staff member's profile.

pub mod config;
pub mod error;
pub mod review;

pub use config::Config;
pub use error::{Error, Result};
pub use review::{
    FallbackPool, FeaturedFilter, MemoryReviewStore, NewReview, Review, ReviewOrder, ReviewQuery,
    ReviewSelector, ReviewStore, StaffId, MAX_TOP_REVIEWS,
};
