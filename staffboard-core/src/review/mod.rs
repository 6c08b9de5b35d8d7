//! Reviews of staff members and the selection of top reviews

pub mod fallback;
pub mod model;
pub mod selector;
pub mod store;

pub use fallback::FallbackPool;
pub use model::{NewReview, Review, StaffId};
pub use selector::{ReviewSelector, MAX_TOP_REVIEWS};
pub use store::{FeaturedFilter, MemoryReviewStore, ReviewOrder, ReviewQuery, ReviewStore};
