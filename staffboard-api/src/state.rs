use std::sync::Arc;

use staffboard_core::{FallbackPool, ReviewSelector};
use staffboard_db::Database;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub selector: ReviewSelector,
}

impl AppState {
    /// Selector reads from the same database the write routes use
    pub fn new(db: Database, fallback: FallbackPool) -> Self {
        let selector = ReviewSelector::with_fallback(Arc::new(db.reviews()), fallback);
        Self { db, selector }
    }

    pub fn with_selector(db: Database, selector: ReviewSelector) -> Self {
        Self { db, selector }
    }
}
