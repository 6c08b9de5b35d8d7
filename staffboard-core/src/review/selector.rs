//! Tiered review selection
//!
//! Picks the reviews shown on a staff profile. Tiers are tried in order
//! until [`MAX_TOP_REVIEWS`] reviews are collected:
//!
//! 1. featured reviews, in store order
//! 2. the staff member's other reviews, highest stars first
//! 3. generic placeholder reviews from the [`FallbackPool`]
//!
//! A review id never appears twice. A failing store query fails the whole
//! selection; partially collected tiers are discarded.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::fallback::FallbackPool;
use super::model::{Review, StaffId};
use super::store::{FeaturedFilter, ReviewOrder, ReviewQuery, ReviewStore};
use crate::Result;

/// Maximum number of reviews a selection returns
pub const MAX_TOP_REVIEWS: usize = 2;

/// Selects the best reviews for a staff member
#[derive(Clone)]
pub struct ReviewSelector {
    store: Arc<dyn ReviewStore>,
    fallback: FallbackPool,
}

impl ReviewSelector {
    /// Create a selector over a store with the built-in fallback pool
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self::with_fallback(store, FallbackPool::builtin())
    }

    /// Create a selector with a specific fallback pool
    pub fn with_fallback(store: Arc<dyn ReviewStore>, fallback: FallbackPool) -> Self {
        Self { store, fallback }
    }

    /// Generic reviews used when the store cannot fill a selection
    pub fn fallback(&self) -> &FallbackPool {
        &self.fallback
    }

    /// Select up to [`MAX_TOP_REVIEWS`] reviews for a staff member
    pub async fn select_top_reviews(&self, staff_id: &StaffId) -> Result<Vec<Review>> {
        let mut selection = Selection::default();

        let featured = self
            .store
            .query(
                &ReviewQuery::for_staff(staff_id)
                    .featured(FeaturedFilter::Only)
                    .limit(MAX_TOP_REVIEWS),
            )
            .await?;
        selection.extend(featured);

        if !selection.is_full() {
            let top_rated = self
                .store
                .query(
                    &ReviewQuery::for_staff(staff_id)
                        .featured(FeaturedFilter::Exclude)
                        .order_by(ReviewOrder::StarsDescending)
                        .limit(selection.remaining()),
                )
                .await?;
            selection.extend(top_rated);
        }

        let real = selection.len();
        if !selection.is_full() {
            selection.extend(self.fallback.reviews().iter().cloned());
        }

        let reviews = selection.finish();
        debug!(
            staff_id = %staff_id,
            real,
            generic = reviews.len() - real,
            "Selected top reviews"
        );

        Ok(reviews)
    }
}

impl std::fmt::Debug for ReviewSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewSelector")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Accumulates reviews across tiers, deduplicated by id
#[derive(Default)]
struct Selection {
    reviews: Vec<Review>,
    seen: HashSet<String>,
}

impl Selection {
    fn extend(&mut self, candidates: impl IntoIterator<Item = Review>) {
        for review in candidates {
            if self.is_full() {
                break;
            }
            if self.seen.insert(review.id.clone()) {
                self.reviews.push(review);
            }
        }
    }

    fn len(&self) -> usize {
        self.reviews.len()
    }

    fn remaining(&self) -> usize {
        MAX_TOP_REVIEWS.saturating_sub(self.reviews.len())
    }

    fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    fn finish(mut self) -> Vec<Review> {
        self.reviews.truncate(MAX_TOP_REVIEWS);
        self.reviews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::MemoryReviewStore;
    use crate::Error;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn selector(docs: &[Value]) -> ReviewSelector {
        ReviewSelector::new(Arc::new(MemoryReviewStore::from_documents(docs)))
    }

    fn staff(id: &str) -> StaffId {
        StaffId::parse(id).unwrap()
    }

    fn ids(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.id.as_str()).collect()
    }

    /// Store that fails on a chosen call and counts queries
    struct FlakyStore {
        inner: MemoryReviewStore,
        fail_on_call: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReviewStore for FlakyStore {
        async fn query(&self, query: &ReviewQuery) -> Result<Vec<Review>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_on_call {
                return Err(Error::StoreUnavailable("connection reset".to_string()));
            }
            self.inner.query(query).await
        }
    }

    /// Store that ignores the featured filter, returning the same review to every tier
    struct OverlappingStore {
        review: Review,
    }

    #[async_trait]
    impl ReviewStore for OverlappingStore {
        async fn query(&self, _query: &ReviewQuery) -> Result<Vec<Review>> {
            Ok(vec![self.review.clone()])
        }
    }

    #[tokio::test]
    async fn test_two_featured_reviews_win() {
        let selector = selector(&[
            json!({ "id": "a", "staffId": "S1", "featuredReview": true, "stars": 4 }),
            json!({ "id": "b", "staffId": "S1", "featuredReview": true, "stars": 5 }),
            json!({ "id": "c", "staffId": "S1", "featuredReview": false, "stars": 5 }),
        ]);

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_more_than_two_featured_capped() {
        let selector = selector(&[
            json!({ "id": "f1", "staffId": "S1", "featuredReview": true }),
            json!({ "id": "f2", "staffId": "S1", "featuredReview": true }),
            json!({ "id": "f3", "staffId": "S1", "featuredReview": true }),
        ]);

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["f1", "f2"]);
    }

    #[tokio::test]
    async fn test_featured_then_top_rated() {
        let selector = selector(&[
            json!({ "id": "low", "staffId": "S1", "stars": 2 }),
            json!({ "id": "feat", "staffId": "S1", "featuredReview": true, "stars": 3 }),
            json!({ "id": "high", "staffId": "S1", "stars": 5 }),
        ]);

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["feat", "high"]);
    }

    #[tokio::test]
    async fn test_top_rated_by_descending_stars() {
        let selector = selector(&[
            json!({ "id": "x", "staffId": "S2", "featuredReview": false, "stars": 3 }),
            json!({ "id": "y", "staffId": "S2", "featuredReview": false, "stars": 5 }),
        ]);

        let result = selector.select_top_reviews(&staff("S2")).await.unwrap();
        assert_eq!(ids(&result), vec!["y", "x"]);
    }

    #[tokio::test]
    async fn test_missing_stars_rank_last() {
        let selector = selector(&[
            json!({ "id": "none", "staffId": "S1" }),
            json!({ "id": "one", "staffId": "S1", "stars": 1 }),
            json!({ "id": "bad", "staffId": "S1", "stars": "n/a" }),
        ]);

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["one", "none"]);
    }

    #[tokio::test]
    async fn test_no_reviews_uses_generic_pool() {
        let selector = selector(&[json!({ "id": "other", "staffId": "S9", "stars": 5 })]);

        let result = selector.select_top_reviews(&staff("S3")).await.unwrap();
        assert_eq!(ids(&result), vec!["generic-1", "generic-2"]);
    }

    #[tokio::test]
    async fn test_single_review_padded_with_generic() {
        let selector = selector(&[json!({ "id": "only", "staffId": "S1", "stars": 4 })]);

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["only", "generic-1"]);
    }

    #[tokio::test]
    async fn test_disabled_fallback_returns_short_list() {
        let store = MemoryReviewStore::from_documents(&[
            json!({ "id": "only", "staffId": "S1", "stars": 4 }),
        ]);
        let selector = ReviewSelector::with_fallback(Arc::new(store), FallbackPool::disabled());
        assert!(selector.fallback().is_empty());

        assert_eq!(
            ids(&selector.select_top_reviews(&staff("S1")).await.unwrap()),
            vec!["only"]
        );
        assert!(selector
            .select_top_reviews(&staff("S2"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_generic_ids_already_used_are_skipped() {
        // a real review sharing an id with a placeholder must not be shown twice
        let selector = selector(&[json!({ "id": "generic-1", "staffId": "S1", "stars": 4 })]);

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["generic-1", "generic-2"]);
        assert_eq!(result[0].staff_id, "S1");
    }

    #[tokio::test]
    async fn test_duplicate_across_tiers_is_dropped() {
        let review =
            Review::from_document(&json!({ "id": "dup", "staffId": "S1", "stars": 5 })).unwrap();
        let selector = ReviewSelector::new(Arc::new(OverlappingStore { review }));

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["dup", "generic-1"]);
    }

    #[tokio::test]
    async fn test_featured_tier_full_skips_store() {
        let store = FlakyStore {
            inner: MemoryReviewStore::from_documents(&[
                json!({ "id": "a", "staffId": "S1", "featuredReview": true }),
                json!({ "id": "b", "staffId": "S1", "featuredReview": true }),
            ]),
            fail_on_call: 2,
            calls: AtomicUsize::new(0),
        };
        let store = Arc::new(store);
        let selector = ReviewSelector::new(store.clone());

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert_eq!(ids(&result), vec!["a", "b"]);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_failure_discards_partial_results() {
        let store = FlakyStore {
            inner: MemoryReviewStore::from_documents(&[
                json!({ "id": "a", "staffId": "S1", "featuredReview": true }),
                json!({ "id": "c", "staffId": "S1", "stars": 5 }),
            ]),
            fail_on_call: 2,
            calls: AtomicUsize::new(0),
        };
        let selector = ReviewSelector::new(Arc::new(store));

        let result = selector.select_top_reviews(&staff("S1")).await;
        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_never_more_than_two_and_no_duplicates() {
        let mut docs = Vec::new();
        for i in 0..10 {
            docs.push(json!({
                "id": format!("r{}", i % 4),
                "staffId": "S1",
                "stars": (i % 5) + 1,
                "featuredReview": i % 3 == 0
            }));
        }
        let selector = selector(&docs);

        let result = selector.select_top_reviews(&staff("S1")).await.unwrap();
        assert!(result.len() <= MAX_TOP_REVIEWS);
        let unique: HashSet<_> = result.iter().map(|r| &r.id).collect();
        assert_eq!(unique.len(), result.len());
    }
}
