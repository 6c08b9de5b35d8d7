//! Review store port
//!
//! The selector depends only on this capability set: an equality filter on
//! staff id, a filter on the featured flag, descending sort by stars and a
//! result limit.

use async_trait::async_trait;
use serde_json::Value;

use super::model::{Review, StaffId};
use crate::Result;

/// Filter on the `featuredReview` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeaturedFilter {
    #[default]
    Any,
    /// `featuredReview == true`
    Only,
    /// `featuredReview != true`
    Exclude,
}

impl FeaturedFilter {
    pub fn matches(self, featured: bool) -> bool {
        match self {
            FeaturedFilter::Any => true,
            FeaturedFilter::Only => featured,
            FeaturedFilter::Exclude => !featured,
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewOrder {
    /// Insertion order of the store
    #[default]
    StoreDefault,
    /// Highest stars first, missing stars last, ties in store order
    StarsDescending,
}

/// A query against a review store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    pub staff_id: StaffId,
    pub featured: FeaturedFilter,
    pub order: ReviewOrder,
    pub limit: Option<usize>,
}

impl ReviewQuery {
    /// All reviews for a staff member, in store order
    pub fn for_staff(staff_id: &StaffId) -> Self {
        Self {
            staff_id: staff_id.clone(),
            featured: FeaturedFilter::Any,
            order: ReviewOrder::StoreDefault,
            limit: None,
        }
    }

    pub fn featured(mut self, featured: FeaturedFilter) -> Self {
        self.featured = featured;
        self
    }

    pub fn order_by(mut self, order: ReviewOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether a review satisfies the query's filters
    pub fn matches(&self, review: &Review) -> bool {
        review.staff_id == self.staff_id.as_str() && self.featured.matches(review.featured_review)
    }
}

/// Read access to stored reviews
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Run a query, returning matching reviews in the requested order
    async fn query(&self, query: &ReviewQuery) -> Result<Vec<Review>>;
}

/// In-process review store backed by a vector in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryReviewStore {
    reviews: Vec<Review>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw documents
    ///
    /// Documents that cannot be coalesced into a review are skipped.
    pub fn from_documents<'a>(docs: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut store = Self::new();
        for doc in docs {
            match Review::from_document(doc) {
                Some(review) => store.insert(review),
                None => tracing::warn!(document = %doc, "Skipping malformed review document"),
            }
        }
        store
    }

    /// Insert a review, replacing any existing review with the same id
    pub fn insert(&mut self, review: Review) {
        match self.reviews.iter_mut().find(|r| r.id == review.id) {
            Some(existing) => *existing = review,
            None => self.reviews.push(review),
        }
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn query(&self, query: &ReviewQuery) -> Result<Vec<Review>> {
        let mut matches: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        if query.order == ReviewOrder::StarsDescending {
            // stable sort keeps store order among equal ratings
            matches.sort_by_key(|r| std::cmp::Reverse(r.rank()));
        }

        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }

        Ok(matches)
    }
}
