//! Generic placeholder reviews
//!
//! Used to fill the selection when a staff member has too few real reviews,
//! so profiles always have presentable content. The pool is configuration:
//! a deployment can swap the entries or disable it.

use super::model::Review;
use crate::config::{FallbackReviewConfig, ReviewsConfig};

/// Classification tag carried by placeholder reviews
pub const GENERIC_REVIEW_TYPE: &str = "generic";

/// Ordered pool of generic reviews not tied to any staff member
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPool {
    reviews: Vec<Review>,
}

impl FallbackPool {
    /// The built-in pool
    pub fn builtin() -> Self {
        Self::from_entries(&[
            FallbackReviewConfig {
                id: "generic-1".to_string(),
                customer_name: "Sarah M.".to_string(),
                stars: 5,
                text: "Professional, punctual and caring. Our team felt fully supported \
                       throughout the shift."
                    .to_string(),
            },
            FallbackReviewConfig {
                id: "generic-2".to_string(),
                customer_name: "James R.".to_string(),
                stars: 5,
                text: "Reliable cover at short notice and a pleasure to work with. \
                       Would book again."
                    .to_string(),
            },
        ])
    }

    /// An empty pool; selection never adds generic entries
    pub fn disabled() -> Self {
        Self {
            reviews: Vec::new(),
        }
    }

    /// Build a pool from configured entries, in the given order
    pub fn from_entries(entries: &[FallbackReviewConfig]) -> Self {
        let reviews = entries
            .iter()
            .map(|entry| Review {
                id: entry.id.clone(),
                staff_id: String::new(),
                customer_name: entry.customer_name.clone(),
                stars: (1..=5).contains(&entry.stars).then_some(entry.stars),
                text: entry.text.clone(),
                review_type: GENERIC_REVIEW_TYPE.to_string(),
                featured_review: false,
                created_at: None,
            })
            .collect();

        Self { reviews }
    }

    /// Build the pool a deployment has configured
    pub fn from_config(config: &ReviewsConfig) -> Self {
        if !config.fallback_enabled {
            Self::disabled()
        } else if config.fallback_reviews.is_empty() {
            Self::builtin()
        } else {
            Self::from_entries(&config.fallback_reviews)
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

impl Default for FallbackPool {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pool() {
        let pool = FallbackPool::builtin();
        let ids: Vec<_> = pool.reviews().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["generic-1", "generic-2"]);
        assert!(pool
            .reviews()
            .iter()
            .all(|r| r.review_type == GENERIC_REVIEW_TYPE && !r.featured_review));
    }

    #[test]
    fn test_from_config_disabled() {
        let config = ReviewsConfig {
            fallback_enabled: false,
            fallback_reviews: Vec::new(),
        };
        assert!(FallbackPool::from_config(&config).is_empty());
    }

    #[test]
    fn test_from_config_custom_entries() {
        let config = ReviewsConfig {
            fallback_enabled: true,
            fallback_reviews: vec![FallbackReviewConfig {
                id: "house".to_string(),
                customer_name: "Agency".to_string(),
                stars: 9,
                text: "Trusted by our partners.".to_string(),
            }],
        };

        let pool = FallbackPool::from_config(&config);
        assert_eq!(pool.reviews().len(), 1);
        assert_eq!(pool.reviews()[0].id, "house");
        // out-of-range ratings are dropped rather than shown
        assert_eq!(pool.reviews()[0].stars, None);
    }

    #[test]
    fn test_from_config_default_is_builtin() {
        assert_eq!(
            FallbackPool::from_config(&ReviewsConfig::default()),
            FallbackPool::builtin()
        );
    }
}
