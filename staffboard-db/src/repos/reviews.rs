//! Repository for review operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use staffboard_core::{
    FeaturedFilter, NewReview, Review, ReviewOrder, ReviewQuery, ReviewStore, StaffId,
};

use crate::{Error, Result};

const COLUMNS: &str =
    "id, staff_id, customer_name, stars, text, review_type, featured_review, created_at";

/// Row shape of the `reviews` table
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: String,
    staff_id: String,
    customer_name: String,
    stars: Option<i64>,
    text: String,
    review_type: String,
    featured_review: bool,
    created_at: Option<DateTime<Utc>>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            staff_id: row.staff_id,
            customer_name: row.customer_name,
            stars: row
                .stars
                .and_then(|s| u8::try_from(s).ok())
                .filter(|s| (1..=5).contains(s)),
            text: row.text,
            review_type: row.review_type,
            featured_review: row.featured_review,
            created_at: row.created_at,
        }
    }
}

/// Repository for managing review records
#[derive(Clone)]
pub struct ReviewsRepo {
    pool: SqlitePool,
}

impl ReviewsRepo {
    /// Create a new repository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new review, assigning its id and creation time
    pub async fn insert(&self, new: &NewReview) -> Result<Review> {
        let staff_id = new.validate()?;

        let review = Review {
            id: Uuid::new_v4().to_string(),
            staff_id: staff_id.to_string(),
            customer_name: new.customer_name.trim().to_string(),
            stars: Some(new.stars),
            text: new.text.clone(),
            review_type: new.review_type.clone(),
            featured_review: new.featured_review,
            created_at: Some(Utc::now()),
        };

        sqlx::query(
            "INSERT INTO reviews (
                id, staff_id, customer_name, stars, text, review_type, featured_review, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&review.id)
        .bind(&review.staff_id)
        .bind(&review.customer_name)
        .bind(review.stars.map(i64::from))
        .bind(&review.text)
        .bind(&review.review_type)
        .bind(review.featured_review)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(id = %review.id, staff_id = %review.staff_id, "Created review");
        Ok(review)
    }

    /// Insert or replace a review that already carries its id
    ///
    /// A replaced review keeps its original position in store order.
    pub async fn upsert(&self, review: &Review) -> Result<()> {
        let staff_id = StaffId::parse(&review.staff_id)?;

        sqlx::query(
            "INSERT INTO reviews (
                id, staff_id, customer_name, stars, text, review_type, featured_review, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                staff_id = excluded.staff_id,
                customer_name = excluded.customer_name,
                stars = excluded.stars,
                text = excluded.text,
                review_type = excluded.review_type,
                featured_review = excluded.featured_review,
                created_at = excluded.created_at",
        )
        .bind(&review.id)
        .bind(staff_id.as_str())
        .bind(&review.customer_name)
        .bind(review.stars.filter(|s| (1..=5).contains(s)).map(i64::from))
        .bind(&review.text)
        .bind(&review.review_type)
        .bind(review.featured_review)
        .bind(review.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find a review by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Review> {
        let row: Option<ReviewRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM reviews WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Review::from)
            .ok_or_else(|| Error::NotFound(format!("Review with id {} not found", id)))
    }

    /// Find all reviews for a staff member, newest first
    pub async fn find_by_staff(&self, staff_id: &StaffId) -> Result<Vec<Review>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM reviews
             WHERE staff_id = ?1
             ORDER BY created_at DESC, seq DESC"
        ))
        .bind(staff_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Find reviews matching a store query
    pub async fn find_matching(&self, query: &ReviewQuery) -> Result<Vec<Review>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM reviews WHERE staff_id = "));
        builder.push_bind(query.staff_id.as_str().to_string());

        match query.featured {
            FeaturedFilter::Any => {}
            FeaturedFilter::Only => {
                builder.push(" AND featured_review = 1");
            }
            FeaturedFilter::Exclude => {
                builder.push(" AND featured_review = 0");
            }
        }

        builder.push(match query.order {
            ReviewOrder::StoreDefault => " ORDER BY seq ASC",
            // NULL stars sort after every rating
            ReviewOrder::StarsDescending => " ORDER BY stars IS NULL, stars DESC, seq ASC",
        });

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<ReviewRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Set or clear the featured flag on a review
    pub async fn set_featured(&self, id: &str, featured: bool) -> Result<()> {
        let affected = sqlx::query("UPDATE reviews SET featured_review = ?1 WHERE id = ?2")
            .bind(featured)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound(format!("Review with id {} not found", id)));
        }

        tracing::info!(id, featured, "Updated featured flag");
        Ok(())
    }

    /// Delete a review by ID
    pub async fn delete(&self, id: &str) -> Result<()> {
        let affected = sqlx::query("DELETE FROM reviews WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound(format!("Review with id {} not found", id)));
        }

        tracing::info!(id, "Deleted review");
        Ok(())
    }

    /// Count total reviews
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count reviews for a staff member
    pub async fn count_by_staff(&self, staff_id: &StaffId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE staff_id = ?1")
            .bind(staff_id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ReviewStore for ReviewsRepo {
    async fn query(&self, query: &ReviewQuery) -> staffboard_core::Result<Vec<Review>> {
        self.find_matching(query).await.map_err(Into::into)
    }
}
