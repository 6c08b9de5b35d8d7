use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use staffboard_core::{NewReview, Review, StaffId};

use crate::extract::{ApiJson, ApiQuery};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct StaffParams {
    pub staff_id: Option<String>,
}

impl StaffParams {
    fn staff_id(&self) -> ApiResult<StaffId> {
        let raw = self
            .staff_id
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest("staff_id query parameter is required".into()))?;
        Ok(StaffId::parse(raw)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct FeaturedRequest {
    pub featured: bool,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/reviews/top-two?staff_id=
pub async fn top_reviews(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StaffParams>,
) -> ApiResult<Json<Vec<Review>>> {
    let staff_id = params.staff_id()?;
    let reviews = state.selector.select_top_reviews(&staff_id).await?;
    Ok(Json(reviews))
}

/// GET /api/reviews?staff_id=
pub async fn list_reviews(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StaffParams>,
) -> ApiResult<Json<Vec<Review>>> {
    let staff_id = params.staff_id()?;
    let reviews = state.db.reviews().find_by_staff(&staff_id).await?;
    Ok(Json(reviews))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Review>> {
    Ok(Json(state.db.reviews().find_by_id(&id).await?))
}

pub async fn create_review(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    let review = state.db.reviews().insert(&request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn set_featured(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<FeaturedRequest>,
) -> ApiResult<Json<Review>> {
    let repo = state.db.reviews();
    repo.set_featured(&id, request.featured).await?;
    Ok(Json(repo.find_by_id(&id).await?))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.reviews().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
