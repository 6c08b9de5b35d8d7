use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/reviews/top-two", get(handlers::top_reviews))
        .route(
            "/api/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .route(
            "/api/reviews/{id}",
            get(handlers::get_review).delete(handlers::delete_review),
        )
        .route("/api/reviews/{id}/featured", put(handlers::set_featured))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}
