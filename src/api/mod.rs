//! HTTP surface for linkvault.
//!
//! # Routes
//!
//! - `GET    /bookmarks`       list, search and paginate
//! - `POST   /bookmarks`       create (rate limited per owner)
//! - `GET    /bookmarks/{id}`  fetch one
//! - `PUT    /bookmarks/{id}`  partial update
//! - `DELETE /bookmarks/{id}`  delete
//! - `GET    /health`          readiness, no auth
//!
//! # Middleware
//!
//! 1. `TraceLayer` on every request
//! 2. Security headers on `/bookmarks*` responses

pub mod auth;
pub mod bookmarks;
pub mod error;
pub mod health;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::app::App;

pub use error::ApiError;

/// Builds the application router around shared state.
pub fn router(app: Arc<App>) -> Router {
    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ));

    let bookmarks = Router::new()
        .route(
            "/bookmarks",
            get(bookmarks::list_bookmarks).post(bookmarks::create_bookmark),
        )
        .route(
            "/bookmarks/{id}",
            get(bookmarks::get_bookmark)
                .put(bookmarks::update_bookmark)
                .delete(bookmarks::delete_bookmark),
        )
        .layer(security_headers);

    Router::new()
        .route("/health", get(health::health))
        .merge(bookmarks)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
