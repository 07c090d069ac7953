//! Bookmark request handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use super::auth::Owner;
use super::error::ApiError;
use crate::app::App;
use crate::services::rate_limiter::RateLimiterTrait;
use crate::types::bookmark::Pagination;
use crate::types::errors::{BookmarkError, ValidationError};
use crate::types::requests::{parse_bookmark_id, CreateBookmarkBody, ListQuery, UpdateBookmarkBody};

/// Version reported in listing metadata.
pub const API_VERSION: &str = "1.0.0";

/// Converts a store error, logging faults with the operation context.
/// Conflicts pass through quietly.
fn store_error<'a>(
    operation: &'static str,
    owner: &'a str,
    target: Option<&'a str>,
) -> impl FnOnce(BookmarkError) -> ApiError + 'a {
    move |err| {
        if !err.is_conflict() {
            tracing::error!(operation, owner, bookmark_id = target, error = %err, "bookmark store failure");
        }
        ApiError::from(err)
    }
}

fn bookmark_id(raw: &str) -> Result<String, ApiError> {
    parse_bookmark_id(raw).map_err(|_| ApiError::InvalidId)
}

/// `GET /bookmarks`
pub async fn list_bookmarks(
    Owner(owner): Owner,
    State(app): State<Arc<App>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query
        .map_err(|e| ApiError::InvalidParams(ValidationError::single("query", e.body_text())))?;
    let options = query.validate().map_err(ApiError::InvalidParams)?;

    let page = app
        .list_bookmarks(&owner, &options)
        .map_err(store_error("list", &owner, None))?;
    let pagination = Pagination::new(options.page, options.limit, page.total);

    Ok(Json(json!({
        "success": true,
        "data": page.items,
        "pagination": pagination,
        "meta": {
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "version": API_VERSION,
        },
    })))
}

/// `POST /bookmarks`
pub async fn create_bookmark(
    Owner(owner): Owner,
    State(app): State<Arc<App>>,
    body: Result<Json<CreateBookmarkBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !app.rate_limiter().admit(&owner) {
        tracing::info!(owner = %owner, "bookmark creation rate limited");
        return Err(ApiError::RateLimited);
    }

    let Json(body) = body?;
    let request = body.validate().map_err(ApiError::Validation)?;

    let bookmark = app
        .create_bookmark(&owner, request)
        .await
        .map_err(store_error("create", &owner, None))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": bookmark,
            "message": "Bookmark created successfully",
        })),
    ))
}

/// `GET /bookmarks/{id}`
pub async fn get_bookmark(
    Owner(owner): Owner,
    State(app): State<Arc<App>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = bookmark_id(&raw_id)?;
    let bookmark = app
        .get_bookmark(&id, &owner)
        .map_err(store_error("get", &owner, Some(id.as_str())))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({ "success": true, "data": bookmark })))
}

/// `PUT /bookmarks/{id}`
pub async fn update_bookmark(
    Owner(owner): Owner,
    State(app): State<Arc<App>>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateBookmarkBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = bookmark_id(&raw_id)?;
    let Json(body) = body?;
    let patch = body.validate().map_err(ApiError::Validation)?;

    let bookmark = app
        .update_bookmark(&id, &owner, patch)
        .map_err(store_error("update", &owner, Some(id.as_str())))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(json!({
        "success": true,
        "data": bookmark,
        "message": "Bookmark updated successfully",
    })))
}

/// `DELETE /bookmarks/{id}`
pub async fn delete_bookmark(
    Owner(owner): Owner,
    State(app): State<Arc<App>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = bookmark_id(&raw_id)?;
    let removed = app
        .delete_bookmark(&id, &owner)
        .map_err(store_error("delete", &owner, Some(id.as_str())))?;
    if !removed {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({
        "success": true,
        "message": "Bookmark deleted successfully",
    })))
}
