//! Owner identity extraction.
//!
//! Sessions are verified upstream. The auth proxy forwards the verified
//! owner id in a trusted header whose name comes from `auth.owner_header`.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::ApiError;
use crate::app::App;

/// Extractor that requires an owner identity.
///
/// Rejects with 401 `AUTH_REQUIRED` when the header is absent or blank.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Owner(owner_id): Owner) -> String {
///     format!("hello {owner_id}")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl FromRequestParts<Arc<App>> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &Arc<App>) -> Result<Self, Self::Rejection> {
        let header = app.settings().auth.owner_header.as_str();
        let owner = parts
            .headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                tracing::debug!(method = %parts.method, path = %parts.uri.path(), "request without owner identity");
                ApiError::Unauthorized
            })?;

        Ok(Self(owner.to_string()))
    }
}
