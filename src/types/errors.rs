use thiserror::Error;

// === BookmarkError ===

/// Errors related to bookmark store operations.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The owner already has a bookmark with this normalized URL.
    #[error("Duplicate bookmark URL: {url} (existing bookmark {existing_id})")]
    DuplicateUrl { url: String, existing_id: String },
    /// The shared database handle was poisoned by a panicking holder.
    #[error("Bookmark store unavailable: {0}")]
    StoreUnavailable(String),
    /// Database operation failed.
    #[error("Bookmark database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

impl BookmarkError {
    /// True for conflicts the caller can act on, false for server faults.
    pub fn is_conflict(&self) -> bool {
        matches!(self, BookmarkError::DuplicateUrl { .. })
    }
}

// === ExtractError ===

/// Reasons a metadata extraction produced nothing.
///
/// Never surfaced to bookmark callers; the extractor logs it and yields `None`.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Extraction is switched off in configuration.
    #[error("Metadata extraction disabled")]
    Disabled,
    /// The target is not an absolute http(s) URL.
    #[error("Invalid extraction target: {0}")]
    InvalidUrl(String),
    /// The fetch did not complete within the configured bound.
    #[error("Metadata fetch timed out after {0} ms")]
    Timeout(u64),
    /// The server answered with a non-success status.
    #[error("Metadata fetch returned HTTP {0}")]
    Status(u16),
    /// The response body is not an HTML document.
    #[error("Unsupported content type: {0}")]
    NotHtml(String),
    /// Network or protocol failure.
    #[error("Metadata fetch failed: {0}")]
    Request(#[from] reqwest::Error),
}

// === ValidationError ===

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Request validation failure, with every offending field listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid request: {}", summarize(.0))]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
