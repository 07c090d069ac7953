//! Wire-level request shapes and their validation.
//!
//! Everything here runs before a request reaches the bookmark store, so the
//! store can assume field bounds already hold.

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use super::bookmark::{BookmarkPatch, ListOptions, SortDirection, SortField, TAG_DELIMITER};
use super::errors::{FieldError, ValidationError};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_NOTES_CHARS: usize = 1000;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_CHARS: usize = 50;
pub const MAX_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Body of `POST /bookmarks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookmarkBody {
    pub url: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A validated creation request. `title` may still be absent; the creation
/// workflow fills it from page metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBookmark {
    pub url: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl CreateBookmarkBody {
    pub fn validate(self) -> Result<CreateBookmark, ValidationError> {
        let mut errors = Vec::new();

        check_url(&self.url, &mut errors);
        let title = self.title.as_deref().and_then(|t| check_title(t, &mut errors));
        if let Some(notes) = &self.notes {
            check_notes(notes, &mut errors);
        }
        let tags = self
            .tags
            .as_deref()
            .map(|t| check_tags(t, &mut errors))
            .unwrap_or_default();

        if !errors.is_empty() {
            return Err(ValidationError(errors));
        }
        Ok(CreateBookmark {
            url: self.url.trim().to_string(),
            title,
            notes: self.notes,
            tags,
        })
    }
}

/// Body of `PUT /bookmarks/{id}`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookmarkBody {
    pub url: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateBookmarkBody {
    pub fn validate(self) -> Result<BookmarkPatch, ValidationError> {
        let mut errors = Vec::new();

        if let Some(url) = &self.url {
            check_url(url, &mut errors);
        }
        let title = match self.title.as_deref() {
            Some(t) => check_title(t, &mut errors),
            None => None,
        };
        if let Some(notes) = &self.notes {
            check_notes(notes, &mut errors);
        }
        let tags = self.tags.as_deref().map(|t| check_tags(t, &mut errors));

        let patch = BookmarkPatch {
            url: self.url.map(|u| u.trim().to_string()),
            title,
            notes: self.notes,
            tags,
        };
        if errors.is_empty() && patch.is_empty() {
            errors.push(field_error(
                "body",
                "At least one field must be provided for update",
            ));
        }

        if !errors.is_empty() {
            return Err(ValidationError(errors));
        }
        Ok(patch)
    }
}

/// Raw query string of `GET /bookmarks`; every value arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListQuery {
    pub fn validate(self) -> Result<ListOptions, ValidationError> {
        let mut errors = Vec::new();

        let page = match self.page.as_deref() {
            None => 1,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(p) if p >= 1 => p,
                _ => {
                    errors.push(field_error("page", "Must be a positive integer"));
                    1
                }
            },
        };
        let limit = match self.limit.as_deref() {
            None => DEFAULT_PAGE_LIMIT,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(l) if (1..=MAX_PAGE_LIMIT).contains(&l) => l,
                _ => {
                    errors.push(field_error(
                        "limit",
                        format!("Must be an integer between 1 and {MAX_PAGE_LIMIT}"),
                    ));
                    DEFAULT_PAGE_LIMIT
                }
            },
        };
        let sort = match self.sort.as_deref() {
            None => SortField::default(),
            Some(raw) => SortField::parse(raw).unwrap_or_else(|| {
                errors.push(field_error(
                    "sort",
                    "Must be one of createdAt, updatedAt, title",
                ));
                SortField::default()
            }),
        };
        let order = match self.order.as_deref() {
            None => SortDirection::default(),
            Some(raw) => SortDirection::parse(raw).unwrap_or_else(|| {
                errors.push(field_error("order", "Must be asc or desc"));
                SortDirection::default()
            }),
        };

        if !errors.is_empty() {
            return Err(ValidationError(errors));
        }
        Ok(ListOptions {
            page,
            limit,
            search: self.search.filter(|s| !s.is_empty()),
            sort,
            order,
        })
    }
}

/// Checks that a path segment is a well-formed bookmark id.
pub fn parse_bookmark_id(raw: &str) -> Result<String, ValidationError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ValidationError::single("id", "Invalid bookmark ID format"))
}

fn field_error(field: &str, message: impl Into<String>) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: message.into(),
    }
}

fn check_url(raw: &str, errors: &mut Vec<FieldError>) {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
        Ok(_) => errors.push(field_error("url", "URL must use http or https")),
        Err(_) => errors.push(field_error("url", "Invalid URL format")),
    }
}

fn check_title(raw: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let title = raw.trim();
    if title.is_empty() {
        errors.push(field_error("title", "Title is required"));
        return None;
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        errors.push(field_error(
            "title",
            format!("Title must be at most {MAX_TITLE_CHARS} characters"),
        ));
        return None;
    }
    Some(title.to_string())
}

fn check_notes(notes: &str, errors: &mut Vec<FieldError>) {
    if notes.chars().count() > MAX_NOTES_CHARS {
        errors.push(field_error(
            "notes",
            format!("Notes must be at most {MAX_NOTES_CHARS} characters"),
        ));
    }
}

fn check_tags(tags: &[String], errors: &mut Vec<FieldError>) -> Vec<String> {
    if tags.len() > MAX_TAGS {
        errors.push(field_error(
            "tags",
            format!("At most {MAX_TAGS} tags are allowed"),
        ));
        return Vec::new();
    }
    let mut cleaned = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            errors.push(field_error("tags", "Tags must not be blank"));
        } else if tag.contains(TAG_DELIMITER) {
            errors.push(field_error("tags", "Tags must not contain commas"));
        } else if tag.chars().count() > MAX_TAG_CHARS {
            errors.push(field_error(
                "tags",
                format!("Tags must be at most {MAX_TAG_CHARS} characters"),
            ));
        } else {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}
