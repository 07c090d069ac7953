use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delimiter used for the single-column tag encoding.
pub const TAG_DELIMITER: char = ',';

/// Title stored when neither the caller nor the page supplied one.
pub const UNTITLED: &str = "Untitled";

/// Represents a saved bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub favicon: Option<String>,
    pub image: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    /// Display domain of the bookmark's URL, `www.` stripped.
    pub fn domain(&self) -> String {
        crate::services::url_normalizer::domain(&self.url)
    }
}

/// Fields accepted when creating a bookmark.
///
/// `description`, `favicon` and `image` are never caller-supplied; the creation
/// workflow fills them from page metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub favicon: Option<String>,
    pub image: Option<String>,
}

impl NewBookmark {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.title.is_none() && self.notes.is_none() && self.tags.is_none()
    }
}

/// Column a bookmark listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    /// SQL column backing this sort key. Only ever one of a fixed set.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Listing parameters, already validated by the request layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort: SortField,
    pub order: SortDirection,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
            sort: SortField::default(),
            order: SortDirection::default(),
        }
    }
}

impl ListOptions {
    /// Row offset of the first item on the requested page.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page.max(1)) - 1) * i64::from(self.limit)
    }
}

/// One page of bookmarks plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkPage {
    pub items: Vec<Bookmark>,
    pub total: i64,
}

/// Page-count summary returned alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i = i64::from(limit.max(1));
        let total_pages = (total.max(0) + limit_i - 1) / limit_i;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: i64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Encodes tags into the single-column representation.
///
/// Tags are trimmed and blanks dropped. `None` when no tag survives.
pub fn encode_tags(tags: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(&TAG_DELIMITER.to_string()))
    }
}

/// Decodes the stored tag column back into a list.
pub fn decode_tags(stored: Option<&str>) -> Vec<String> {
    stored
        .map(|s| {
            s.split(TAG_DELIMITER)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
