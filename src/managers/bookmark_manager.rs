//! Bookmark Manager for linkvault.
//!
//! Implements `BookmarkManagerTrait`: owner-scoped CRUD, search and
//! pagination for bookmarks, backed by SQLite via `rusqlite`.
//!
//! Every operation takes the owner id from the caller. A bookmark that exists
//! but belongs to someone else is indistinguishable from one that does not exist.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use uuid::Uuid;

use crate::services::url_normalizer::normalize_url;
use crate::types::bookmark::{
    decode_tags, encode_tags, Bookmark, BookmarkPage, BookmarkPatch, ListOptions, NewBookmark,
};
use crate::types::errors::BookmarkError;

const COLUMNS: &str = "id, url, title, notes, tags, description, favicon, image, owner_id, created_at, updated_at";

/// Trait defining bookmark store operations.
pub trait BookmarkManagerTrait {
    /// One page of the owner's bookmarks plus the total match count.
    fn list_bookmarks(&self, owner_id: &str, options: &ListOptions) -> Result<BookmarkPage, BookmarkError>;
    fn get_bookmark(&self, id: &str, owner_id: &str) -> Result<Option<Bookmark>, BookmarkError>;
    fn create_bookmark(&mut self, owner_id: &str, new: NewBookmark) -> Result<Bookmark, BookmarkError>;
    /// Looks up the owner's bookmark for `url` after normalization.
    fn find_existing(&self, owner_id: &str, url: &str) -> Result<Option<Bookmark>, BookmarkError>;
    fn update_bookmark(&mut self, id: &str, owner_id: &str, patch: BookmarkPatch) -> Result<Option<Bookmark>, BookmarkError>;
    /// Returns whether a row was removed. Deleting twice is not an error.
    fn delete_bookmark(&mut self, id: &str, owner_id: &str) -> Result<bool, BookmarkError>;
}

/// Bookmark manager backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Current time at the stored precision.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        let tags: Option<String> = row.get(4)?;
        Ok(Bookmark {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            notes: row.get(3)?,
            tags: decode_tags(tags.as_deref()),
            description: row.get(5)?,
            favicon: row.get(6)?,
            image: row.get(7)?,
            owner_id: row.get(8)?,
            created_at: millis_to_time(9, row.get(9)?)?,
            updated_at: millis_to_time(10, row.get(10)?)?,
        })
    }

    /// Maps a unique-index violation on `(owner_id, url)` to a conflict naming
    /// the bookmark that already holds the URL.
    fn conflict_or(&self, err: rusqlite::Error, owner_id: &str, url: &str) -> BookmarkError {
        let is_constraint = matches!(
            &err,
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
        );
        if is_constraint {
            if let Ok(Some(existing)) = self.find_existing(owner_id, url) {
                return BookmarkError::DuplicateUrl {
                    url: url.to_string(),
                    existing_id: existing.id,
                };
            }
        }
        BookmarkError::DatabaseError(err)
    }
}

fn millis_to_time(column: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(column, ms))
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    /// Filters by owner and, when `search` is non-empty, by case-sensitive
    /// substring over title, notes and url. Ties on the sort key are broken
    /// by id in the same direction so pages never overlap.
    fn list_bookmarks(&self, owner_id: &str, options: &ListOptions) -> Result<BookmarkPage, BookmarkError> {
        let mut filter = String::from("WHERE owner_id = ?1");
        let mut values = vec![Value::Text(owner_id.to_string())];

        if let Some(term) = options.search.as_deref().filter(|s| !s.is_empty()) {
            filter.push_str(
                " AND (instr(title, ?2) > 0 OR instr(COALESCE(notes, ''), ?2) > 0 OR instr(url, ?2) > 0)",
            );
            values.push(Value::Text(term.to_string()));
        }

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM bookmarks {}", filter),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let direction = options.order.keyword();
        let sql = format!(
            "SELECT {} FROM bookmarks {} ORDER BY {} {}, id {} LIMIT ?{} OFFSET ?{}",
            COLUMNS,
            filter,
            options.sort.column(),
            direction,
            direction,
            values.len() + 1,
            values.len() + 2,
        );
        values.push(Value::Integer(i64::from(options.limit)));
        values.push(Value::Integer(options.offset()));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), Self::row_to_bookmark)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(BookmarkPage { items, total })
    }

    fn get_bookmark(&self, id: &str, owner_id: &str) -> Result<Option<Bookmark>, BookmarkError> {
        let bookmark = self
            .conn
            .query_row(
                &format!("SELECT {} FROM bookmarks WHERE id = ?1 AND owner_id = ?2", COLUMNS),
                params![id, owner_id],
                Self::row_to_bookmark,
            )
            .optional()?;
        Ok(bookmark)
    }

    /// Inserts a bookmark with a fresh id. The URL is stored normalized.
    fn create_bookmark(&mut self, owner_id: &str, new: NewBookmark) -> Result<Bookmark, BookmarkError> {
        let now = Self::now();
        let bookmark = Bookmark {
            id: Uuid::new_v4().to_string(),
            url: normalize_url(&new.url),
            title: new.title,
            notes: new.notes,
            tags: decode_tags(encode_tags(&new.tags).as_deref()),
            description: new.description,
            favicon: new.favicon,
            image: new.image,
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.conn
            .execute(
                &format!(
                    "INSERT INTO bookmarks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    COLUMNS
                ),
                params![
                    bookmark.id,
                    bookmark.url,
                    bookmark.title,
                    bookmark.notes,
                    encode_tags(&bookmark.tags),
                    bookmark.description,
                    bookmark.favicon,
                    bookmark.image,
                    bookmark.owner_id,
                    now.timestamp_millis(),
                    now.timestamp_millis(),
                ],
            )
            .map_err(|e| self.conflict_or(e, owner_id, &bookmark.url))?;

        tracing::debug!(id = %bookmark.id, owner = owner_id, "bookmark created");
        Ok(bookmark)
    }

    fn find_existing(&self, owner_id: &str, url: &str) -> Result<Option<Bookmark>, BookmarkError> {
        let bookmark = self
            .conn
            .query_row(
                &format!("SELECT {} FROM bookmarks WHERE owner_id = ?1 AND url = ?2", COLUMNS),
                params![owner_id, normalize_url(url)],
                Self::row_to_bookmark,
            )
            .optional()?;
        Ok(bookmark)
    }

    /// Applies the provided fields only. Returns `None` without writing when
    /// the bookmark is missing or not owned by `owner_id`.
    fn update_bookmark(&mut self, id: &str, owner_id: &str, patch: BookmarkPatch) -> Result<Option<Bookmark>, BookmarkError> {
        let Some(mut bookmark) = self.get_bookmark(id, owner_id)? else {
            return Ok(None);
        };

        if let Some(url) = patch.url {
            bookmark.url = normalize_url(&url);
        }
        if let Some(title) = patch.title {
            bookmark.title = title;
        }
        if let Some(notes) = patch.notes {
            bookmark.notes = Some(notes);
        }
        if let Some(tags) = patch.tags {
            bookmark.tags = decode_tags(encode_tags(&tags).as_deref());
        }
        // Strictly after the previous value even within one millisecond.
        bookmark.updated_at = Self::now().max(bookmark.updated_at + Duration::milliseconds(1));

        self.conn
            .execute(
                "UPDATE bookmarks SET url = ?1, title = ?2, notes = ?3, tags = ?4, updated_at = ?5 \
                 WHERE id = ?6 AND owner_id = ?7",
                params![
                    bookmark.url,
                    bookmark.title,
                    bookmark.notes,
                    encode_tags(&bookmark.tags),
                    bookmark.updated_at.timestamp_millis(),
                    id,
                    owner_id,
                ],
            )
            .map_err(|e| self.conflict_or(e, owner_id, &bookmark.url))?;

        tracing::debug!(id, owner = owner_id, "bookmark updated");
        Ok(Some(bookmark))
    }

    fn delete_bookmark(&mut self, id: &str, owner_id: &str) -> Result<bool, BookmarkError> {
        let affected = self.conn.execute(
            "DELETE FROM bookmarks WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
        )?;
        if affected > 0 {
            tracing::debug!(id, owner = owner_id, "bookmark deleted");
        }
        Ok(affected > 0)
    }
}
