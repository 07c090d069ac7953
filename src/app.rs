//! App Core for linkvault.
//!
//! Central struct holding the database handle and the shared services. One
//! `App` is built at startup and shared with every request as `Arc<App>`.

use std::sync::Mutex;

use crate::database::connection::Database;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::services::metadata_extractor::MetadataExtractor;
use crate::services::rate_limiter::RateLimiter;
use crate::types::bookmark::{Bookmark, BookmarkPage, BookmarkPatch, ListOptions, NewBookmark, UNTITLED};
use crate::types::errors::BookmarkError;
use crate::types::requests::{CreateBookmark, MAX_TITLE_CHARS};
use crate::types::settings::ServerSettings;

/// Central application struct holding the store and services.
///
/// `BookmarkManager` is created on demand inside [`App::with_store`] because it
/// borrows the connection with a lifetime.
pub struct App {
    db: Mutex<Database>,
    extractor: MetadataExtractor,
    rate_limiter: RateLimiter,
    settings: ServerSettings,
}

impl App {
    /// Opens the configured database and builds the services around it.
    pub fn new(settings: ServerSettings) -> Result<Self, rusqlite::Error> {
        let db = Database::open(&settings.database.path)?;
        Ok(Self::with_database(settings, db))
    }

    /// Builds the app around an already opened database.
    pub fn with_database(settings: ServerSettings, db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            extractor: MetadataExtractor::new(&settings.metadata),
            rate_limiter: RateLimiter::new(&settings.rate_limit),
            settings,
        }
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Runs `f` against the bookmark store while holding the database lock.
    ///
    /// Never call this across an `.await`; the guard is released when `f` returns.
    pub fn with_store<T, F>(&self, f: F) -> Result<T, BookmarkError>
    where
        F: FnOnce(&mut BookmarkManager<'_>) -> Result<T, BookmarkError>,
    {
        let db = self
            .db
            .lock()
            .map_err(|e| BookmarkError::StoreUnavailable(e.to_string()))?;
        let mut manager = BookmarkManager::new(db.connection());
        f(&mut manager)
    }

    /// Confirms the database answers a trivial query.
    pub fn ping_database(&self) -> Result<(), BookmarkError> {
        let db = self
            .db
            .lock()
            .map_err(|e| BookmarkError::StoreUnavailable(e.to_string()))?;
        db.ping()?;
        Ok(())
    }

    pub fn list_bookmarks(&self, owner_id: &str, options: &ListOptions) -> Result<BookmarkPage, BookmarkError> {
        self.with_store(|store| store.list_bookmarks(owner_id, options))
    }

    pub fn get_bookmark(&self, id: &str, owner_id: &str) -> Result<Option<Bookmark>, BookmarkError> {
        self.with_store(|store| store.get_bookmark(id, owner_id))
    }

    pub fn update_bookmark(&self, id: &str, owner_id: &str, patch: BookmarkPatch) -> Result<Option<Bookmark>, BookmarkError> {
        self.with_store(|store| store.update_bookmark(id, owner_id, patch))
    }

    pub fn delete_bookmark(&self, id: &str, owner_id: &str) -> Result<bool, BookmarkError> {
        self.with_store(|store| store.delete_bookmark(id, owner_id))
    }

    /// Creation workflow: duplicate check, metadata enrichment, insert.
    ///
    /// The pre-check answers the common case without a network fetch. The
    /// unique index still decides the outcome when two creations race.
    pub async fn create_bookmark(&self, owner_id: &str, request: CreateBookmark) -> Result<Bookmark, BookmarkError> {
        if let Some(existing) = self.with_store(|store| store.find_existing(owner_id, &request.url))? {
            tracing::info!(owner = owner_id, existing_id = %existing.id, "duplicate bookmark rejected");
            return Err(BookmarkError::DuplicateUrl {
                url: existing.url,
                existing_id: existing.id,
            });
        }

        let metadata = self.extractor.extract(&request.url).await.unwrap_or_default();

        let title = request
            .title
            .or_else(|| metadata.title.as_deref().and_then(clamp_title))
            .unwrap_or_else(|| UNTITLED.to_string());

        let new = NewBookmark {
            url: request.url,
            title,
            notes: request.notes,
            tags: request.tags,
            description: metadata.description,
            favicon: metadata.favicon,
            image: metadata.image,
        };

        let bookmark = self.with_store(|store| store.create_bookmark(owner_id, new))?;
        tracing::info!(owner = owner_id, id = %bookmark.id, "bookmark saved");
        Ok(bookmark)
    }
}

/// Trims a scraped title and cuts it to the stored maximum.
fn clamp_title(raw: &str) -> Option<String> {
    let clamped: String = raw.trim().chars().take(MAX_TITLE_CHARS).collect();
    let clamped = clamped.trim_end();
    if clamped.is_empty() {
        None
    } else {
        Some(clamped.to_string())
    }
}
