//! Schema migrations for the linkvault SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Migrations are versioned. Each runs exactly once and is recorded in
/// the `schema_version` table. Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: bookmarks")?;
    }

    if current < 2 {
        migration_v2(conn)?;
        record_version(conn, 2, "Unique normalized URL per owner")?;
    }

    if current < CURRENT_SCHEMA_VERSION {
        tracing::info!(from = current, to = CURRENT_SCHEMA_VERSION, "schema migrated");
    }
    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: bookmarks table with the owner/created-at listing index.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bookmarks (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            url TEXT NOT NULL,
            title TEXT NOT NULL,
            notes TEXT,
            tags TEXT,
            description TEXT,
            favicon TEXT,
            image TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_owner_created ON bookmarks(owner_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_bookmarks_owner_updated ON bookmarks(owner_id, updated_at);
        ",
    )
}

/// V2: one live bookmark per owner and normalized URL.
///
/// Rows that already collide are collapsed onto the oldest one first, so the
/// index can be created on databases written before the constraint existed.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    let removed = conn.execute(
        "DELETE FROM bookmarks WHERE rowid NOT IN (
             SELECT MIN(rowid) FROM bookmarks GROUP BY owner_id, url
         )",
        [],
    )?;
    if removed > 0 {
        tracing::warn!(removed, "dropped duplicate bookmarks before adding unique index");
    }
    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookmarks_owner_url ON bookmarks(owner_id, url);",
    )
}
