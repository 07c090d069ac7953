//! SQLite database connection management for linkvault.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use super::migrations;

/// How long a statement waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Core database wrapper providing SQLite connection management.
///
/// The `Database` owns a `rusqlite::Connection`. It is opened once at process
/// start, handed to the [`App`](crate::app::App) and closed when dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.run_migrations()?;
        tracing::debug!(path = %path.as_ref().display(), "database opened");
        Ok(db)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Useful for testing. The database is discarded when the `Database` is dropped.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> Result<(), rusqlite::Error> {
        migrations::run_all(&self.conn)
    }

    /// Round-trips a trivial query to prove the connection is usable.
    pub fn ping(&self) -> Result<(), rusqlite::Error> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    ///
    /// Store managers borrow it for the duration of one operation.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
