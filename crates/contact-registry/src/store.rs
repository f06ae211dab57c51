//! SQLite-backed contact store.

use crate::error::RegistryError;
use crate::types::{ContactEntry, ContactSummary, SENTINEL_IMAGE};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Durable code -> contact mapping with coupled image-file lifecycle.
///
/// One pooled connection is opened at startup and shared by every
/// operation; each call is an independent unit of work. Cheap to clone.
#[derive(Clone)]
pub struct ContactRegistry {
    pool: Pool<Sqlite>,
}

impl ContactRegistry {
    /// Open (or create) the registry database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        Self::connect(opts).await
    }

    /// Open a registry backed by an in-memory database. Used in tests.
    pub async fn in_memory() -> Result<Self, RegistryError> {
        Self::connect(SqliteConnectOptions::from_str("sqlite::memory:")?).await
    }

    async fn connect(opts: SqliteConnectOptions) -> Result<Self, RegistryError> {
        // SQLite permits limited write concurrency; a single long-lived
        // connection avoids "database is locked" failures under interleaved
        // handlers, and keeps in-memory databases alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        let registry = Self { pool };
        registry.migrate().await?;
        Ok(registry)
    }

    async fn migrate(&self) -> Result<(), RegistryError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                contact_reference TEXT NOT NULL,
                origin_channel_id INTEGER NOT NULL,
                image_path TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        info!("contact registry ready");
        Ok(())
    }

    /// Register a new entry. Fails if the code is already taken.
    ///
    /// Code format is the caller's responsibility; the registry stores the
    /// key exactly as given.
    pub async fn add_entry(
        &self,
        code: &str,
        contact_reference: &str,
        origin_channel_id: i64,
    ) -> Result<(), RegistryError> {
        let result = sqlx::query(
            "INSERT INTO contacts (code, contact_reference, origin_channel_id)
             VALUES (?, ?, ?)",
        )
        .bind(code)
        .bind(contact_reference)
        .bind(origin_channel_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!(code, "entry added");
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RegistryError::DuplicateCode(code.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up the stored entry for a code. Pure read, no side effects.
    pub async fn lookup(&self, code: &str) -> Result<Option<ContactEntry>, RegistryError> {
        let entry = sqlx::query_as::<_, ContactEntry>(
            "SELECT code, contact_reference, origin_channel_id, image_path
             FROM contacts WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Attach (or replace) the image path for an existing code.
    pub async fn set_image_path(&self, code: &str, path: &str) -> Result<(), RegistryError> {
        let result = sqlx::query("UPDATE contacts SET image_path = ? WHERE code = ?")
            .bind(path)
            .bind(code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound(code.to_string()));
        }
        debug!(code, path, "image path updated");
        Ok(())
    }

    /// Stored image path for a code, if any.
    pub async fn image_path(&self, code: &str) -> Result<Option<String>, RegistryError> {
        let row: Option<Option<String>> =
            sqlx::query_scalar("SELECT image_path FROM contacts WHERE code = ?")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.flatten())
    }

    /// Delete an entry and its image file (sentinel excepted).
    ///
    /// The file goes first, then the row; the two deletions are not
    /// transactional with each other. An unknown code is reported as
    /// [`RegistryError::NotFound`] with no side effects.
    pub async fn remove_entry(&self, code: &str) -> Result<(), RegistryError> {
        if let Some(path) = self.image_path(code).await? {
            delete_image(&path).await;
        }

        let result = sqlx::query("DELETE FROM contacts WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RegistryError::NotFound(code.to_string()));
        }
        info!(code, "entry removed");
        Ok(())
    }

    /// Delete every entry, removing each non-sentinel image first.
    ///
    /// Image removal is best-effort per entry; one failure does not abort
    /// the rest, and the rows are cleared with a single bulk delete.
    pub async fn clear_all(&self) -> Result<(), RegistryError> {
        let paths: Vec<Option<String>> = sqlx::query_scalar("SELECT image_path FROM contacts")
            .fetch_all(&self.pool)
            .await?;

        for path in paths.into_iter().flatten() {
            delete_image(&path).await;
        }

        sqlx::query("DELETE FROM contacts")
            .execute(&self.pool)
            .await?;

        info!("registry cleared");
        Ok(())
    }

    /// Snapshot of every entry, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<ContactSummary>, RegistryError> {
        let rows = sqlx::query_as::<_, ContactSummary>(
            "SELECT code, contact_reference, origin_channel_id
             FROM contacts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Best-effort image removal; the sentinel placeholder is never touched.
async fn delete_image(path: &str) {
    if Path::new(path)
        .file_name()
        .is_some_and(|name| name == SENTINEL_IMAGE)
    {
        return;
    }
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path, "image deleted"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path, "image already missing");
        }
        Err(e) => warn!(path, error = %e, "failed to delete image"),
    }
}
