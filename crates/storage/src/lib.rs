use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection, Row,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{DiagnosisId, DiagnosisRecord},
    error::StoreError,
};

const CREATE_DIAGNOSES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS diagnoses (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        disease     TEXT NOT NULL,
        probability REAL NOT NULL
    )
"#;

/// Persistence for diagnosis records.
///
/// The store trusts its caller: no range or uniqueness checks happen here.
#[async_trait]
pub trait DiagnosisStore: Send + Sync {
    /// Creates the `diagnoses` table if it is absent. Existing rows are kept.
    async fn initialize(&self) -> Result<(), StoreError>;
    /// Inserts one row and returns the id the database assigned to it.
    async fn append(&self, disease: &str, probability: f64) -> Result<DiagnosisId, StoreError>;
    /// Returns every row present at call time, oldest first.
    async fn load_all(&self) -> Result<Vec<DiagnosisRecord>, StoreError>;
}

/// SQLite-backed store. Holds only connect options; every operation opens
/// its own connection and closes it before returning.
///
/// Because nothing is kept open between calls, `sqlite::memory:` yields a
/// fresh empty database per operation. Use a file URL for anything that
/// must persist.
#[derive(Debug, Clone)]
pub struct Storage {
    database_url: String,
    connect_options: SqliteConnectOptions,
}

impl Storage {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(StoreError::connection)?
            .create_if_missing(true);
        Ok(Self {
            database_url: database_url.to_string(),
            connect_options,
        })
    }

    /// Number of rows currently stored.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let mut conn = self.connect().await?;
        let counted: Result<i64, sqlx::Error> =
            sqlx::query_scalar("SELECT COUNT(*) FROM diagnoses")
                .fetch_one(&mut conn)
                .await;
        release(conn).await;
        let count = counted.map_err(StoreError::read)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        SqliteConnection::connect_with(&self.connect_options)
            .await
            .map_err(|err| {
                tracing::warn!(database_url = %self.database_url, "sqlite connect failed: {err}");
                StoreError::connection(err)
            })
    }
}

#[async_trait]
impl DiagnosisStore for Storage {
    async fn initialize(&self) -> Result<(), StoreError> {
        ensure_sqlite_parent_dir_exists(&self.database_url)?;

        let mut conn = self.connect().await?;
        let created = sqlx::query(CREATE_DIAGNOSES_TABLE).execute(&mut conn).await;
        release(conn).await;
        created.map_err(StoreError::write)?;

        tracing::info!(database_url = %self.database_url, "diagnoses table ready");
        Ok(())
    }

    async fn append(&self, disease: &str, probability: f64) -> Result<DiagnosisId, StoreError> {
        let mut conn = self.connect().await?;
        let inserted = sqlx::query(
            "INSERT INTO diagnoses (disease, probability) VALUES (?, ?) RETURNING id",
        )
        .bind(disease)
        .bind(probability)
        .fetch_one(&mut conn)
        .await;
        release(conn).await;

        let row = inserted.map_err(StoreError::write)?;
        let id = row.try_get::<i64, _>(0).map_err(StoreError::write)?;
        Ok(DiagnosisId(id))
    }

    async fn load_all(&self) -> Result<Vec<DiagnosisRecord>, StoreError> {
        let mut conn = self.connect().await?;
        let fetched = sqlx::query("SELECT id, disease, probability FROM diagnoses ORDER BY id")
            .fetch_all(&mut conn)
            .await;
        release(conn).await;

        fetched
            .map_err(StoreError::read)?
            .into_iter()
            .map(|row| -> Result<DiagnosisRecord, StoreError> {
                Ok(DiagnosisRecord {
                    id: DiagnosisId(row.try_get("id").map_err(StoreError::read)?),
                    disease: row.try_get("disease").map_err(StoreError::read)?,
                    probability: row.try_get("probability").map_err(StoreError::read)?,
                })
            })
            .collect()
    }
}

async fn release(conn: SqliteConnection) {
    if let Err(err) = conn.close().await {
        tracing::warn!("failed to close sqlite connection cleanly: {err}");
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<(), StoreError> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).map_err(|err| {
        StoreError::ConnectionFailed(format!(
            "failed to create parent directory '{}' for database url '{database_url}': {err}",
            parent.display()
        ))
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    // Prefix match: memory URLs may carry parameters, e.g. `sqlite::memory:?cache=shared`.
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
