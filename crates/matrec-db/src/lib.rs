//! # matrec-db
//!
//! libSQL access for matrec reconciliation runs.
//!
//! The auditor only reads: one call to [`MatDb::load_snapshot`] pulls every
//! table the engine needs in a fixed number of round trips. Remote Turso
//! databases get the transient-fault retry policy; local files and
//! `:memory:` databases never retry.
//!
//! Uses the `libsql` crate (v0.9.29), which serves both hosted Turso
//! databases and plain `SQLite` files through one API.

pub mod error;
pub mod helpers;
pub mod retry;
pub mod snapshot;

use error::DatabaseError;
use libsql::Builder;
use matrec_config::TursoConfig;
use matrec_core::retry::{RetryPolicy, retry_transient};

pub use snapshot::Snapshot;

/// Read-only database handle for one reconciliation run.
pub struct MatDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    retry: RetryPolicy,
    remote: bool,
}

impl MatDb {
    /// Open a local database file (or `":memory:"`). Never retries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        Ok(Self {
            db,
            conn,
            retry: RetryPolicy::none(),
            remote: false,
        })
    }

    /// Open a hosted Turso database over the network.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn open_remote(
        url: &str,
        auth_token: &str,
        retry: RetryPolicy,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        Ok(Self {
            db,
            conn,
            retry,
            remote: true,
        })
    }

    /// Open whichever database the configuration names. A local path wins
    /// over a remote URL.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if neither is configured, or the
    /// underlying open error.
    pub async fn open(config: &TursoConfig, retry: RetryPolicy) -> Result<Self, DatabaseError> {
        if config.has_local_path() {
            tracing::debug!(path = %config.local_path, "opening local database");
            return Self::open_local(&config.local_path).await;
        }
        if config.is_remote_configured() {
            tracing::debug!(url = %config.url, "opening remote database");
            return Self::open_remote(&config.url, &config.auth_token, retry).await;
        }
        Err(DatabaseError::InvalidState(
            "no database configured: set turso.local_path or turso.url + turso.auth_token".into(),
        ))
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Returns whether this handle talks to a hosted database.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Run a parameterless query and map every row with `map`.
    ///
    /// Each row is mapped while the cursor still points at it; a local
    /// `Row` reads from the live statement and is unreadable once the
    /// cursor advances. Rows are drained inside the retried operation so a
    /// transient fault while streaming restarts the whole query instead of
    /// returning a truncated result.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once the retry budget is spent or on
    /// the first non-transient failure, or the first error `map` returns.
    pub async fn query_map<T, F>(&self, sql: &str, map: F) -> Result<Vec<T>, DatabaseError>
    where
        F: Fn(&libsql::Row) -> Result<T, DatabaseError>,
    {
        let conn = &self.conn;
        let map = &map;
        retry_transient(&self.retry, is_transient, move || async move {
            let mut rows = conn.query(sql, ()).await?;
            let mut out = Vec::new();
            while let Some(row) = rows.next().await? {
                out.push(map(&row)?);
            }
            Ok::<_, DatabaseError>(out)
        })
        .await
    }
}

fn is_transient(error: &DatabaseError) -> bool {
    matches!(error, DatabaseError::LibSql(inner) if retry::is_transient_error(inner))
}
