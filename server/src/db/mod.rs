//! Persistence for venues, artists and shows.
//!
//! Every mutation runs inside its own transaction. Returning early with `?`
//! drops the transaction, which rolls it back and hands the connection back
//! to the pool.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use uuid::Uuid;

pub mod artists;
pub mod shows;
pub mod venues;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Venue => "Venue",
            EntityKind::Artist => "Artist",
            EntityKind::Show => "Show",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} with id '{id}' was not found")]
    NotFound { entity: EntityKind, id: Uuid },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("transaction failed: {0}")]
    Transaction(sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        StoreError::NotFound { entity, id }
    }
}

/// Driver messages name tables and constraints, so they are logged and
/// replaced with these before reaching a caller.
const REJECTED_BY_STORE: &str = "The submitted data was rejected by the database.";
const DUPLICATE_RECORD: &str = "A record with the same values already exists.";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::CheckViolation => {
                    tracing::warn!(reason = %db_err.message(), "Constraint violation");
                    return StoreError::Validation(REJECTED_BY_STORE.to_string());
                }
                ErrorKind::UniqueViolation => {
                    tracing::warn!(reason = %db_err.message(), "Unique violation");
                    return StoreError::Conflict(DUPLICATE_RECORD.to_string());
                }
                _ => {}
            }
        }
        StoreError::Transaction(err)
    }
}

/// Opens the pool. Foreign keys are switched on for every connection.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A single connection keeps the in-memory database alive for the whole test.
    pub async fn memory_pool() -> SqlitePool {
        let pool = connect("sqlite::memory:", 1)
            .await
            .expect("in-memory pool");
        migrate(&pool).await.expect("migrations");
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_create_all_tables() {
        let pool = testing::memory_pool().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('venues', 'artists', 'shows') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["artists", "shows", "venues"]);
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let pool = testing::memory_pool().await;

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_check_violation_hides_driver_text() {
        let pool = testing::memory_pool().await;

        let err = sqlx::query(
            "INSERT INTO artists (id, name, city, state, created_at, updated_at) VALUES (?, '  ', 'Oakland', 'CA', ?, ?)",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(chrono::Utc::now())
        .bind(chrono::Utc::now())
        .execute(&pool)
        .await
        .unwrap_err();

        match StoreError::from(err) {
            StoreError::Validation(reason) => {
                assert_eq!(reason, REJECTED_BY_STORE);
                assert!(!reason.contains("CHECK constraint"));
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_pool_timeout_is_a_transaction_failure() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Transaction(_)));
    }
}
