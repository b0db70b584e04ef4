//! Relational persistence for accounts and speech analyses.
//!
//! Every data-access path goes through the [`Store`] trait. The server holds
//! one `Arc<dyn Store>` and passes it to whatever needs the datastore; there
//! is no module-level pool.

pub mod models;
pub mod postgres;
pub mod schema;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub use models::{NewSpeechAnalysis, NewUser, SpeechAnalysis, User, UserRecord};
pub use postgres::{DatabaseConfig, PgStore};

/// Errors surfaced by the datastore.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Data-access operations used by the HTTP layer.
///
/// Implementors must be `Send + Sync` so they can be shared across requests
/// as `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a user. Fails with [`StoreError::DuplicateEmail`] when the email
    /// is taken; no row is written in that case.
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn insert_analysis(
        &self,
        analysis: NewSpeechAnalysis,
    ) -> Result<SpeechAnalysis, StoreError>;

    async fn count_analyses(&self, user_id: Uuid) -> Result<i64, StoreError>;

    /// Mean of `pronunciation_score` (0-1 scale), `None` when the user has no rows.
    async fn average_pronunciation_score(&self, user_id: Uuid) -> Result<Option<f64>, StoreError>;

    /// Round-trip to the datastore and return its clock.
    async fn health_check(&self) -> Result<DateTime<Utc>, StoreError>;
}
