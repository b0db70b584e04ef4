use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use super::models::{NewSpeechAnalysis, NewUser, SpeechAnalysis, User, UserRecord};
use super::{Store, StoreError};

const USER_COLUMNS: &str =
    "id, email, full_name, native_language, target_accent, cefr_level, created_at";

/// Connection settings for the Postgres pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/clarity_coach_dev".to_string(),
            max_connections: 20,
            acquire_timeout: Duration::from_millis(2000),
            idle_timeout: Duration::from_millis(30_000),
        }
    }
}

/// [`Store`] backed by a bounded Postgres connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build the pool without opening a connection. The first query connects,
    /// so the server can start while the database is still down.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_lazy(&config.url)?;
        info!(
            max_connections = config.max_connections,
            "Postgres pool configured"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_insert_error(err: sqlx::Error, email: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, full_name, native_language) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.full_name)
            .bind(&new_user.native_language)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| map_insert_error(err, &new_user.email))
    }

    async fn insert_analysis(
        &self,
        analysis: NewSpeechAnalysis,
    ) -> Result<SpeechAnalysis, StoreError> {
        let row = sqlx::query_as::<_, SpeechAnalysis>(
            r#"
            INSERT INTO speech_analyses (
                id, user_id, transcription, detected_accent, confidence_score,
                pronunciation_score, fluency_score, audio_duration
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, transcription, detected_accent, confidence_score,
                      pronunciation_score, fluency_score, audio_duration, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(analysis.user_id)
        .bind(&analysis.transcription)
        .bind(&analysis.detected_accent)
        .bind(analysis.confidence_score)
        .bind(analysis.pronunciation_score)
        .bind(analysis.fluency_score)
        .bind(analysis.audio_duration)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count_analyses(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM speech_analyses WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn average_pronunciation_score(&self, user_id: Uuid) -> Result<Option<f64>, StoreError> {
        let average = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(pronunciation_score) FROM speech_analyses WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(average)
    }

    async fn health_check(&self) -> Result<DateTime<Utc>, StoreError> {
        let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}
