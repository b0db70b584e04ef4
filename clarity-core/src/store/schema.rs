// Creates the schema on startup. Every statement is idempotent.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            full_name TEXT NOT NULL,
            native_language TEXT,
            target_accent TEXT,
            cefr_level TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "speech_analyses",
        r#"
        CREATE TABLE IF NOT EXISTS speech_analyses (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            transcription TEXT NOT NULL,
            detected_accent TEXT NOT NULL,
            confidence_score DOUBLE PRECISION NOT NULL,
            pronunciation_score DOUBLE PRECISION NOT NULL,
            fluency_score DOUBLE PRECISION NOT NULL,
            audio_duration DOUBLE PRECISION NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "idx_speech_analyses_user",
        "CREATE INDEX IF NOT EXISTS idx_speech_analyses_user ON speech_analyses(user_id)",
    ),
];

/// Bring the database up to the current schema.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for (name, statement) in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create {name}"))?;
    }
    info!(objects = SCHEMA.len(), "Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_idempotent() {
        for (name, statement) in SCHEMA {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "{name} would fail on a second startup"
            );
        }
    }

    #[test]
    fn users_are_created_before_analyses() {
        let position = |table: &str| SCHEMA.iter().position(|(name, _)| *name == table);
        assert!(position("users") < position("speech_analyses"));
    }
}
