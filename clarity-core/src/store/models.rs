use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub native_language: Option<String>,
    pub target_accent: Option<String>,
    pub cefr_level: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user row together with its stored password hash, used only for
/// credential checks.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub native_language: Option<String>,
}

/// One persisted assessment summary. Scores are on the 0-1 scale.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SpeechAnalysis {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transcription: String,
    pub detected_accent: String,
    pub confidence_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
    pub audio_duration: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSpeechAnalysis {
    pub user_id: Uuid,
    pub transcription: String,
    pub detected_accent: String,
    pub confidence_score: f64,
    pub pronunciation_score: f64,
    pub fluency_score: f64,
    pub audio_duration: f64,
}
