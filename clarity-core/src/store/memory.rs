//! In-memory [`Store`] for tests. `set_offline(true)` makes every call fail
//! the way an unreachable pool does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{NewSpeechAnalysis, NewUser, SpeechAnalysis, User, UserRecord};
use super::{Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRecord>>,
    analyses: Mutex<Vec<SpeechAnalysis>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.users.lock().unwrap().clone()
    }

    pub fn analyses(&self) -> Vec<SpeechAnalysis> {
        self.analyses.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check_online()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|r| r.user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|r| r.user.id == id).map(|r| r.user.clone()))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|r| r.user.email == new_user.email) {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            full_name: new_user.full_name,
            native_language: new_user.native_language,
            target_accent: None,
            cefr_level: None,
            created_at: Utc::now(),
        };
        users.push(UserRecord {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn insert_analysis(
        &self,
        analysis: NewSpeechAnalysis,
    ) -> Result<SpeechAnalysis, StoreError> {
        self.check_online()?;
        let row = SpeechAnalysis {
            id: Uuid::new_v4(),
            user_id: analysis.user_id,
            transcription: analysis.transcription,
            detected_accent: analysis.detected_accent,
            confidence_score: analysis.confidence_score,
            pronunciation_score: analysis.pronunciation_score,
            fluency_score: analysis.fluency_score,
            audio_duration: analysis.audio_duration,
            created_at: Utc::now(),
        };
        self.analyses.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn count_analyses(&self, user_id: Uuid) -> Result<i64, StoreError> {
        self.check_online()?;
        let analyses = self.analyses.lock().unwrap();
        Ok(analyses.iter().filter(|a| a.user_id == user_id).count() as i64)
    }

    async fn average_pronunciation_score(&self, user_id: Uuid) -> Result<Option<f64>, StoreError> {
        self.check_online()?;
        let analyses = self.analyses.lock().unwrap();
        let scores: Vec<f64> = analyses
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.pronunciation_score)
            .collect();
        if scores.is_empty() {
            return Ok(None);
        }
        Ok(Some(scores.iter().sum::<f64>() / scores.len() as f64))
    }

    async fn health_check(&self) -> Result<DateTime<Utc>, StoreError> {
        self.check_online()?;
        Ok(Utc::now())
    }
}
