use async_trait::async_trait;
use thiserror::Error;

use crate::audio::upload::AudioUpload;

use super::types::{AccentGuess, SpeechAssessment};

/// Failures of the externally dispatched speech calls.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("speech service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode speech service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("accent detection failed: {0}")]
    Accent(String),
}

/// Scores the pronunciation of one recording.
///
/// A recording without recognizable speech is not an error: implementors
/// return [`SpeechAssessment::no_speech`].
#[async_trait]
pub trait PronunciationAssessor: Send + Sync {
    async fn assess(&self, audio: &AudioUpload) -> Result<SpeechAssessment, SpeechError>;
}

/// Guesses the speaker's accent from one recording.
#[async_trait]
pub trait AccentDetector: Send + Sync {
    async fn detect(&self, audio: &AudioUpload) -> Result<AccentGuess, SpeechError>;
}
