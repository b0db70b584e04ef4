//! Test doubles for the speech provider seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::audio::upload::AudioUpload;

use super::assessor::{AccentDetector, PronunciationAssessor, SpeechError};
use super::types::{AccentGuess, PronunciationScores, SpeechAssessment, WordAssessment};

pub fn scored_assessment(pronunciation: f64, fluency: f64) -> SpeechAssessment {
    SpeechAssessment {
        text: "Good morning.".to_string(),
        confidence: 0.95,
        pronunciation: Some(PronunciationScores {
            accuracy_score: pronunciation,
            fluency_score: fluency,
            completeness_score: 100.0,
            pronunciation_score: pronunciation,
            words: vec![
                WordAssessment {
                    word: "good".to_string(),
                    accuracy_score: 96.0,
                    error_type: "None".to_string(),
                },
                WordAssessment {
                    word: "morning".to_string(),
                    accuracy_score: 78.0,
                    error_type: "Mispronunciation".to_string(),
                },
            ],
        }),
        duration_secs: 2.5,
    }
}

/// Returns a fixed assessment, or fails, and counts calls.
pub struct ScriptedAssessor {
    result: Option<SpeechAssessment>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedAssessor {
    pub fn returning(assessment: SpeechAssessment) -> Self {
        Self {
            result: Some(assessment),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl PronunciationAssessor for ScriptedAssessor {
    async fn assess(&self, _audio: &AudioUpload) -> Result<SpeechAssessment, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Some(assessment) => Ok(assessment.clone()),
            None => Err(SpeechError::Status {
                status: 401,
                body: "invalid subscription key".to_string(),
            }),
        }
    }
}

/// Accent detector that counts calls and can be told to fail.
pub struct CountingAccent {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl CountingAccent {
    pub fn ok() -> Self {
        Self {
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl AccentDetector for CountingAccent {
    async fn detect(&self, _audio: &AudioUpload) -> Result<AccentGuess, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SpeechError::Accent("classifier offline".to_string()));
        }
        Ok(AccentGuess {
            detected_accent: "en-US".to_string(),
            confidence: 0.85,
        })
    }
}
