use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Per-word detail returned by the pronunciation assessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordAssessment {
    pub word: String,
    pub accuracy_score: f64,
    /// Provider classification such as `None`, `Mispronunciation` or `Omission`.
    pub error_type: String,
}

/// Pronunciation sub-scores, each on the provider's 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationScores {
    pub accuracy_score: f64,
    pub fluency_score: f64,
    pub completeness_score: f64,
    pub pronunciation_score: f64,
    pub words: Vec<WordAssessment>,
}

/// Result of one pronunciation-assessment call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAssessment {
    pub text: String,
    /// Recognition confidence in [0, 1].
    pub confidence: f64,
    /// `None` when the provider recognized no speech.
    pub pronunciation: Option<PronunciationScores>,
    /// Length of the recognized audio in seconds, 0 when unknown.
    pub duration_secs: f64,
}

impl SpeechAssessment {
    /// Outcome for audio in which no speech was recognized.
    pub fn no_speech() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            pronunciation: None,
            duration_secs: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccentGuess {
    pub detected_accent: String,
    pub confidence: f64,
}

/// JSON body returned by the analyze endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub text: String,
    pub confidence: f64,
    pub pronunciation: Option<PronunciationScores>,
    pub accent: AccentGuess,
    pub timestamp: String,
}

impl AnalysisReport {
    pub fn new(assessment: SpeechAssessment, accent: AccentGuess, at: DateTime<Utc>) -> Self {
        Self {
            text: assessment.text,
            confidence: assessment.confidence,
            pronunciation: assessment.pronunciation,
            accent,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Convert a provider score (0-100) to the stored 0-1 scale.
pub fn to_unit_scale(score: f64) -> f64 {
    score / 100.0
}

/// Clamp a provider score into 0-100.
pub(crate) fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}
