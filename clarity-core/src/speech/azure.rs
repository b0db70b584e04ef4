//! Pronunciation assessment through the Azure Speech short-audio REST API.
//!
//! The recording is posted as the request body with a `Pronunciation-Assessment`
//! header describing the grading setup. The detailed-format response carries
//! the transcription, an n-best list with confidence, and the sub-scores.

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use tracing::{info, warn};

use crate::audio::upload::AudioUpload;

use super::assessor::{PronunciationAssessor, SpeechError};
use super::types::{clamp_score, PronunciationScores, SpeechAssessment, WordAssessment};

/// Azure reports offsets and durations in 100 ns ticks.
const TICKS_PER_SECOND: f64 = 10_000_000.0;

/// Open speech (no reference text), 0-100 grading, phoneme granularity.
const ASSESSMENT_PARAMS: &str = r#"{"ReferenceText":"","GradingSystem":"HundredMark","Granularity":"Phoneme","Dimension":"Comprehensive","EnableMiscue":true}"#;

/// Credentials and locale for the speech service.
#[derive(Debug, Clone)]
pub struct AzureSpeechConfig {
    pub key: String,
    pub region: String,
    pub language: String,
}

pub struct AzureSpeechClient {
    client: reqwest::Client,
    config: AzureSpeechConfig,
}

impl AzureSpeechClient {
    pub fn new(config: AzureSpeechConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build speech HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
            self.config.region
        )
    }

    fn assessment_header() -> String {
        STANDARD.encode(ASSESSMENT_PARAMS)
    }
}

#[async_trait]
impl PronunciationAssessor for AzureSpeechClient {
    async fn assess(&self, audio: &AudioUpload) -> Result<SpeechAssessment, SpeechError> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .query(&[
                ("language", self.config.language.as_str()),
                ("format", "detailed"),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .header(reqwest::header::CONTENT_TYPE, audio.upstream_content_type())
            .header(reqwest::header::ACCEPT, "application/json")
            .header("Pronunciation-Assessment", Self::assessment_header())
            .body(audio.bytes.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let assessment = parse_recognition(&body)?;
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = audio.len(),
            recognized = assessment.pronunciation.is_some(),
            "Pronunciation assessment complete"
        );
        Ok(assessment)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RecognitionResponse {
    recognition_status: String,
    #[serde(default)]
    display_text: String,
    #[serde(default)]
    duration: u64,
    #[serde(default, rename = "NBest")]
    n_best: Vec<NBestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NBestEntry {
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    display: String,
    #[serde(default)]
    pronunciation_assessment: Option<ScoreFields>,
    #[serde(flatten)]
    flat: ScoreFields,
    #[serde(default)]
    words: Vec<WordEntry>,
}

/// Scores appear either nested under `PronunciationAssessment` or directly on
/// the n-best entry depending on the API version.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScoreFields {
    accuracy_score: Option<f64>,
    fluency_score: Option<f64>,
    completeness_score: Option<f64>,
    pron_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WordEntry {
    word: String,
    #[serde(default)]
    accuracy_score: Option<f64>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    pronunciation_assessment: Option<WordScoreFields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WordScoreFields {
    accuracy_score: Option<f64>,
    error_type: Option<String>,
}

impl NBestEntry {
    fn score(&self, pick: impl Fn(&ScoreFields) -> Option<f64>) -> Option<f64> {
        self.pronunciation_assessment
            .as_ref()
            .and_then(&pick)
            .or_else(|| pick(&self.flat))
    }

    fn scores(&self) -> Option<PronunciationScores> {
        let overall = self.score(|s| s.pron_score)?;
        Some(PronunciationScores {
            accuracy_score: clamp_score(self.score(|s| s.accuracy_score).unwrap_or(0.0)),
            fluency_score: clamp_score(self.score(|s| s.fluency_score).unwrap_or(0.0)),
            completeness_score: clamp_score(self.score(|s| s.completeness_score).unwrap_or(0.0)),
            pronunciation_score: clamp_score(overall),
            words: self.words.iter().map(WordEntry::to_assessment).collect(),
        })
    }
}

impl WordEntry {
    fn to_assessment(&self) -> WordAssessment {
        let nested = self.pronunciation_assessment.as_ref();
        let accuracy = nested
            .and_then(|n| n.accuracy_score)
            .or(self.accuracy_score)
            .unwrap_or(0.0);
        let error_type = nested
            .and_then(|n| n.error_type.clone())
            .or_else(|| self.error_type.clone())
            .unwrap_or_else(|| "None".to_string());
        WordAssessment {
            word: self.word.clone(),
            accuracy_score: clamp_score(accuracy),
            error_type,
        }
    }
}

/// Turn a detailed-format response body into an assessment.
pub(crate) fn parse_recognition(body: &str) -> Result<SpeechAssessment, serde_json::Error> {
    let response: RecognitionResponse = serde_json::from_str(body)?;

    let best = match response.n_best.first() {
        Some(best) if response.recognition_status == "Success" => best,
        _ => {
            warn!(
                status = %response.recognition_status,
                "Speech service recognized no speech"
            );
            return Ok(SpeechAssessment::no_speech());
        }
    };

    let text = if response.display_text.is_empty() {
        best.display.clone()
    } else {
        response.display_text.clone()
    };

    Ok(SpeechAssessment {
        text,
        confidence: best.confidence.clamp(0.0, 1.0),
        pronunciation: best.scores(),
        duration_secs: response.duration as f64 / TICKS_PER_SECOND,
    })
}
