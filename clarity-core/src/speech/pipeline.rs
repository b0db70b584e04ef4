use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::audio::upload::AudioUpload;
use crate::identity::{resolve_owner, Identity};
use crate::store::{NewSpeechAnalysis, Store, StoreError};

use super::assessor::{AccentDetector, PronunciationAssessor, SpeechError};
use super::types::{
    to_unit_scale, AccentGuess, AnalysisReport, PronunciationScores, SpeechAssessment,
};

/// What happened to the history row for one analysis. Never affects the
/// HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Saved(Uuid),
    /// No pronunciation bundle came back, so there was nothing to record.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub persistence: PersistOutcome,
}

/// Submission -> assessment -> persistence -> report.
pub struct SpeechPipeline {
    assessor: Arc<dyn PronunciationAssessor>,
    accent: Arc<dyn AccentDetector>,
    store: Arc<dyn Store>,
}

impl SpeechPipeline {
    pub fn new(
        assessor: Arc<dyn PronunciationAssessor>,
        accent: Arc<dyn AccentDetector>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            assessor,
            accent,
            store,
        }
    }

    /// Run both provider calls concurrently and wait for both. Either one
    /// failing fails the analysis; the history write cannot.
    pub async fn analyze(
        &self,
        audio: &AudioUpload,
        identity: &Identity,
    ) -> Result<AnalysisOutcome, SpeechError> {
        let (assessment, accent) =
            tokio::join!(self.assessor.assess(audio), self.accent.detect(audio));
        let assessment = assessment?;
        let accent = accent?;

        let persistence = self.persist(identity, &assessment, &accent).await;
        let report = AnalysisReport::new(assessment, accent, Utc::now());
        Ok(AnalysisOutcome {
            report,
            persistence,
        })
    }

    async fn persist(
        &self,
        identity: &Identity,
        assessment: &SpeechAssessment,
        accent: &AccentGuess,
    ) -> PersistOutcome {
        let Some(scores) = assessment.pronunciation.as_ref() else {
            return PersistOutcome::Skipped;
        };
        match self.save(identity, assessment, scores, accent).await {
            Ok(id) => {
                info!(%id, email = identity.email(), "Saved speech analysis");
                PersistOutcome::Saved(id)
            }
            Err(err) => {
                error!(error = %err, "Failed to save speech analysis");
                PersistOutcome::Failed(err.to_string())
            }
        }
    }

    async fn save(
        &self,
        identity: &Identity,
        assessment: &SpeechAssessment,
        scores: &PronunciationScores,
        accent: &AccentGuess,
    ) -> Result<Uuid, StoreError> {
        let user_id = resolve_owner(self.store.as_ref(), identity).await?;
        let row = self
            .store
            .insert_analysis(NewSpeechAnalysis {
                user_id,
                transcription: assessment.text.clone(),
                detected_accent: accent.detected_accent.clone(),
                confidence_score: assessment.confidence,
                pronunciation_score: to_unit_scale(scores.pronunciation_score),
                fluency_score: to_unit_scale(scores.fluency_score),
                audio_duration: assessment.duration_secs,
            })
            .await?;
        Ok(row.id)
    }
}
