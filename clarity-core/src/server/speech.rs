use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{error, warn};

use crate::audio::upload::read_audio_field;
use crate::error::ApiError;
use crate::identity::Identity;
use crate::speech::AnalysisReport;

use super::AppState;

const NO_AUDIO: &str = "No audio file provided";
const AUDIO_TOO_LARGE: &str = "Audio file too large";
const ANALYSIS_FAILED: &str = "Failed to analyze speech";

/// `POST /api/speech/analyze`
pub async fn analyze_speech(
    State(state): State<AppState>,
    identity: Identity,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "Rejected non-multipart upload");
        ApiError::BadRequest(NO_AUDIO)
    })?;

    let audio = match read_audio_field(&mut multipart).await {
        Ok(Some(audio)) => audio,
        Ok(None) => return Err(ApiError::BadRequest(NO_AUDIO)),
        Err(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(error = %err, "Upload exceeds body limit");
            return Err(ApiError::PayloadTooLarge(AUDIO_TOO_LARGE));
        }
        Err(err) => {
            warn!(error = %err, "Failed to read multipart body");
            return Err(ApiError::BadRequest(NO_AUDIO));
        }
    };

    match state.pipeline.analyze(&audio, &identity).await {
        Ok(outcome) => Ok(Json(outcome.report)),
        Err(err) => {
            error!(error = %err, "Speech analysis error");
            Err(ApiError::Internal(ANALYSIS_FAILED))
        }
    }
}
