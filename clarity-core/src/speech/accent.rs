use async_trait::async_trait;

use crate::audio::upload::AudioUpload;

use super::assessor::{AccentDetector, SpeechError};
use super::types::AccentGuess;

/// Placeholder detector that returns the same guess for every recording.
///
/// The speech provider has no accent classification endpoint, so this stands
/// in until a real classifier is wired behind [`AccentDetector`].
#[derive(Debug, Clone)]
pub struct FixedAccentDetector {
    accent: String,
    confidence: f64,
}

impl FixedAccentDetector {
    pub fn new(accent: impl Into<String>, confidence: f64) -> Self {
        Self {
            accent: accent.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

impl Default for FixedAccentDetector {
    fn default() -> Self {
        Self::new("en-US", 0.85)
    }
}

#[async_trait]
impl AccentDetector for FixedAccentDetector {
    async fn detect(&self, _audio: &AudioUpload) -> Result<AccentGuess, SpeechError> {
        Ok(AccentGuess {
            detected_accent: self.accent.clone(),
            confidence: self.confidence,
        })
    }
}
