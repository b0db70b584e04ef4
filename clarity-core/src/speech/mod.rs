//! Speech assessment: provider seams, the Azure client, and the
//! submission pipeline that ties them to persistence.

pub mod accent;
pub mod assessor;
pub mod azure;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use accent::FixedAccentDetector;
pub use assessor::{AccentDetector, PronunciationAssessor, SpeechError};
pub use azure::{AzureSpeechClient, AzureSpeechConfig};
pub use pipeline::{AnalysisOutcome, PersistOutcome, SpeechPipeline};
pub use types::{AccentGuess, AnalysisReport, PronunciationScores, SpeechAssessment};
