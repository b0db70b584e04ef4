use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use tracing::debug;

/// Multipart field carrying the recording.
pub const AUDIO_FIELD: &str = "audio";

/// Content type sent upstream when the browser did not declare a usable one.
pub const DEFAULT_CONTENT_TYPE: &str = "audio/wav; codecs=audio/pcm; samplerate=16000";

/// Media types (`type/subtype`) the speech service accepts as declared.
const ACCEPTED_MEDIA_TYPES: &[&str] = &["audio/wav", "audio/wave", "audio/x-wav", "audio/ogg"];

/// One uploaded recording, kept as the encoded bytes the browser produced.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl AudioUpload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
            file_name: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Content type to declare upstream. Accepted types keep their
    /// parameters, rewritten as `type/subtype; key=value`.
    pub fn upstream_content_type(&self) -> String {
        self.content_type
            .as_deref()
            .and_then(normalize_accepted)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
    }
}

fn normalize_accepted(declared: &str) -> Option<String> {
    let mut parts = declared.split(';').map(str::trim);
    let essence = parts.next().filter(|essence| {
        ACCEPTED_MEDIA_TYPES
            .iter()
            .any(|accepted| essence.eq_ignore_ascii_case(accepted))
    })?;

    let mut normalized = essence.to_string();
    for param in parts.filter(|param| !param.is_empty()) {
        normalized.push_str("; ");
        normalized.push_str(param);
    }
    Some(normalized)
}

/// Pull the `audio` field out of a multipart body.
///
/// Returns `Ok(None)` when the field is absent or empty. Other fields are
/// skipped.
pub async fn read_audio_field(
    multipart: &mut Multipart,
) -> Result<Option<AudioUpload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        debug!(
            bytes = bytes.len(),
            ?content_type,
            ?file_name,
            "Received audio upload"
        );
        return Ok(Some(AudioUpload {
            bytes,
            content_type,
            file_name,
        }));
    }
    Ok(None)
}
