use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::warn;

use crate::auth::TokenIssuer;
use crate::speech::AzureSpeechConfig;
use crate::store::DatabaseConfig;

/// Signing secret used when `JWT_SECRET` is not set. Development only.
const DEV_JWT_SECRET: &str = "clarity-dev-secret";

/// Speech provider settings. Key and region are required to serve requests.
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub key: Option<String>,
    pub region: Option<String>,
    pub language: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            key: None,
            region: None,
            language: "en-US".to_string(),
        }
    }
}

/// Top-level configuration, resolved from CLI arguments and the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen: String,
    pub database: DatabaseConfig,
    pub jwt_secret: Option<String>,
    pub token_ttl_days: i64,
    pub speech: SpeechSettings,
    /// Identity used for requests without a valid token.
    pub demo_email: String,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
            database: DatabaseConfig::default(),
            jwt_secret: None,
            token_ttl_days: 7,
            speech: SpeechSettings::default(),
            demo_email: "demo@clarity.ai".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .with_context(|| format!("invalid listen address '{}'", self.listen))
    }

    pub fn azure_speech(&self) -> Result<AzureSpeechConfig> {
        let key = non_empty(&self.speech.key).context("AZURE_SPEECH_KEY is not set")?;
        let region = non_empty(&self.speech.region).context("AZURE_SPEECH_REGION is not set")?;
        Ok(AzureSpeechConfig {
            key: key.to_string(),
            region: region.to_string(),
            language: self.speech.language.clone(),
        })
    }

    pub fn token_issuer(&self) -> TokenIssuer {
        let secret = match non_empty(&self.jwt_secret) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET is not set; signing tokens with the development secret");
                DEV_JWT_SECRET
            }
        };
        TokenIssuer::new(
            secret.as_bytes(),
            chrono::Duration::days(self.token_ttl_days),
        )
    }
}
