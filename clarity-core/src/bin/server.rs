use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use clarity_core::config::{AppConfig, SpeechSettings};
use clarity_core::server::{ApiServer, AppState};
use clarity_core::speech::{AzureSpeechClient, FixedAccentDetector};
use clarity_core::store::schema::ensure_schema;
use clarity_core::store::{DatabaseConfig, PgStore, Store};

#[derive(Parser)]
#[command(name = "clarity-server")]
#[command(about = "Clarity Coach API: speech assessment, accounts and progress dashboard")]
struct Cli {
    /// Check datastore connectivity and provider settings, then exit.
    #[arg(long)]
    check: bool,

    /// Address to listen on.
    #[arg(long, env = "LISTEN", default_value = "127.0.0.1:3000")]
    listen: String,

    /// Postgres connection string.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/clarity_coach_dev"
    )]
    database_url: String,

    /// Maximum pooled datastore connections.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 20)]
    db_max_connections: u32,

    /// Time to wait for a pooled connection, in milliseconds.
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_MS", default_value_t = 2000)]
    db_acquire_timeout_ms: u64,

    /// Idle time before a pooled connection is closed, in milliseconds.
    #[arg(long, env = "DB_IDLE_TIMEOUT_MS", default_value_t = 30_000)]
    db_idle_timeout_ms: u64,

    /// Secret used to sign session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Session token lifetime in days.
    #[arg(long, env = "TOKEN_TTL_DAYS", default_value_t = 7)]
    token_ttl_days: i64,

    /// Azure Speech subscription key.
    #[arg(long, env = "AZURE_SPEECH_KEY", hide_env_values = true)]
    azure_speech_key: Option<String>,

    /// Azure Speech region (e.g., "eastus").
    #[arg(long, env = "AZURE_SPEECH_REGION")]
    azure_speech_region: Option<String>,

    /// Recognition locale.
    #[arg(long, env = "SPEECH_LANGUAGE", default_value = "en-US")]
    speech_language: String,

    /// Account used for requests without a token.
    #[arg(long, env = "DEMO_USER_EMAIL", default_value = "demo@clarity.ai")]
    demo_email: String,

    /// Largest accepted upload in bytes.
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 25 * 1024 * 1024)]
    max_upload_bytes: usize,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        Self {
            listen: cli.listen,
            database: DatabaseConfig {
                url: cli.database_url,
                max_connections: cli.db_max_connections,
                acquire_timeout: Duration::from_millis(cli.db_acquire_timeout_ms),
                idle_timeout: Duration::from_millis(cli.db_idle_timeout_ms),
            },
            jwt_secret: cli.jwt_secret,
            token_ttl_days: cli.token_ttl_days,
            speech: SpeechSettings {
                key: cli.azure_speech_key,
                region: cli.azure_speech_region,
                language: cli.speech_language,
            },
            demo_email: cli.demo_email,
            max_upload_bytes: cli.max_upload_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let check = cli.check;
    let config = AppConfig::from(cli);

    let store = PgStore::connect_lazy(&config.database).context("Invalid DATABASE_URL")?;

    // Self-check mode
    if check {
        return run_check(&config, &store).await;
    }

    let addr = config.listen_addr()?;
    let azure = AzureSpeechClient::new(config.azure_speech()?)?;

    if let Err(e) = ensure_schema(store.pool()).await {
        warn!(
            "Database unavailable at startup ({:#}); analyses will not be recorded until it returns",
            e
        );
    }

    let state = AppState::new(
        Arc::new(store),
        Arc::new(azure),
        Arc::new(FixedAccentDetector::default()),
        config.token_issuer(),
        config.demo_email.clone(),
    );

    info!(%addr, language = %config.speech.language, "Starting Clarity API");
    ApiServer::new(addr, state, config.max_upload_bytes)
        .run()
        .await
        .context("API server exited")?;
    Ok(())
}

async fn run_check(config: &AppConfig, store: &PgStore) -> Result<()> {
    println!("Checking Clarity services...");

    match store.health_check().await {
        Ok(now) => println!("  [ok] Database: connected (server time {now})"),
        Err(e) => println!("  [!!] Database: {e}"),
    }

    println!("Environment:");
    let vars = [
        ("AZURE_SPEECH_KEY", config.speech.key.is_some()),
        ("AZURE_SPEECH_REGION", config.speech.region.is_some()),
        ("JWT_SECRET", config.jwt_secret.is_some()),
    ];
    for (name, set) in vars {
        println!("  [{}] {}", if set { "ok" } else { "!!" }, name);
    }
    Ok(())
}
