//! Router fixture backed by the in-memory store and scripted providers.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use axum::response::Response;
use axum::Router;

use crate::auth::{create_account, NewAccount, TokenIssuer};
use crate::speech::testing::{scored_assessment, CountingAccent, ScriptedAssessor};
use crate::store::memory::MemoryStore;
use crate::store::User;

use super::{router, AppState};

const SECRET: &[u8] = b"router-test-secret";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub assessor_calls: Arc<AtomicUsize>,
    pub accent_calls: Arc<AtomicUsize>,
    state: AppState,
}

impl TestApp {
    pub const PASSWORD: &'static str = "s3cret-pass";

    /// Provider scores 87 pronunciation / 92 fluency.
    pub fn new() -> Self {
        Self::with_doubles(
            Arc::new(MemoryStore::new()),
            ScriptedAssessor::returning(scored_assessment(87.0, 92.0)),
            CountingAccent::ok(),
        )
    }

    pub fn with_doubles(
        store: Arc<MemoryStore>,
        assessor: ScriptedAssessor,
        accent: CountingAccent,
    ) -> Self {
        let assessor_calls = assessor.calls();
        let accent_calls = accent.calls();
        let state = AppState::new(
            store.clone(),
            Arc::new(assessor),
            Arc::new(accent),
            TokenIssuer::new(SECRET, chrono::Duration::days(7)),
            "demo@clarity.ai",
        );
        Self {
            store,
            assessor_calls,
            accent_calls,
            state,
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone(), 1024 * 1024)
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.state.tokens
    }

    /// Create an account with [`Self::PASSWORD`] and return it with a token.
    pub async fn signed_up_user(&self, email: &str) -> (User, String) {
        let user = create_account(
            self.store.as_ref(),
            NewAccount {
                name: "Ana Lima".to_string(),
                email: email.to_string(),
                password: Self::PASSWORD.to_string(),
            },
        )
        .await
        .unwrap();
        let token = self.tokens().issue(&user).unwrap();
        (user, token)
    }
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
