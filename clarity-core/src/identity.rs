//! Who a request acts on behalf of.
//!
//! Handlers receive an [`Identity`] from the request context. The demo
//! fallback is chosen by the server state, never inside the data paths.

use tracing::warn;
use uuid::Uuid;

use crate::store::{NewUser, Store, StoreError};

const DEMO_NAME: &str = "Demo User";
const DEMO_NATIVE_LANGUAGE: &str = "Spanish";
/// Not a valid password hash, so the demo account can never sign in.
const DEMO_PASSWORD_HASH: &str = "demo_hash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Authenticated through a verified token.
    User { id: Uuid, email: String },
    /// Shared proof-of-concept account, created on first use.
    Demo { email: String },
}

impl Identity {
    pub fn email(&self) -> &str {
        match self {
            Identity::User { email, .. } | Identity::Demo { email } => email,
        }
    }
}

/// User id that owns rows written for `identity`, creating the demo user if
/// it does not exist yet.
pub async fn resolve_owner(store: &dyn Store, identity: &Identity) -> Result<Uuid, StoreError> {
    match identity {
        Identity::User { id, .. } => Ok(*id),
        Identity::Demo { email } => ensure_demo_user(store, email).await,
    }
}

/// User id for read paths. Never creates a row.
pub async fn lookup_owner(
    store: &dyn Store,
    identity: &Identity,
) -> Result<Option<Uuid>, StoreError> {
    match identity {
        Identity::User { id, .. } => Ok(Some(*id)),
        Identity::Demo { email } => Ok(store
            .find_user_by_email(email)
            .await?
            .map(|record| record.user.id)),
    }
}

async fn ensure_demo_user(store: &dyn Store, email: &str) -> Result<Uuid, StoreError> {
    if let Some(record) = store.find_user_by_email(email).await? {
        return Ok(record.user.id);
    }

    let new_user = NewUser {
        email: email.to_string(),
        password_hash: DEMO_PASSWORD_HASH.to_string(),
        full_name: DEMO_NAME.to_string(),
        native_language: Some(DEMO_NATIVE_LANGUAGE.to_string()),
    };
    match store.create_user(new_user).await {
        Ok(user) => {
            warn!(email, "Created demo user");
            Ok(user.id)
        }
        // Another request created it between the lookup and the insert.
        Err(StoreError::DuplicateEmail(_)) => store
            .find_user_by_email(email)
            .await?
            .map(|record| record.user.id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound)),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn demo() -> Identity {
        Identity::Demo {
            email: "demo@clarity.ai".to_string(),
        }
    }

    #[tokio::test]
    async fn demo_user_is_created_once() {
        let store = MemoryStore::new();
        let first = resolve_owner(&store, &demo()).await.unwrap();
        let second = resolve_owner(&store, &demo()).await.unwrap();

        assert_eq!(first, second);
        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user.full_name, "Demo User");
        assert_eq!(users[0].user.native_language.as_deref(), Some("Spanish"));
    }

    #[tokio::test]
    async fn token_identity_is_used_directly() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let identity = Identity::User {
            id,
            email: "ana@example.com".to_string(),
        };
        assert_eq!(resolve_owner(&store, &identity).await.unwrap(), id);
        assert!(store.users().is_empty());
    }

    #[tokio::test]
    async fn lookup_never_creates_demo_user() {
        let store = MemoryStore::new();
        assert_eq!(lookup_owner(&store, &demo()).await.unwrap(), None);
        assert!(store.users().is_empty());
    }

    #[tokio::test]
    async fn outage_is_reported() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(resolve_owner(&store, &demo()).await.is_err());
    }
}
