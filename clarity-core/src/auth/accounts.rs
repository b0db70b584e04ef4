use serde::Deserialize;
use tracing::{info, warn};

use crate::store::{NewUser, Store, StoreError, User};

use super::password::{hash_password, verify_password};
use super::AuthError;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MISSING_FIELDS: &str = "Missing required fields";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A signup request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

fn required(value: Option<String>) -> Result<String, AuthError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::Invalid(MISSING_FIELDS))
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewAccount, AuthError> {
        let name = required(self.name)?;
        let email = required(self.email)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::Invalid(MISSING_FIELDS))?;

        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::Invalid(PASSWORD_TOO_SHORT));
        }
        Ok(NewAccount {
            name,
            email,
            password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), AuthError> {
        let email = required(self.email)?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::Invalid(MISSING_FIELDS))?;
        Ok((email, password))
    }
}

/// Hash the password and insert the user.
pub async fn create_account(store: &dyn Store, account: NewAccount) -> Result<User, AuthError> {
    let password = account.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AuthError::Hash(err.to_string()))??;

    let user = store
        .create_user(NewUser {
            email: account.email,
            password_hash,
            full_name: account.name,
            native_language: None,
        })
        .await?;
    info!(id = %user.id, "Created account");
    Ok(user)
}

/// Public user fields when the password matches, `None` for an unknown email
/// or a wrong password.
pub async fn verify_credentials(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let Some(record) = store.find_user_by_email(email).await? else {
        return Ok(None);
    };

    let password = password.to_string();
    let stored_hash = record.password_hash;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "Password check did not complete");
            false
        });

    Ok(matches.then_some(record.user))
}
