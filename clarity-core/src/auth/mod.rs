//! Accounts, password hashing and session tokens.

pub mod accounts;
pub mod password;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;

pub use accounts::{
    create_account, verify_credentials, LoginRequest, NewAccount, SignupRequest,
};
pub use token::{Claims, TokenIssuer};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Rejected input; the message is safe to show to the client.
    #[error("{0}")]
    Invalid(&'static str),
    #[error("a user with email '{0}' already exists")]
    DuplicateEmail(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => AuthError::DuplicateEmail(email),
            other => AuthError::Store(other),
        }
    }
}
