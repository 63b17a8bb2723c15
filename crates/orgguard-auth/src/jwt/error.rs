//! Session token failures.

use orgguard_core::error::AppError;

/// Why a session token could not be issued or accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not a well-formed signed token.
    #[error("malformed session token")]
    Malformed,
    /// Structurally valid, but the signature does not match.
    #[error("session token signature mismatch")]
    BadSignature,
    /// Signature is valid but the token is past its expiry.
    #[error("session token expired")]
    Expired,
    /// The token could not be signed.
    #[error("failed to sign session token: {0}")]
    Encoding(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AppError::invalid_credential_format("Malformed session token"),
            TokenError::BadSignature => AppError::invalid_or_revoked("Invalid session token"),
            TokenError::Expired => AppError::credential_expired("Session token has expired"),
            TokenError::Encoding(_) => AppError::internal("Failed to issue session token"),
        }
    }
}
