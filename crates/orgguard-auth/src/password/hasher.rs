//! Argon2id password hashing and verification.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use orgguard_core::error::AppError;

/// Argon2id hash with default parameters, used when the throwaway hash
/// cannot be generated. Matches no password.
const FALLBACK_DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$25/Il69qHquVfW+Sipq/6Q$Qy0zjQxUcT51FUKRqMAQ97UWIG8qptNMo+kw0Qw9V8s";

/// Handles password hashing and verification using Argon2id.
///
/// Verification never fails: a malformed stored hash is reported as a
/// mismatch so callers cannot tell it apart from a wrong password.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    dummy_hash: OnceLock<String>,
}

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Runs one verification against a throwaway hash and returns `false`.
    ///
    /// Used for unknown accounts so the lookup miss costs as much as a
    /// wrong password.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let hash = self.dummy_hash.get_or_init(|| {
            self.hash_password("orgguard-timing-equalizer")
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Dummy hash generation failed; using fixed hash");
                    FALLBACK_DUMMY_HASH.to_string()
                })
        });
        let _ = self.verify_password(password, hash);
        false
    }
}
