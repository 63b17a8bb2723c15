//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_entity::account::AccountRole;

/// Claims payload embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: AccountId,
    /// Account role at the time of issuance.
    pub role: AccountRole,
    /// Owning organization at the time of issuance.
    pub org_id: OrganizationId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the account id from the subject claim.
    pub fn account_id(&self) -> AccountId {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}
