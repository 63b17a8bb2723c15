//! API key permission vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed permission vocabulary for API keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "api_key_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyPermission {
    /// Read access.
    Read,
    /// Write access.
    Write,
    /// Blanket permission; satisfies any permission requirement.
    Admin,
}

impl ApiKeyPermission {
    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }

    /// Parse a list of raw permission names, rejecting anything outside the vocabulary.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, orgguard_core::AppError> {
        let mut parsed = Vec::with_capacity(raw.len());
        for value in raw {
            let permission: Self = value.as_ref().parse()?;
            if !parsed.contains(&permission) {
                parsed.push(permission);
            }
        }
        Ok(parsed)
    }
}

impl fmt::Display for ApiKeyPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApiKeyPermission {
    type Err = orgguard_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            _ => Err(orgguard_core::AppError::validation(
                "Invalid permissions. Valid options: read, write, admin",
            )),
        }
    }
}
