//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orgguard_core::types::{AccountId, OrganizationId};

/// A tenancy boundary. Every account and API key belongs to exactly one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: OrganizationId,
    /// Unique organization name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Inactive organizations reject API-key authentication.
    pub is_active: bool,
    /// The founding admin, once one has been created.
    pub founded_by: Option<AccountId>,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
    /// When the organization was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Whether a founding admin has already claimed this organization.
    pub fn is_founded(&self) -> bool {
        self.founded_by.is_some()
    }
}

/// Data required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Caller-chosen identifier; generated when absent.
    pub id: Option<OrganizationId>,
    /// Unique name.
    pub name: String,
    /// Postal address.
    pub address: String,
}

/// Data for updating an organization. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganization {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}
