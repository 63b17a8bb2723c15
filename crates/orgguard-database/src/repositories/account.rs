//! Account repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use orgguard_core::error::{AppError, ErrorKind};
use orgguard_core::result::AppResult;
use orgguard_core::types::{AccountId, OrganizationId};
use orgguard_entity::account::{Account, AccountRole, CreateAccount, UpdateAccount};
use orgguard_entity::organization::Organization;

use super::violated_constraint;
use crate::store::{AccountStore, FoundingAdmin};

/// Repository for account CRUD and the founding-admin transaction.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, action: &'static str) -> AppError {
    match violated_constraint(&e) {
        Some("accounts_email_key") => AppError::conflict("Email already in use"),
        Some("accounts_organization_id_fkey") => AppError::not_found("Organization not found"),
        Some("organizations_name_key") => AppError::conflict("Organization name already in use"),
        _ => AppError::with_source(ErrorKind::Internal, action, e),
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to find account by id", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to find account by email", e)
            })
    }

    async fn list_by_organization(&self, organization_id: OrganizationId) -> AppResult<Vec<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE organization_id = $1 ORDER BY created_at ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to list accounts", e))
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, name, email, password_hash, role, organization_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(AccountId::new())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(data.organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create account"))
    }

    async fn update(&self, id: AccountId, data: &UpdateAccount) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET name = COALESCE($2, name), \
                                 email = COALESCE($3, email), \
                                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update account"))
    }

    async fn delete(&self, id: AccountId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to begin transaction", e)
        })?;

        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to delete account", e))?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        // Keys outlive their creator as revoked records.
        sqlx::query(
            "UPDATE api_keys SET is_active = FALSE, revoked_at = NOW(), updated_at = NOW() \
             WHERE created_by = $1 AND is_active",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to revoke account keys", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to commit account deletion", e)
        })?;
        Ok(true)
    }

    async fn create_founding_admin(
        &self,
        data: &FoundingAdmin,
    ) -> AppResult<(Organization, Account)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to begin transaction", e)
        })?;

        // A concurrent founder inserting the same id blocks here until it
        // commits, after which the insert becomes a no-op.
        sqlx::query(
            "INSERT INTO organizations (id, name, address) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(data.organization_id)
        .bind(&data.organization_name)
        .bind(&data.organization_address)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create organization"))?;

        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, name, email, password_hash, role, organization_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(AccountId::new())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(AccountRole::Admin)
        .bind(data.organization_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create founding admin"))?;

        let organization = sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET founded_by = $2, updated_at = NOW() \
             WHERE id = $1 AND founded_by IS NULL \
               AND NOT EXISTS ( \
                   SELECT 1 FROM accounts WHERE organization_id = $1 AND id <> $2 \
               ) \
             RETURNING *",
        )
        .bind(data.organization_id)
        .bind(account.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to claim organization", e)
        })?;

        let Some(organization) = organization else {
            // Dropping the transaction rolls back the account insert.
            return Err(AppError::first_user_exists(
                "Organization already has a founding admin",
            ));
        };

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to commit founding admin", e)
        })?;

        Ok((organization, account))
    }
}
