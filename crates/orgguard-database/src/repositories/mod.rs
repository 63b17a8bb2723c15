//! PostgreSQL repository implementations of the store traits.

pub mod account;
pub mod api_key;
pub mod audit;
pub mod organization;

pub use account::AccountRepository;
pub use api_key::ApiKeyRepository;
pub use audit::AuditLogRepository;
pub use organization::OrganizationRepository;

/// Name of the violated constraint, if `err` is a constraint violation.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
