//! API key (machine credential) domain entities.

pub mod model;
pub mod permission;

pub use model::{ApiKey, ApiKeySummary, CreateApiKey, KEY_PREFIX_LEN, RevocationReceipt, key_prefix};
pub use permission::ApiKeyPermission;
