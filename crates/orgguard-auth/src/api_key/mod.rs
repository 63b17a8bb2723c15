//! API key generation and lifecycle.

pub mod generator;
pub mod manager;

pub use generator::{API_KEY_BYTES, API_KEY_LEN, generate_api_key, is_valid_api_key_format};
pub use manager::{ApiKeyManager, NewApiKey};
