//! API key value generation and format checking.
//!
//! Generator and validator share [`API_KEY_BYTES`]; a key is always the
//! lowercase hex encoding of that many random bytes.

use rand::RngCore;
use rand::rngs::OsRng;

/// Random bytes per key.
pub const API_KEY_BYTES: usize = 32;

/// Length of the encoded key value.
pub const API_KEY_LEN: usize = API_KEY_BYTES * 2;

/// Generate a fresh key value from the OS random source.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; API_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `value` has exactly the shape [`generate_api_key`] produces.
pub fn is_valid_api_key_format(value: &str) -> bool {
    value.len() == API_KEY_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
