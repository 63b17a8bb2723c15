//! Session token issuing and verification.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::{IssuedToken, JwtEncoder};
pub use error::TokenError;
