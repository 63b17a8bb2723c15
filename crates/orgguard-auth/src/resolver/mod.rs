//! Authentication resolver: request credentials in, identity context out.

pub mod credentials;
pub mod authenticator;

pub use credentials::{Credential, CredentialSources, extract_credential};
pub use authenticator::AuthResolver;
