//! # orgguard-auth
//!
//! The authentication and authorization pipeline of OrgGuard.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and password policy
//! - `jwt`: session token issuing and verification
//! - `api_key`: API key generation and lifecycle
//! - `resolver`: request credential to [`IdentityContext`]
//! - `rbac`: role and permission checks
//! - `tenant`: tenant isolation
//! - `pipeline`: ordered gates and per-operation policies
//! - `bootstrap`: founding-admin policy

pub mod api_key;
pub mod bootstrap;
pub mod context;
pub mod jwt;
pub mod password;
pub mod pipeline;
pub mod rbac;
pub mod resolver;
pub mod tenant;

pub use api_key::{ApiKeyManager, NewApiKey};
pub use bootstrap::{BootstrapPolicy, FoundingRequest};
pub use context::IdentityContext;
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder, TokenError};
pub use password::{PasswordHasher, PasswordValidator};
pub use pipeline::{AccessPipeline, AccessPolicy, Operation, TenantScope};
pub use rbac::RbacEnforcer;
pub use resolver::{AuthResolver, Credential, CredentialSources};
pub use tenant::{TenantGuard, TenantTarget};
