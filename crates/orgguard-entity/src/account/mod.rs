//! Account (human principal) domain entities.

pub mod model;
pub mod role;

pub use model::{Account, CreateAccount, UpdateAccount, normalize_email};
pub use role::AccountRole;
