//! Account management on behalf of an authenticated caller.

pub mod service;

pub use service::{AccountService, NewUser, ProfileUpdate};
