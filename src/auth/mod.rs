//! Authentication module for CloudVault.
//!
//! Credential hashing and verification. Token issuance lives in the web
//! layer next to the handlers that use it.

mod password;

pub use password::{hash_password, validate_password, verify_password, PasswordError};
