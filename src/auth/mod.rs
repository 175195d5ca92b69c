//! Authentication module for Materials Hub.
//!
//! Password hashing, credential validation, and account registration
//! utilities used by the web layer.

mod password;
pub mod validation;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use validation::ValidationError;
