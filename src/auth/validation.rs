//! Input validation for Materials Hub account registration.

use thiserror::Error;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email is empty.
    #[error("email cannot be empty")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,
}

/// Validate an email address.
///
/// Email is the login identifier, so unlike an optional profile field it
/// must be present and well-formed.
///
/// # Examples
///
/// ```
/// use materials_hub::auth::validation::validate_email;
///
/// assert!(validate_email("coach@example.com").is_ok());
/// assert!(validate_email("").is_err());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    // Basic format check: must contain @ and have text before and after.
    // Intentionally simple; full RFC validation is out of scope.
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::EmailInvalidFormat);
    }

    if !domain.contains('.') {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.iter().any(|p| p.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}
