//! Credential checks run before any store access.
//!
//! Checks run in a fixed order (emptiness, then email format, then password
//! strength) and the first failure wins, so callers always see the same reason
//! for the same input.

use regex::Regex;
use secrecy::SecretString;
use thiserror::Error;

use super::normalize_email;

/// Minimum password length, counted in UTF-16 code units like browser `length`.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required and cannot be empty")]
    EmptyField,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Password must be at least 8 characters long")]
    WeakPassword,
    #[error("Invalid request payload")]
    MalformedPayload,
}

/// Signup fields after validation: name trimmed, email normalized.
#[derive(Debug)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Signin fields after validation: email normalized.
#[derive(Debug)]
pub struct SigninInput {
    pub email: String,
    pub password: SecretString,
}

/// Basic `local@domain.tld` shape check.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate raw signup fields.
///
/// # Errors
/// Returns the first failing check: `EmptyField`, `InvalidEmailFormat` or `WeakPassword`.
pub fn validate_signup(
    name: Option<&str>,
    password: Option<&str>,
    email: Option<&str>,
) -> Result<SignupInput, ValidationError> {
    let (Some(name), Some(password), Some(email)) =
        (present(name), present(password), present(email))
    else {
        return Err(ValidationError::EmptyField);
    };

    if !valid_email(email.trim()) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    if password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword);
    }

    Ok(SignupInput {
        name: name.trim().to_string(),
        email: normalize_email(email),
        password: SecretString::from(password.to_string()),
    })
}

/// Validate raw signin fields. Password strength is not checked here.
///
/// # Errors
/// Returns `EmptyField` or `InvalidEmailFormat`.
pub fn validate_signin(
    email: Option<&str>,
    password: Option<&str>,
) -> Result<SigninInput, ValidationError> {
    let (Some(email), Some(password)) = (present(email), present(password)) else {
        return Err(ValidationError::EmptyField);
    };

    if !valid_email(email.trim()) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(SigninInput {
        email: normalize_email(email),
        password: SecretString::from(password.to_string()),
    })
}
