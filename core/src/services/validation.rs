//! Input validation shared by registration and password reset

use auth_shared::config::PasswordPolicy;
use auth_shared::validation::{
    check_password, is_valid_email, is_valid_username, normalize_email, normalize_username,
};

use crate::errors::ValidationError;

/// Normalized registration input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
}

/// Validate and normalize registration fields
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    policy: &PasswordPolicy,
) -> Result<RegistrationInput, ValidationError> {
    let username = normalize_username(username);
    if username.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "username".to_string(),
        });
    }
    if !is_valid_username(&username) {
        return Err(ValidationError::InvalidUsername);
    }

    let email = normalize_email(email);
    if email.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "email".to_string(),
        });
    }
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    validate_password(password, policy)?;

    Ok(RegistrationInput { username, email })
}

/// Apply the password policy
pub fn validate_password(password: &str, policy: &PasswordPolicy) -> Result<(), ValidationError> {
    check_password(password, policy).map_err(|rejection| ValidationError::WeakPassword {
        reason: rejection.to_string(),
    })
}
