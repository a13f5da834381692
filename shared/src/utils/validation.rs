//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::PasswordPolicy;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,32}$").expect("username pattern is valid"));

/// Why a password candidate was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRejection {
    TooShort { min: usize },
    TooLong { max: usize },
    Blank,
}

impl std::fmt::Display for PasswordRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordRejection::TooShort { min } => {
                write!(f, "password must be at least {} characters", min)
            }
            PasswordRejection::TooLong { max } => {
                write!(f, "password must be at most {} bytes", max)
            }
            PasswordRejection::Blank => write!(f, "password must not be blank"),
        }
    }
}

/// Check an email address against a practical RFC 5322 subset
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Usernames are 3-32 characters of letters, digits, `_`, `.` or `-`
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Emails are compared case-insensitively, so they are stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Usernames keep their case; only surrounding whitespace is dropped
pub fn normalize_username(username: &str) -> String {
    username.trim().to_string()
}

/// Apply the password policy to a candidate password
pub fn check_password(password: &str, policy: &PasswordPolicy) -> Result<(), PasswordRejection> {
    if password.trim().is_empty() {
        return Err(PasswordRejection::Blank);
    }
    if password.chars().count() < policy.min_length {
        return Err(PasswordRejection::TooShort {
            min: policy.min_length,
        });
    }
    if password.len() > policy.max_length {
        return Err(PasswordRejection::TooLong {
            max: policy.max_length,
        });
    }
    Ok(())
}

/// Mask an email for log output (e.g. j***@example.com)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => String::from("***"),
    }
}
