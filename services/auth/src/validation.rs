//! Input validation utilities for account fields

use regex::Regex;
use std::sync::OnceLock;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 250;
pub const NAME_MAX_LENGTH: usize = 150;

/// Username reserved for the self-service profile route
pub const RESERVED_USERNAME: &str = "me";

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(format!(
            "Username must be at most {} characters long",
            USERNAME_MAX_LENGTH
        ));
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(
            "Username can only contain letters, digits and the characters @ . + - _".to_string(),
        );
    }

    validate_not_reserved(username)
}

/// Reject the reserved `me` username in any letter case
pub fn validate_not_reserved(username: &str) -> Result<(), String> {
    if username.to_lowercase() == RESERVED_USERNAME {
        return Err(format!("Username cannot be '{}'", RESERVED_USERNAME));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().count() > EMAIL_MAX_LENGTH {
        return Err(format!(
            "Email must be at most {} characters long",
            EMAIL_MAX_LENGTH
        ));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate an optional profile name (first or last name)
pub fn validate_person_name(name: &str) -> Result<(), String> {
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(format!(
            "Name must be at most {} characters long",
            NAME_MAX_LENGTH
        ));
    }

    Ok(())
}
