//! Field validators for catalog and review payloads

use regex::Regex;
use std::sync::OnceLock;

pub const NAME_MAX_LENGTH: usize = 250;
pub const SLUG_MAX_LENGTH: usize = 50;
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

/// Validate a category, genre or title name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("This field may not be blank.".to_string());
    }

    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            NAME_MAX_LENGTH
        ));
    }

    Ok(())
}

/// Validate a slug
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("This field may not be blank.".to_string());
    }

    if slug.chars().count() > SLUG_MAX_LENGTH {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            SLUG_MAX_LENGTH
        ));
    }

    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX
        .get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("Failed to compile slug regex"));

    if !regex.is_match(slug) {
        return Err(
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.".to_string(),
        );
    }

    Ok(())
}

/// Validate a release year against the current year
pub fn validate_year(year: i32, current_year: i32) -> Result<(), String> {
    if year < 0 {
        return Err("Year cannot be negative".to_string());
    }

    if year > current_year {
        return Err("Year cannot be in the future".to_string());
    }

    Ok(())
}

/// Validate a review score
pub fn validate_score(score: i32) -> Result<(), String> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        ));
    }

    Ok(())
}

/// Validate review or comment text
pub fn validate_text(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("This field may not be blank.".to_string());
    }

    Ok(())
}
