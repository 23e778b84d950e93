//! Confirmation codes mailed at signup and exchanged for a bearer token

use rand::Rng;

/// Number of digits in a confirmation code
pub const CODE_LENGTH: usize = 6;

/// Generate a random zero-padded numeric confirmation code
pub fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..10u32.pow(CODE_LENGTH as u32));
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// Compare a submitted code with the stored one
///
/// A consumed (absent) code never matches.
pub fn code_matches(stored: Option<&str>, submitted: &str) -> bool {
    match stored {
        Some(stored) => !stored.is_empty() && stored == submitted,
        None => false,
    }
}
