//! Repositories for database operations
//!
//! Every repository wraps the shared pool. Statements that must succeed or
//! fail together, such as deletes that remove dependent rows, run inside a
//! single transaction.

pub mod comment;
pub mod review;
pub mod taxonomy;
pub mod title;
pub mod user;

pub use comment::CommentRepository;
pub use review::ReviewRepository;
pub use taxonomy::TaxonomyRepository;
pub use title::TitleRepository;
pub use user::UserRepository;

/// Build an `ILIKE` pattern matching `term` as a literal substring
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
