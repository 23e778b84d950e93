//! Categories and genres
//!
//! Both are flat `{name, slug}` vocabularies stored in tables of the same
//! shape, so one record type and one repository serve them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which vocabulary a term belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Genre,
}

impl Taxonomy {
    /// Table holding the terms
    pub fn table(&self) -> &'static str {
        match self {
            Taxonomy::Category => "categories",
            Taxonomy::Genre => "genres",
        }
    }

    /// Human-readable name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Taxonomy::Category => "Category",
            Taxonomy::Genre => "Genre",
        }
    }
}

/// Category or genre record
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Term {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Public representation of a category or genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermResponse {
    pub name: String,
    pub slug: String,
}

impl From<Term> for TermResponse {
    fn from(term: Term) -> Self {
        Self {
            name: term.name,
            slug: term.slug,
        }
    }
}

/// Request for creating a category or genre
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTermRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}
