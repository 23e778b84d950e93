//! Titles: the reviewable works of the catalog

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{models::taxonomy::TermResponse, pagination::PageRequest};

/// Title row joined with its category and the average review score
#[derive(Debug, Clone, FromRow)]
pub struct TitleRecord {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub rating: Option<f64>,
}

/// Read representation of a title
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: String,
    pub genre: Vec<TermResponse>,
    pub category: Option<TermResponse>,
}

impl TitleResponse {
    pub fn from_record(record: TitleRecord, genre: Vec<TermResponse>) -> Self {
        let category = match (record.category_name, record.category_slug) {
            (Some(name), Some(slug)) => Some(TermResponse { name, slug }),
            _ => None,
        };

        Self {
            id: record.id,
            name: record.name,
            year: record.year,
            rating: record.rating,
            description: record.description,
            genre,
            category,
        }
    }
}

/// Write payload for titles; genres and category are referenced by slug
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Validated title creation payload for the repository
#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_id: i64,
    pub genre_ids: Vec<i64>,
}

/// Validated partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub genre_ids: Option<Vec<i64>>,
}

/// Filters accepted by the title list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleQuery {
    /// Case-insensitive substring of the title name
    pub name: Option<String>,
    /// Case-insensitive substring of the category slug
    pub category: Option<String>,
    /// Case-insensitive substring of any genre slug
    pub genre: Option<String>,
    /// Exact release year
    pub year: Option<i32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TitleQuery {
    pub fn page_request(&self, default_limit: u32) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }
}
