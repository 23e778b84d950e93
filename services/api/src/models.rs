//! API models for records, request payloads and response shapes

use serde::Deserialize;

use crate::pagination::PageRequest;

pub mod comment;
pub mod review;
pub mod taxonomy;
pub mod title;
pub mod user;

/// Query parameters shared by the searchable list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Search term
    pub search: Option<String>,
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn page_request(&self, default_limit: u32) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }

    /// The search term, ignoring blank input
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Query parameters of the nested review and comment lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self, default_limit: u32) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }
}
