//! HTTP service settings

use anyhow::{Context, Result};
use std::{env, net::SocketAddr};

use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// API service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP listener binds to
    pub bind_address: SocketAddr,
    /// Page size used when a list request does not ask for one
    pub page_size: u32,
}

const DEFAULT_BIND_ADDRESS: ([u8; 4], u16) = ([0, 0, 0, 0], 3001);

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_BIND_ADDRESS`: listen address (default: `0.0.0.0:3001`)
    /// - `API_PAGE_SIZE`: default page size, capped at 100 (default: 10)
    pub fn from_env() -> Result<Self> {
        let bind_address = match env::var("API_BIND_ADDRESS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid API_BIND_ADDRESS: {}", value))?,
            Err(_) => SocketAddr::from(DEFAULT_BIND_ADDRESS),
        };

        let page_size: u32 = match env::var("API_PAGE_SIZE") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid API_PAGE_SIZE: {}", value))?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        if page_size == 0 {
            anyhow::bail!("API_PAGE_SIZE must be positive");
        }

        Ok(Self {
            bind_address,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }
}
