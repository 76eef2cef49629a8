//! Remote fetch primitive.
//!
//! All network access in the pipeline goes through the [`Fetcher`] trait:
//! one blocking fetch-to-string call, no retries, no caching (caching is
//! the resource cache's job). Tests substitute an in-memory fake.

use anyhow::{Context, Result};

/// Blocking fetch-to-string primitive.
pub trait Fetcher {
    /// Fetches the document at `url` and returns its body as a string.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP implementation of [`Fetcher`] backed by a blocking reqwest client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the application user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("basetint/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .context(format!("Failed to fetch {url}"))?;

        let response = response
            .error_for_status()
            .context(format!("Server returned an error status for {url}"))?;

        response
            .text()
            .context(format!("Failed to read response body from {url}"))
    }
}
