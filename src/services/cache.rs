//! Lazy on-disk resource cache.
//!
//! Given a catalog entry's name and remote URL, [`ResourceCache`] ensures a
//! local copy exists, fetching it at most once. The cache never expires and
//! performs no freshness checks; clearing is an explicit user action.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::fetch::Fetcher;

/// A directory-backed cache of fetched resource bodies.
#[derive(Debug, Clone)]
pub struct ResourceCache {
    dir: PathBuf,
}

impl ResourceCache {
    /// Creates a cache rooted at the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the deterministic local path for a resource name.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Ensures a local copy of the resource exists and returns its contents.
    ///
    /// If the file is absent the body is fetched from `url` and written
    /// verbatim before being returned; if present, the local copy is read
    /// directly with no network access.
    ///
    /// # Errors
    ///
    /// Returns an error on fetch failure, local write failure, or local
    /// read failure. There is no partial result: a failed fetch leaves
    /// nothing cached.
    pub fn ensure(&self, name: &str, url: &str, fetcher: &dyn Fetcher) -> Result<String> {
        let path = self.path_for(name);

        if !path.exists() {
            println!("downloading {url}");
            let body = fetcher.fetch(url)?;

            fs::create_dir_all(&self.dir).context(format!(
                "Failed to create cache directory: {}",
                self.dir.display()
            ))?;
            fs::write(&path, &body).context(format!(
                "Failed to write cached resource: {}",
                path.display()
            ))?;

            return Ok(body);
        }

        fs::read_to_string(&path).context(format!(
            "Failed to read cached resource: {}",
            path.display()
        ))
    }

    /// Materializes a typed entity from the cache: ensure a local copy,
    /// then parse it.
    ///
    /// Idempotent for a warm cache: a second call issues no network fetch
    /// and parses byte-identical input.
    ///
    /// # Errors
    ///
    /// Returns an error on fetch, I/O, or parse failure; all are fatal for
    /// the resource.
    pub fn materialize<T>(
        &self,
        name: &str,
        url: &str,
        fetcher: &dyn Fetcher,
        parse: impl FnOnce(&str) -> Result<T>,
    ) -> Result<T> {
        let body = self.ensure(name, url, fetcher)?;
        parse(&body).context(format!("Failed to parse cached resource '{name}'"))
    }

    /// Deletes the entire cache directory, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir).context(format!(
                "Failed to clear cache directory: {}",
                self.dir.display()
            ))?;
        }
        Ok(())
    }

    /// Returns the cache root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
