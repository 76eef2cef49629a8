//! Template descriptor for per-application configuration stencils.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named set of per-application stencil files plus a remote fetch prefix.
///
/// Each entry in `files` maps a logical file key (e.g., "default") to the
/// output-path hint declared by the template repository. The body for a key
/// is fetched from `raw_base_url` + `templates/` + key + `.mustache`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Template name (the catalog label, usually the application name)
    pub name: String,
    /// Logical file key to output-path hint
    pub files: BTreeMap<String, String>,
    /// Remote prefix for fetching individual per-key template bodies
    pub raw_base_url: String,
}

/// One entry of a template repository's `templates/config.yaml` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ManifestEntry {
    /// Suggested file extension for rendered output (e.g., ".conf")
    #[serde(default)]
    extension: String,
    /// Suggested output directory relative to the application config root
    #[serde(default)]
    output: String,
}

impl Template {
    /// Builds a template descriptor from a repository's `templates/config.yaml`.
    ///
    /// # Arguments
    ///
    /// * `name` - Catalog label for the template
    /// * `raw_base_url` - Remote prefix the per-key bodies are fetched from
    /// * `manifest_yaml` - Contents of the repository's `templates/config.yaml`
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is not valid YAML or declares no files.
    pub fn from_manifest(name: &str, raw_base_url: &str, manifest_yaml: &str) -> Result<Self> {
        let manifest: BTreeMap<String, ManifestEntry> = serde_yml::from_str(manifest_yaml)
            .context(format!("Failed to parse template manifest for '{name}'"))?;

        if manifest.is_empty() {
            anyhow::bail!("Template '{name}' declares no files in its manifest");
        }

        let files = manifest
            .into_iter()
            .map(|(key, entry)| (key, entry.output))
            .collect();

        Ok(Self {
            name: name.to_string(),
            files,
            raw_base_url: raw_base_url.to_string(),
        })
    }

    /// Returns the fetch URL for one file key's template body.
    #[must_use]
    pub fn body_url(&self, key: &str) -> String {
        format!("{}templates/{key}.mustache", self.raw_base_url)
    }
}
