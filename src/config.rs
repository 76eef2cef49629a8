//! Configuration management for the application.
//!
//! The configuration is loaded once in `main` from a TOML file and passed
//! by reference into every component entry point; no component reads
//! ambient state. Cache and list-file locations default to the platform
//! cache directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Policy governing how a rendered file is merged into its target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Overwrite the target file unconditionally
    #[default]
    Rewrite,
    /// Append the rendered body to the target file, creating it if absent
    Append,
    /// Splice the rendered body between marker lines in an existing target
    Replace,
}

/// Per-application rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApplicationBinding {
    /// Whether this application is rendered at all
    #[serde(default)]
    pub enabled: bool,
    /// Template file key to output path (or bare file name)
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// Expected output file extension including the dot (e.g., ".conf"),
    /// may be empty
    #[serde(default)]
    pub extension: String,
    /// Write-mode policy for rendered output
    #[serde(default)]
    pub mode: WriteMode,
    /// Shell command run after rendering, may be empty
    #[serde(default)]
    pub hook: String,
}

/// Application configuration.
///
/// # File Location
///
/// Loaded from the path given on the command line (default `config.toml`
/// in the working directory). Cache paths and list files default under
/// the platform cache directory:
///
/// - Linux: `~/.cache/basetint/`
/// - macOS: `~/Library/Caches/basetint/`
/// - Windows: `%LOCALAPPDATA%\basetint\`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name (or fuzzy query) of the colorscheme to apply
    pub colorscheme: String,
    /// Directory for cached scheme-definition documents
    #[serde(default = "default_schemes_cache_path")]
    pub schemes_cache_path: PathBuf,
    /// Directory for cached template bodies (one subdirectory per template)
    #[serde(default = "default_templates_cache_path")]
    pub templates_cache_path: PathBuf,
    /// Persisted scheme catalog table
    #[serde(default = "default_schemes_list_file")]
    pub schemes_list_file: PathBuf,
    /// Persisted template catalog table
    #[serde(default = "default_templates_list_file")]
    pub templates_list_file: PathBuf,
    /// Master index of scheme repositories
    #[serde(default = "default_schemes_master_url")]
    pub schemes_master_url: String,
    /// Master index of template repositories
    #[serde(default = "default_templates_master_url")]
    pub templates_master_url: String,
    /// When set, report would-be writes instead of touching the filesystem
    #[serde(default)]
    pub dry_run: bool,
    /// Applications to render, keyed by template name
    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationBinding>,
}

/// Platform cache directory for the application, with a relative fallback
/// for environments without a resolvable home.
fn cache_root() -> PathBuf {
    dirs::cache_dir().map_or_else(|| PathBuf::from(".basetint"), |d| d.join("basetint"))
}

fn default_schemes_cache_path() -> PathBuf {
    cache_root().join("schemes")
}

fn default_templates_cache_path() -> PathBuf {
    cache_root().join("templates")
}

fn default_schemes_list_file() -> PathBuf {
    cache_root().join("schemeslist.yaml")
}

fn default_templates_list_file() -> PathBuf {
    cache_root().join("templateslist.yaml")
}

fn default_schemes_master_url() -> String {
    "https://raw.githubusercontent.com/chriskempson/base16-schemes-source/master/list.yaml"
        .to_string()
}

fn default_templates_master_url() -> String {
    "https://raw.githubusercontent.com/chriskempson/base16-templates-source/master/list.yaml"
        .to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation (empty colorscheme query).
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    fn validate(&self) -> Result<()> {
        if self.colorscheme.trim().is_empty() {
            anyhow::bail!("Config field 'colorscheme' must not be empty");
        }
        Ok(())
    }

    /// Returns the enabled applications in table order.
    pub fn enabled_applications(&self) -> impl Iterator<Item = (&String, &ApplicationBinding)> {
        self.applications.iter().filter(|(_, b)| b.enabled)
    }
}
