//! Persisted catalogs of colorschemes and templates.
//!
//! Each catalog is a flat name-to-reference table persisted as YAML in the
//! configured list file. `refresh` merges entries discovered from a remote
//! master index; `find` resolves a query to a single entry via exact match
//! first, then a longest-common-substring fuzzy match.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::Template;
use crate::services::fetch::Fetcher;

/// A resolved scheme catalog entry: the scheme name and the URL of its
/// scheme-definition document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeEntry {
    /// Scheme name as listed in the catalog
    pub name: String,
    /// Document URL the scheme definition is fetched from
    pub url: String,
}

/// Picks the catalog name best matching `query`.
///
/// An exact case-sensitive match always wins. Otherwise the candidate with
/// the longest common substring (case-insensitive) is chosen; ties are
/// broken by the table's on-disk order, which is sorted, so the
/// lexicographically first name wins. Candidates sharing no substring with
/// the query at all are never matched.
#[must_use]
pub fn best_match<'a>(names: impl Iterator<Item = &'a str>, query: &str) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    let query_lower = query.to_lowercase();

    for name in names {
        if name == query {
            return Some(name);
        }

        let score = common_substring_len(&name.to_lowercase(), &query_lower);
        if score == 0 {
            continue;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((name, score)),
        }
    }

    best.map(|(name, _)| name)
}

/// Length of the longest common substring of two strings.
fn common_substring_len(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut longest = 0;
    let mut prev = vec![0usize; b.len() + 1];
    for ca in &a {
        let mut row = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                row[j + 1] = prev[j] + 1;
                longest = longest.max(row[j + 1]);
            }
        }
        prev = row;
    }

    longest
}

/// Converts a GitHub HTML file URL into its raw-content equivalent.
///
/// This is the single seam encoding the structural assumption about the
/// catalog host's URL layout: `github.com/{owner}/{repo}/blob/{branch}/{path}`
/// maps to `raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}`.
/// URLs of any other shape are returned unchanged, so catalogs may list
/// direct document URLs.
#[must_use]
pub fn resolve_document_url(url: &str) -> String {
    let Some(rest) = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
    else {
        return url.to_string();
    };

    let parts: Vec<&str> = rest.splitn(4, '/').collect();
    match parts.as_slice() {
        [owner, repo, "blob", path] => {
            format!("https://raw.githubusercontent.com/{owner}/{repo}/{path}")
        }
        _ => url.to_string(),
    }
}

/// Returns the raw-content base URL for a GitHub repository, assuming the
/// default `master` branch (the upstream catalog convention).
fn raw_base_for_repo(repo_url: &str) -> Result<String> {
    let rest = repo_url
        .trim_end_matches('/')
        .strip_prefix("https://github.com/")
        .or_else(|| repo_url.strip_prefix("http://github.com/"))
        .context(format!("Not a GitHub repository URL: {repo_url}"))?;

    let mut segments = rest.splitn(3, '/');
    let owner = segments.next().unwrap_or_default();
    let repo = segments.next().unwrap_or_default();
    if owner.is_empty() || repo.is_empty() {
        anyhow::bail!("Not a GitHub repository URL: {repo_url}");
    }

    Ok(format!(
        "https://raw.githubusercontent.com/{owner}/{repo}/master/"
    ))
}

/// Returns the GitHub contents API URL listing a repository's root files.
fn contents_api_url(repo_url: &str) -> Result<String> {
    let rest = repo_url
        .trim_end_matches('/')
        .strip_prefix("https://github.com/")
        .or_else(|| repo_url.strip_prefix("http://github.com/"))
        .context(format!("Not a GitHub repository URL: {repo_url}"))?;

    Ok(format!("https://api.github.com/repos/{rest}/contents"))
}

/// One file entry of a GitHub contents API listing.
#[derive(Debug, Deserialize)]
struct RepoFile {
    name: String,
    html_url: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Loads a persisted name-to-value table, returning an empty table when the
/// list file does not exist yet.
fn load_table<V: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, V>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = fs::read_to_string(path)
        .context(format!("Failed to read catalog file: {}", path.display()))?;
    serde_yml::from_str(&content)
        .context(format!("Failed to parse catalog file: {}", path.display()))
}

/// Persists a name-to-value table using a temp file + rename write.
fn save_table<V: Serialize>(path: &Path, table: &BTreeMap<String, V>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create catalog directory: {}",
                parent.display()
            ))?;
        }
    }

    let content = serde_yml::to_string(table).context("Failed to serialize catalog")?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).context(format!(
        "Failed to write temp catalog file: {}",
        temp_path.display()
    ))?;
    fs::rename(&temp_path, path).context(format!(
        "Failed to replace catalog file: {}",
        path.display()
    ))?;

    Ok(())
}

/// Catalog of colorschemes: scheme name to document URL.
#[derive(Debug)]
pub struct SchemeCatalog {
    list_file: PathBuf,
    master_url: String,
    entries: BTreeMap<String, String>,
}

impl SchemeCatalog {
    /// Loads the scheme catalog from its list file (empty when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if an existing list file cannot be read or parsed.
    pub fn load(list_file: impl Into<PathBuf>, master_url: impl Into<String>) -> Result<Self> {
        let list_file = list_file.into();
        let entries = load_table(&list_file)?;
        Ok(Self {
            list_file,
            master_url: master_url.into(),
            entries,
        })
    }

    /// Number of known schemes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no schemes are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refreshes the catalog from the remote master index.
    ///
    /// The index maps repository labels to repository URLs; each repository's
    /// root listing contributes one entry per YAML scheme file. New entries
    /// overwrite same-named old ones; entries not mentioned in this refresh
    /// are retained. The merged table is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error only when the master index itself is unreachable or
    /// malformed, or the merged table cannot be persisted. A failure in one
    /// listed repository is reported and skipped.
    pub fn refresh(&mut self, fetcher: &dyn Fetcher) -> Result<()> {
        let index_yaml = fetcher
            .fetch(&self.master_url)
            .context("Failed to fetch scheme master index")?;
        let repos: BTreeMap<String, String> =
            serde_yml::from_str(&index_yaml).context("Failed to parse scheme master index")?;

        println!("Found colorscheme repos: {}", repos.len());

        for (label, repo_url) in &repos {
            println!("Getting schemes from: {repo_url}");
            match Self::list_scheme_files(repo_url, fetcher) {
                Ok(files) => {
                    for (name, url) in files {
                        self.entries.insert(name, url);
                    }
                }
                Err(e) => {
                    eprintln!("Skipping scheme repo '{label}': {e:#}");
                }
            }
        }

        println!("Found colorschemes: {}", self.entries.len());
        save_table(&self.list_file, &self.entries)
    }

    /// Lists the YAML scheme files of one repository as (name, URL) pairs.
    fn list_scheme_files(repo_url: &str, fetcher: &dyn Fetcher) -> Result<Vec<(String, String)>> {
        let listing_json = fetcher.fetch(&contents_api_url(repo_url)?)?;
        let files: Vec<RepoFile> = serde_json::from_str(&listing_json)
            .context(format!("Failed to parse repository listing for {repo_url}"))?;

        let mut schemes = Vec::new();
        for file in files {
            if file.kind != "file" {
                continue;
            }
            let Some(stem) = file
                .name
                .strip_suffix(".yaml")
                .or_else(|| file.name.strip_suffix(".yml"))
            else {
                continue;
            };
            schemes.push((stem.to_string(), file.html_url));
        }

        Ok(schemes)
    }

    /// Finds the scheme entry best matching `query`.
    ///
    /// An empty catalog triggers exactly one [`refresh`](Self::refresh)
    /// before matching. The returned URL is already resolved to the
    /// document's raw-content location.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails or no entry matches the query.
    pub fn find(&mut self, query: &str, fetcher: &dyn Fetcher) -> Result<SchemeEntry> {
        if self.entries.is_empty() {
            println!("Colorscheme list is empty, pulling a new one...");
            self.refresh(fetcher)?;
        }

        let name = best_match(self.entries.keys().map(String::as_str), query)
            .context(format!("No colorscheme matching '{query}'"))?
            .to_string();
        let url = resolve_document_url(&self.entries[&name]);

        Ok(SchemeEntry { name, url })
    }
}

/// Catalog of templates: application name to populated template descriptor.
#[derive(Debug)]
pub struct TemplateCatalog {
    list_file: PathBuf,
    master_url: String,
    entries: BTreeMap<String, Template>,
}

impl TemplateCatalog {
    /// Loads the template catalog from its list file (empty when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if an existing list file cannot be read or parsed.
    pub fn load(list_file: impl Into<PathBuf>, master_url: impl Into<String>) -> Result<Self> {
        let list_file = list_file.into();
        let entries = load_table(&list_file)?;
        Ok(Self {
            list_file,
            master_url: master_url.into(),
            entries,
        })
    }

    /// Number of known templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no templates are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refreshes the catalog from the remote master index.
    ///
    /// The index maps template labels to repository URLs; each repository
    /// contributes one descriptor built from its `templates/config.yaml`
    /// manifest. Merge and persistence semantics match
    /// [`SchemeCatalog::refresh`].
    ///
    /// # Errors
    ///
    /// Returns an error only for an unreachable or malformed master index,
    /// or a persistence failure. Individual repository failures are
    /// reported and skipped.
    pub fn refresh(&mut self, fetcher: &dyn Fetcher) -> Result<()> {
        let index_yaml = fetcher
            .fetch(&self.master_url)
            .context("Failed to fetch template master index")?;
        let repos: BTreeMap<String, String> =
            serde_yml::from_str(&index_yaml).context("Failed to parse template master index")?;

        println!("Found template repos: {}", repos.len());

        for (label, repo_url) in &repos {
            match Self::fetch_descriptor(label, repo_url, fetcher) {
                Ok(template) => {
                    self.entries.insert(label.clone(), template);
                }
                Err(e) => {
                    eprintln!("Skipping template repo '{label}': {e:#}");
                }
            }
        }

        println!("Found templates: {}", self.entries.len());
        save_table(&self.list_file, &self.entries)
    }

    /// Builds one template descriptor from its repository manifest.
    fn fetch_descriptor(label: &str, repo_url: &str, fetcher: &dyn Fetcher) -> Result<Template> {
        let raw_base = if repo_url.starts_with("https://github.com/")
            || repo_url.starts_with("http://github.com/")
        {
            raw_base_for_repo(repo_url)?
        } else {
            // Non-GitHub sources are taken as ready raw prefixes.
            let mut base = repo_url.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            base
        };

        let manifest = fetcher.fetch(&format!("{raw_base}templates/config.yaml"))?;
        Template::from_manifest(label, &raw_base, &manifest)
    }

    /// Finds the template best matching `query`.
    ///
    /// An empty catalog triggers exactly one [`refresh`](Self::refresh)
    /// before matching.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails or no entry matches the query.
    pub fn find(&mut self, query: &str, fetcher: &dyn Fetcher) -> Result<Template> {
        if self.entries.is_empty() {
            println!("Template list is empty, pulling a new one...");
            self.refresh(fetcher)?;
        }

        let name = best_match(self.entries.keys().map(String::as_str), query)
            .context(format!("No template matching '{query}'"))?
            .to_string();

        Ok(self.entries[&name].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeFetcher {
        bodies: HashMap<String, String>,
        log: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                bodies: pairs
                    .iter()
                    .map(|(u, b)| ((*u).to_string(), (*b).to_string()))
                    .collect(),
                log: RefCell::new(Vec::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.log.borrow().len()
        }
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.log.borrow_mut().push(url.to_string());
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no body for {url}"))
        }
    }

    #[test]
    fn test_best_match_exact_wins_over_fuzzy() {
        let names = ["ocean", "oceanicnext", "deep-ocean"];
        // "oceanicnext" contains "ocean" and is longer, but the exact name wins
        assert_eq!(best_match(names.iter().copied(), "ocean"), Some("ocean"));
    }

    #[test]
    fn test_best_match_longest_common_substring() {
        let names = ["gruvbox-dark", "solarized-dark", "tomorrow-night"];
        assert_eq!(
            best_match(names.iter().copied(), "gruvbox"),
            Some("gruvbox-dark")
        );
        assert_eq!(
            best_match(names.iter().copied(), "solar"),
            Some("solarized-dark")
        );
    }

    #[test]
    fn test_best_match_tie_breaks_on_table_order() {
        // Both share the full query as a substring; first candidate wins
        let names = ["atelier-dune", "atelier-forest"];
        assert_eq!(
            best_match(names.iter().copied(), "atelier"),
            Some("atelier-dune")
        );
    }

    #[test]
    fn test_best_match_no_overlap_is_none() {
        let names = ["gruvbox", "nord"];
        assert_eq!(best_match(names.iter().copied(), "zzz"), None);
        assert_eq!(best_match(std::iter::empty(), "anything"), None);
    }

    #[test]
    fn test_common_substring_len() {
        assert_eq!(common_substring_len("gruvbox-dark", "gruvbox"), 7);
        assert_eq!(common_substring_len("abc", "xbcy"), 2);
        assert_eq!(common_substring_len("abc", "xyz"), 0);
        assert_eq!(common_substring_len("", "abc"), 0);
    }

    #[test]
    fn test_resolve_document_url_github_blob() {
        assert_eq!(
            resolve_document_url("https://github.com/owner/repo/blob/master/ocean.yaml"),
            "https://raw.githubusercontent.com/owner/repo/master/ocean.yaml"
        );
        assert_eq!(
            resolve_document_url("https://github.com/owner/repo/blob/main/dir/nord.yaml"),
            "https://raw.githubusercontent.com/owner/repo/main/dir/nord.yaml"
        );
    }

    #[test]
    fn test_resolve_document_url_passthrough() {
        let direct = "https://example.com/schemes/ocean.yaml";
        assert_eq!(resolve_document_url(direct), direct);
    }

    #[test]
    fn test_raw_base_for_repo() {
        assert_eq!(
            raw_base_for_repo("https://github.com/owner/repo").unwrap(),
            "https://raw.githubusercontent.com/owner/repo/master/"
        );
        assert!(raw_base_for_repo("https://example.com/owner/repo").is_err());
    }

    const SCHEME_INDEX_URL: &str = "https://example.com/schemes-list.yaml";

    fn scheme_index_fetcher() -> FakeFetcher {
        FakeFetcher::new(&[
            (
                SCHEME_INDEX_URL,
                "default: https://github.com/owner/schemes\n",
            ),
            (
                "https://api.github.com/repos/owner/schemes/contents",
                r#"[
                    {"name": "ocean.yaml", "html_url": "https://github.com/owner/schemes/blob/master/ocean.yaml", "type": "file"},
                    {"name": "nord.yml", "html_url": "https://github.com/owner/schemes/blob/master/nord.yml", "type": "file"},
                    {"name": "README.md", "html_url": "https://github.com/owner/schemes/blob/master/README.md", "type": "file"},
                    {"name": "sub", "html_url": "https://github.com/owner/schemes/tree/master/sub", "type": "dir"}
                ]"#,
            ),
        ])
    }

    #[test]
    fn test_scheme_refresh_collects_yaml_files() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("schemes.yaml");
        let fetcher = scheme_index_fetcher();

        let mut catalog = SchemeCatalog::load(&list_file, SCHEME_INDEX_URL).unwrap();
        catalog.refresh(&fetcher).unwrap();

        assert_eq!(catalog.len(), 2);
        let entry = catalog.find("ocean", &fetcher).unwrap();
        assert_eq!(entry.name, "ocean");
        assert_eq!(
            entry.url,
            "https://raw.githubusercontent.com/owner/schemes/master/ocean.yaml"
        );

        // The table round-trips through the list file
        let reloaded = SchemeCatalog::load(&list_file, SCHEME_INDEX_URL).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_scheme_refresh_retains_unmentioned_entries() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("schemes.yaml");

        let mut seeded: BTreeMap<String, String> = BTreeMap::new();
        seeded.insert(
            "legacy".to_string(),
            "https://example.com/legacy.yaml".to_string(),
        );
        save_table(&list_file, &seeded).unwrap();

        let fetcher = scheme_index_fetcher();
        let mut catalog = SchemeCatalog::load(&list_file, SCHEME_INDEX_URL).unwrap();
        catalog.refresh(&fetcher).unwrap();

        // New entries merged in, the unmentioned one kept
        assert_eq!(catalog.len(), 3);
        assert!(catalog.find("legacy", &fetcher).is_ok());
    }

    #[test]
    fn test_scheme_refresh_skips_failing_repo() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("schemes.yaml");
        let fetcher = FakeFetcher::new(&[
            (
                SCHEME_INDEX_URL,
                "bad: https://github.com/owner/missing\ngood: https://github.com/owner/schemes\n",
            ),
            (
                "https://api.github.com/repos/owner/schemes/contents",
                r#"[{"name": "ocean.yaml", "html_url": "https://github.com/owner/schemes/blob/master/ocean.yaml", "type": "file"}]"#,
            ),
        ]);

        let mut catalog = SchemeCatalog::load(&list_file, SCHEME_INDEX_URL).unwrap();
        catalog.refresh(&fetcher).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_scheme_refresh_fails_on_unreachable_index() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("schemes.yaml");
        let fetcher = FakeFetcher::new(&[]);

        let mut catalog = SchemeCatalog::load(&list_file, SCHEME_INDEX_URL).unwrap();
        assert!(catalog.refresh(&fetcher).is_err());
    }

    #[test]
    fn test_scheme_find_on_empty_catalog_refreshes_once() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("schemes.yaml");
        let fetcher = scheme_index_fetcher();

        let mut catalog = SchemeCatalog::load(&list_file, SCHEME_INDEX_URL).unwrap();
        assert!(catalog.is_empty());

        let entry = catalog.find("ocean", &fetcher).unwrap();
        assert_eq!(entry.name, "ocean");

        let index_fetches = fetcher
            .log
            .borrow()
            .iter()
            .filter(|u| u.as_str() == SCHEME_INDEX_URL)
            .count();
        assert_eq!(index_fetches, 1, "find must refresh exactly once");

        // A second find hits the in-memory table without another refresh
        catalog.find("nord", &fetcher).unwrap();
        let index_fetches = fetcher
            .log
            .borrow()
            .iter()
            .filter(|u| u.as_str() == SCHEME_INDEX_URL)
            .count();
        assert_eq!(index_fetches, 1);
    }

    #[test]
    fn test_scheme_find_not_found_even_after_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("schemes.yaml");
        let fetcher = FakeFetcher::new(&[(SCHEME_INDEX_URL, "{}")]);

        let mut catalog = SchemeCatalog::load(&list_file, SCHEME_INDEX_URL).unwrap();
        let err = catalog.find("anything", &fetcher).unwrap_err();
        assert!(err.to_string().contains("anything"));
        assert_eq!(fetcher.fetch_count(), 1);
    }

    const TEMPLATE_INDEX_URL: &str = "https://example.com/templates-list.yaml";

    fn template_index_fetcher() -> FakeFetcher {
        FakeFetcher::new(&[
            (
                TEMPLATE_INDEX_URL,
                "alacritty: https://github.com/owner/tmpl-alacritty\n",
            ),
            (
                "https://raw.githubusercontent.com/owner/tmpl-alacritty/master/templates/config.yaml",
                "default:\n  extension: .yml\n  output: alacritty\n",
            ),
        ])
    }

    #[test]
    fn test_template_refresh_builds_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("templates.yaml");
        let fetcher = template_index_fetcher();

        let mut catalog = TemplateCatalog::load(&list_file, TEMPLATE_INDEX_URL).unwrap();
        catalog.refresh(&fetcher).unwrap();

        let tmpl = catalog.find("alacritty", &fetcher).unwrap();
        assert_eq!(tmpl.name, "alacritty");
        assert_eq!(
            tmpl.raw_base_url,
            "https://raw.githubusercontent.com/owner/tmpl-alacritty/master/"
        );
        assert_eq!(tmpl.files["default"], "alacritty");

        // Descriptors round-trip through the list file
        let mut reloaded = TemplateCatalog::load(&list_file, TEMPLATE_INDEX_URL).unwrap();
        assert_eq!(reloaded.find("alacritty", &fetcher).unwrap(), tmpl);
    }

    #[test]
    fn test_template_find_fuzzy() {
        let dir = tempfile::tempdir().unwrap();
        let list_file = dir.path().join("templates.yaml");
        let fetcher = template_index_fetcher();

        let mut catalog = TemplateCatalog::load(&list_file, TEMPLATE_INDEX_URL).unwrap();
        catalog.refresh(&fetcher).unwrap();

        let tmpl = catalog.find("alacrit", &fetcher).unwrap();
        assert_eq!(tmpl.name, "alacritty");
    }
}
