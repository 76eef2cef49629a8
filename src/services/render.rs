//! Template rendering pipeline for one (template, scheme, binding) triple.
//!
//! For each declared file key: materialize the template body through the
//! resource cache, substitute the color context, resolve the output path,
//! and apply the binding's write-mode policy. Dry-run mode reports the
//! would-be paths without touching the filesystem.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{ApplicationBinding, Config, WriteMode};
use crate::constants::{DEFAULT_OUTPUT_DIR, REPLACE_BEGIN_MARKER, REPLACE_END_MARKER};
use crate::models::{build_context, Colorscheme, Template};
use crate::services::cache::ResourceCache;
use crate::services::fetch::Fetcher;

/// Renders templates against a colorscheme according to the configuration.
pub struct Renderer<'a> {
    config: &'a Config,
    fetcher: &'a dyn Fetcher,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer borrowing the run's configuration and fetcher.
    #[must_use]
    pub fn new(config: &'a Config, fetcher: &'a dyn Fetcher) -> Self {
        Self { config, fetcher }
    }

    /// Renders every file of one template with the given scheme and binding.
    ///
    /// # Errors
    ///
    /// Returns an error on any fetch, substitution, or filesystem failure;
    /// a failure aborts the remaining files of this template (no rollback
    /// of files already written).
    pub fn render(
        &self,
        template: &Template,
        scheme: &Colorscheme,
        binding: &ApplicationBinding,
    ) -> Result<()> {
        println!("[render]: rendering template \"{}\"", template.name);

        let cache = ResourceCache::new(self.config.templates_cache_path.join(&template.name));
        let context = build_context(scheme)?;

        let mut engine = Handlebars::new();
        engine.register_escape_fn(handlebars::no_escape);

        for key in template.files.keys() {
            let body = cache.ensure(
                &format!("{key}.mustache"),
                &template.body_url(key),
                self.fetcher,
            )?;

            // Flat key lookup; keys missing from the context render empty.
            let rendered = engine.render_template(&body, &context).context(format!(
                "Failed to substitute template '{}' file '{key}'",
                template.name
            ))?;

            let path_input = binding.files.get(key).map_or("", String::as_str);
            let (dir, file_name) = resolve_output_path(path_input, key, &binding.extension);
            let save_path = dir.join(&file_name);

            if self.config.dry_run {
                println!(
                    "    - (dry-run) file would be written to: {}",
                    save_path.display()
                );
                continue;
            }

            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(&dir).context(format!(
                    "Failed to create output directory: {}",
                    dir.display()
                ))?;
            }

            write_output(&save_path, &rendered, binding.mode)?;
        }

        Ok(())
    }
}

/// Resolves where a rendered file lands.
///
/// `path_input` is the binding's output path for the file key, defaulting
/// to the relative output directory when empty. The input splits into a
/// directory part and a file-name part at the last separator; a trailing
/// separator leaves the file name to be synthesized from the key. When
/// `extension` is non-empty and the file-name part does not already carry
/// it, the entire input is treated as a directory and the file name is
/// synthesized as `key + extension`.
#[must_use]
pub fn resolve_output_path(path_input: &str, key: &str, extension: &str) -> (PathBuf, String) {
    let path_input = if path_input.is_empty() {
        DEFAULT_OUTPUT_DIR
    } else {
        path_input
    };

    // Both separator styles count, so Windows-style binding paths split too.
    let (dir, file_name) = match path_input.rfind(['/', '\\']) {
        Some(idx) => (&path_input[..=idx], &path_input[idx + 1..]),
        None => ("", path_input),
    };

    // A trailing separator names a directory; the file name comes from the key.
    if file_name.is_empty() {
        return (PathBuf::from(dir), format!("{key}{extension}"));
    }

    if !extension.is_empty() && extension_of(file_name) != extension {
        return (PathBuf::from(path_input), format!("{key}{extension}"));
    }

    (PathBuf::from(dir), file_name.to_string())
}

/// Returns the file name's extension including the leading dot, or the
/// empty string when there is none.
fn extension_of(file_name: &str) -> &str {
    file_name.rfind('.').map_or("", |idx| &file_name[idx..])
}

/// Applies the write-mode policy for one rendered file.
fn write_output(path: &Path, rendered: &str, mode: WriteMode) -> Result<()> {
    match mode {
        WriteMode::Rewrite => {
            println!("     - writing: {}", path.display());
            fs::write(path, rendered)
                .context(format!("Failed to write output file: {}", path.display()))
        }
        WriteMode::Append => {
            println!("     - appending to: {}", path.display());
            append_output(path, rendered)
        }
        WriteMode::Replace => {
            println!("     - replacing in: {}", path.display());
            replace_output(path, rendered)
        }
    }
}

/// Appends the rendered body to the target, creating it if absent.
///
/// A newline is inserted first when the existing file does not end with
/// one, so repeated appends stay line-separated.
fn append_output(path: &Path, rendered: &str) -> Result<()> {
    let needs_separator = match fs::read_to_string(path) {
        Ok(existing) => !existing.is_empty() && !existing.ends_with('\n'),
        Err(_) => false,
    };

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(format!("Failed to open output file: {}", path.display()))?;

    if needs_separator {
        file.write_all(b"\n")
            .context(format!("Failed to append to: {}", path.display()))?;
    }
    file.write_all(rendered.as_bytes())
        .context(format!("Failed to append to: {}", path.display()))
}

/// Splices the rendered body between the begin/end marker lines of an
/// existing target, preserving the markers themselves.
///
/// Idempotent across repeated runs: only the span between the markers
/// changes; everything outside it, including the presence or absence of a
/// final newline, is kept byte for byte. A missing target or missing
/// markers is an error.
fn replace_output(path: &Path, rendered: &str) -> Result<()> {
    let existing = fs::read_to_string(path).context(format!(
        "Replace target does not exist or is unreadable: {}",
        path.display()
    ))?;

    let begin = existing.find(REPLACE_BEGIN_MARKER).context(format!(
        "Replace target {} has no '{REPLACE_BEGIN_MARKER}' marker line",
        path.display()
    ))?;

    // The head ends after the begin marker's line; the end marker must sit
    // on a later line.
    let end_marker_error = format!(
        "Replace target {} has no '{REPLACE_END_MARKER}' marker line after the begin marker",
        path.display()
    );
    let head_end = existing[begin..]
        .find('\n')
        .map(|i| begin + i + 1)
        .context(end_marker_error.clone())?;
    let end = existing[head_end..]
        .find(REPLACE_END_MARKER)
        .map(|i| head_end + i)
        .context(end_marker_error)?;
    let tail_start = existing[..end].rfind('\n').map_or(0, |i| i + 1);

    let mut out = String::with_capacity(existing.len() + rendered.len());
    out.push_str(&existing[..head_end]);
    out.push_str(rendered);
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&existing[tail_start..]);

    fs::write(path, out).context(format!("Failed to write output file: {}", path.display()))
}
