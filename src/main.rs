//! Basetint - base16 colorscheme manager.
//!
//! Resolves a colorscheme and a set of application templates from remote
//! catalogs, renders each template with the derived color context, writes
//! the results to the configured paths, and runs post-render hooks.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use basetint::config::Config;
use basetint::constants::APP_NAME;
use basetint::models::Colorscheme;
use basetint::services::{
    Fetcher, HttpFetcher, Renderer, ResourceCache, SchemeCatalog, TemplateCatalog,
};

/// Basetint - apply base16 colorschemes across application configs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Update the list of templates and colorschemes
    #[arg(long)]
    update_list: bool,

    /// Delete the local master list caches
    #[arg(long)]
    clear_list: bool,

    /// Delete the local scheme caches
    #[arg(long)]
    clear_schemes: bool,

    /// Delete the local template caches
    #[arg(long)]
    clear_templates: bool,

    /// Report would-be writes instead of touching the filesystem
    #[arg(long)]
    dry_run: bool,

    /// Specify configuration file to use
    #[arg(long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(&cli.config)?;
    if cli.dry_run {
        config.dry_run = true;
    }

    apply_clear_flags(&cli, &config)?;

    // Create cache paths, if missing
    fs::create_dir_all(&config.schemes_cache_path).context(format!(
        "Failed to create scheme cache directory: {}",
        config.schemes_cache_path.display()
    ))?;
    fs::create_dir_all(&config.templates_cache_path).context(format!(
        "Failed to create template cache directory: {}",
        config.templates_cache_path.display()
    ))?;

    let fetcher = HttpFetcher::new()?;
    run(&config, &fetcher, cli.update_list)
}

/// Executes the resolution and rendering pipeline.
fn run(config: &Config, fetcher: &dyn Fetcher, update_list: bool) -> Result<()> {
    let mut schemes = SchemeCatalog::load(&config.schemes_list_file, &config.schemes_master_url)?;
    let mut templates =
        TemplateCatalog::load(&config.templates_list_file, &config.templates_master_url)?;

    if update_list {
        schemes.refresh(fetcher)?;
        templates.refresh(fetcher)?;
    }

    let entry = schemes.find(&config.colorscheme, fetcher)?;
    let scheme_cache = ResourceCache::new(&config.schemes_cache_path);
    let scheme =
        scheme_cache.materialize(&entry.name, &entry.url, fetcher, Colorscheme::parse)?;
    println!("[config]: selected scheme: {}", scheme.name);

    let renderer = Renderer::new(config, fetcher);

    for (app, binding) in config.enabled_applications() {
        let template = templates.find(app, fetcher)?;
        renderer.render(&template, &scheme, binding)?;

        // A failed hook is reported but never aborts the other applications.
        if let Err(e) = basetint::services::hooks::run_hook(app, &binding.hook, config.dry_run) {
            eprintln!("{e:#}");
        }
    }

    Ok(())
}

/// Applies the cache-clearing flags before the pipeline runs.
fn apply_clear_flags(cli: &Cli, config: &Config) -> Result<()> {
    if cli.clear_list {
        for path in [&config.schemes_list_file, &config.templates_list_file] {
            if path.exists() {
                fs::remove_file(path)
                    .context(format!("Failed to delete list file: {}", path.display()))?;
            }
        }
    }

    if cli.clear_schemes {
        ResourceCache::new(&config.schemes_cache_path).clear()?;
    }

    if cli.clear_templates {
        ResourceCache::new(&config.templates_cache_path).clear()?;
    }

    Ok(())
}
