//! Basetint Library
//!
//! This library provides the core functionality for the basetint CLI:
//! resolving base16 colorschemes and templates from remote catalogs,
//! caching them locally, and rendering application configuration files.

// Module declarations
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
