//! Service layer for the resolution and rendering pipeline.
//!
//! Catalog lookup, resource caching, template rendering, and hook
//! invocation. Services take the configuration and fetcher by reference;
//! nothing here reads ambient state.

pub mod cache;
pub mod catalog;
pub mod fetch;
pub mod hooks;
pub mod render;

// Re-export commonly used types
pub use cache::ResourceCache;
pub use catalog::{SchemeCatalog, TemplateCatalog};
pub use fetch::{Fetcher, HttpFetcher};
pub use render::Renderer;
