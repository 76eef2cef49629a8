//! Data models for colorschemes, templates, and the render context.
//!
//! Models are independent of I/O and catalog logic: a [`Colorscheme`] or
//! [`Template`] is immutable once constructed and lives only for the
//! duration of one rendering run.

pub mod colorscheme;
pub mod context;
pub mod rgb;
pub mod template;

// Re-export all model types
pub use colorscheme::Colorscheme;
pub use context::{build_context, ContextValue, RenderContext};
pub use rgb::RgbColor;
pub use template::Template;
