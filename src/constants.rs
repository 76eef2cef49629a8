//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "Basetint";

/// Default output directory used when an application binding leaves a
/// template file's output path empty.
pub const DEFAULT_OUTPUT_DIR: &str = "./output/";

/// Marker line content opening a replace-mode splice region.
pub const REPLACE_BEGIN_MARKER: &str = "BASETINT START";

/// Marker line content closing a replace-mode splice region.
pub const REPLACE_END_MARKER: &str = "BASETINT END";
