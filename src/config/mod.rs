//! Plugin configuration.
//!
//! Options are deserializable from the host's TOML configuration and are
//! threaded read-only through every pipeline stage of a bundle invocation.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! input_directory = "src/styles"
//! public_directory = "css"
//!
//! [styles.sass]
//! style = "expanded"
//!
//! [styles.purge]
//! enable = true
//! safelist = ["keep-me"]
//! ```

mod css;
mod sass;

pub use css::{MinifyConfig, PurgeConfig};
pub use sass::{SassConfig, SassStyle};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default directory with all style sources, relative to the working
/// directory of the host build.
pub const DEFAULT_INPUT_DIRECTORY: &str = "src/styles";

/// Configuration for the stylesheet bundling plugin.
///
/// Shared read-only by all concurrent per-stylesheet pipelines of a bundle
/// invocation. Treat as constant for the lifetime of the style cache, or
/// clear the cache explicitly after changing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Directory with all shared style sources. References that do not
    /// resolve next to their document are looked up here.
    pub input_directory: PathBuf,
    /// Directory inside the build output used as the warehouse for
    /// compiled styles. Prepended to public style URLs in HTML.
    pub public_directory: String,
    /// Whether the host should watch `input_directory` for changes.
    pub add_watch_target: bool,
    /// SASS compiler options.
    pub sass: SassConfig,
    /// Minifier options.
    pub minify: MinifyConfig,
    /// Dead-rule purging options.
    pub purge: PurgeConfig,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from(DEFAULT_INPUT_DIRECTORY),
            public_directory: String::new(),
            add_watch_target: true,
            sass: SassConfig::default(),
            minify: MinifyConfig::default(),
            purge: PurgeConfig::default(),
        }
    }
}

impl StylesConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Validate configuration, returning a diagnostic per problem.
    ///
    /// Empty result means the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut diagnostics = Vec::new();

        if self.input_directory.as_os_str().is_empty() {
            diagnostics.push("input_directory is empty".to_string());
        }

        if self.public_directory.starts_with('/') {
            diagnostics.push(format!(
                "public_directory `{}` must be relative to the build output",
                self.public_directory
            ));
        }

        for path in &self.sass.load_paths {
            if !path.exists() {
                diagnostics.push(format!("sass load path not found: {}", path.display()));
            }
        }

        diagnostics
    }
}
