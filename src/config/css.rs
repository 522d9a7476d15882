//! CSS post-processing configuration (minify, purge).

use serde::{Deserialize, Serialize};

/// Minifier options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    /// Minify the final CSS (default: true).
    pub enable: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

/// Dead-rule purging options.
///
/// When enabled, rules whose selectors match no element of the document
/// being bundled are removed before minification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Remove rules that match nothing in the HTML (default: false).
    pub enable: bool,
    /// Selector tokens that survive purging even when absent from the
    /// document (class names, ids, or tag names, without `.`/`#` sigils).
    pub safelist: Vec<String>,
}
