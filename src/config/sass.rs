//! SASS compiler configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output style for compiled CSS, before minification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SassStyle {
    /// Each selector and declaration on its own line.
    #[default]
    Expanded,
    /// Whitespace removed by the compiler itself.
    Compressed,
}

/// Options passed through to the SASS compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SassConfig {
    /// Output style of the compiled CSS.
    pub style: SassStyle,
    /// Additional directories searched by `@use` / `@import`.
    pub load_paths: Vec<PathBuf>,
    /// Suppress `@warn` / `@debug` output (default: true).
    pub quiet: bool,
}

impl Default for SassConfig {
    fn default() -> Self {
        Self {
            style: SassStyle::default(),
            load_paths: Vec::new(),
            quiet: true,
        }
    }
}
