//! Stylesheet compilation.
//!
//! The pipeline only sees [`StylesheetCompiler`]; the production
//! implementation delegates to `grass`. Keeping the compiler behind a
//! trait lets tests count invocations and lets hosts swap in another
//! implementation.

use std::path::Path;

use anyhow::{Result, anyhow};

use crate::config::{SassConfig, SassStyle};

/// Compile one stylesheet source to raw CSS text.
pub trait StylesheetCompiler: Send + Sync {
    /// Compile the file at `source`. Syntax is chosen by extension
    /// (`.scss`, `.sass`, `.css`).
    fn compile(&self, source: &Path, config: &SassConfig) -> Result<String>;
}

/// SASS compiler backed by `grass`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SassCompiler;

impl StylesheetCompiler for SassCompiler {
    fn compile(&self, source: &Path, config: &SassConfig) -> Result<String> {
        let mut options = grass::Options::default()
            .style(match config.style {
                SassStyle::Expanded => grass::OutputStyle::Expanded,
                SassStyle::Compressed => grass::OutputStyle::Compressed,
            })
            .quiet(config.quiet);

        for path in &config.load_paths {
            options = options.load_path(path.as_path());
        }

        grass::from_path(source, &options).map_err(|err| anyhow!("{err}"))
    }
}
