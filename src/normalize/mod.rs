//! CSS post-processing: purge, plugins, minify.
//!
//! `normalize` is a deterministic function of its inputs — the same
//! `(html, css, options)` always yields the same output — since it sits
//! behind the pipeline's memoization boundary.

mod minify;
mod purge;

pub use minify::minify_css;
pub use purge::{DocumentIndex, purge_css};

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{MinifyConfig, PurgeConfig};

/// An arbitrary post-processing step, run between purging and
/// minification in registration order.
pub trait PostProcess: Send + Sync {
    /// Name used in diagnostics when the plugin fails.
    fn name(&self) -> &str;

    /// Transform the CSS, returning the replacement text.
    fn process(&self, css: &str) -> Result<String>;
}

/// Inputs to one normalize invocation.
pub struct NormalizeContext<'a> {
    /// The document the stylesheet was discovered in (purge target).
    pub html: &'a str,
    pub minify: &'a MinifyConfig,
    pub purge: &'a PurgeConfig,
    pub plugins: &'a [Arc<dyn PostProcess>],
}

/// Post-process raw CSS: purge dead rules against the document, run each
/// registered plugin in order, then minify.
pub fn normalize(css: &str, ctx: &NormalizeContext<'_>) -> Result<String> {
    let mut css = if ctx.purge.enable {
        let index = DocumentIndex::from_html(ctx.html);
        purge_css(css, &index, ctx.purge).context("purge failed")?
    } else {
        css.to_string()
    };

    for plugin in ctx.plugins {
        css = plugin
            .process(&css)
            .with_context(|| format!("plugin `{}` failed", plugin.name()))?;
    }

    if ctx.minify.enable {
        css = minify_css(&css).context("minify failed")?;
    }

    Ok(css)
}
