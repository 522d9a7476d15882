//! Host build-tool integration.
//!
//! The host calls [`StylesPlugin::transform`] once per rendered output
//! file, registers [`StylesPlugin::watch_targets`] with its file watcher,
//! and forwards change notifications to
//! [`StylesPlugin::on_files_changed`]. Non-HTML outputs pass through
//! untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::bundle::Bundler;
use crate::cache::{StyleCache, should_invalidate};
use crate::compile::StylesheetCompiler;
use crate::config::StylesConfig;
use crate::extract::ReferenceExtractor;
use crate::normalize::PostProcess;

/// Stylesheet bundling plugin for a static-site build.
///
/// Owns the style cache, so its lifetime defines the cache's lifetime.
pub struct StylesPlugin {
    bundler: Bundler,
    cache: Arc<StyleCache>,
    input_directory: PathBuf,
    add_watch_target: bool,
}

impl StylesPlugin {
    pub fn new(config: StylesConfig) -> Self {
        let cache = Arc::new(StyleCache::new());
        Self {
            input_directory: config.input_directory.clone(),
            add_watch_target: config.add_watch_target,
            bundler: Bundler::new(config, Arc::clone(&cache)),
            cache,
        }
    }

    /// Working directory all relative paths resolve against.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.bundler = self.bundler.with_root(root);
        self
    }

    /// Replace the SASS compiler implementation.
    pub fn with_compiler(mut self, compiler: Arc<dyn StylesheetCompiler>) -> Self {
        self.bundler = self.bundler.with_compiler(compiler);
        self
    }

    /// Replace the reference extractor implementation.
    pub fn with_extractor(mut self, extractor: Box<dyn ReferenceExtractor>) -> Self {
        self.bundler = self.bundler.with_extractor(extractor);
        self
    }

    /// Register a post-process plugin (runs in registration order).
    pub fn with_plugin(mut self, plugin: Arc<dyn PostProcess>) -> Self {
        self.bundler = self.bundler.with_plugin(plugin);
        self
    }

    /// Transform hook: bundle stylesheets into HTML outputs, pass every
    /// other output through unchanged.
    pub async fn transform(&self, content: &str, input_path: &Path, output_path: &Path) -> String {
        let is_html = output_path
            .extension()
            .is_some_and(|extension| extension == "html");
        if !is_html {
            return content.to_string();
        }

        self.bundler.bundle(content, input_path, output_path).await
    }

    /// Directories the host should watch for stylesheet edits.
    pub fn watch_targets(&self) -> Vec<PathBuf> {
        if self.add_watch_target {
            vec![self.input_directory.clone()]
        } else {
            Vec::new()
        }
    }

    /// Change notification: clear the whole compiled-stylesheet cache
    /// when any changed path is a stylesheet source.
    pub fn on_files_changed<P: AsRef<Path>>(&self, changed: &[P]) {
        if should_invalidate(changed) {
            self.cache.clear_all();
        }
    }

    /// The cache shared by every bundle invocation of this plugin.
    pub fn cache(&self) -> &Arc<StyleCache> {
        &self.cache
    }
}
