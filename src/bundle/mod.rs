//! Bundle orchestration: discover, build concurrently, rewrite.
//!
//! One bundle invocation extracts every stylesheet reference from a
//! rendered document, dispatches all per-stylesheet pipelines at once,
//! awaits them in extraction order, and rewrites each successful
//! reference to its emitted public URL. Individual pipeline failures are
//! reported and tolerated; only an error outside the per-pipeline
//! boundaries degrades the invocation to returning the input unchanged.

mod pipeline;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::StyleCache;
use crate::compile::{SassCompiler, StylesheetCompiler};
use crate::config::StylesConfig;
use crate::error::SystemicError;
use crate::extract::{LinkExtractor, ReferenceExtractor};
use crate::log;
use crate::normalize::PostProcess;
use crate::resolve::DocumentRoute;

use pipeline::{BundleContext, transform_stylesheet};

/// A successful pipeline outcome: the reference as it appears in the HTML
/// and the URL that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rewrite {
    input: String,
    output: String,
}

/// Stylesheet bundler for rendered documents.
///
/// Holds the configuration, the shared style cache, and the pluggable
/// collaborators (compiler, extractor, post-process plugins). One bundler
/// serves every document of a build.
pub struct Bundler {
    config: StylesConfig,
    root: PathBuf,
    cache: Arc<StyleCache>,
    compiler: Arc<dyn StylesheetCompiler>,
    extractor: Box<dyn ReferenceExtractor>,
    plugins: Vec<Arc<dyn PostProcess>>,
}

impl Bundler {
    /// Create a bundler with the default collaborators: grass compiler,
    /// `<link>` extractor, no plugins, working root `.`.
    pub fn new(config: StylesConfig, cache: Arc<StyleCache>) -> Self {
        Self {
            config,
            root: PathBuf::from("."),
            cache,
            compiler: Arc::new(SassCompiler),
            extractor: Box::new(LinkExtractor),
            plugins: Vec::new(),
        }
    }

    /// Working directory all relative paths (input directory, document
    /// source paths, output paths) resolve against.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_compiler(mut self, compiler: Arc<dyn StylesheetCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn ReferenceExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Register a post-process plugin. Plugins run in registration order.
    pub fn with_plugin(mut self, plugin: Arc<dyn PostProcess>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn config(&self) -> &StylesConfig {
        &self.config
    }

    /// Bundle all stylesheets referenced by `html`.
    ///
    /// `input_path` is the document's source file, `output_path` its
    /// location in the build tree (relative to the working root). Never
    /// fails: a systemic error is reported once and the input comes back
    /// unchanged.
    pub async fn bundle(&self, html: &str, input_path: &Path, output_path: &Path) -> String {
        match self.try_bundle(html, input_path, output_path).await {
            Ok(rewritten) => rewritten,
            Err(err) => {
                log!("error"; "styles left untouched for {}: {err}", output_path.display());
                html.to_string()
            }
        }
    }

    async fn try_bundle(
        &self,
        html: &str,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<String, SystemicError> {
        let references = self.extractor.extract(html);
        if references.is_empty() {
            return Ok(html.to_string());
        }

        let route = DocumentRoute::of(output_path)?;

        let document_dir = input_path.parent().unwrap_or_else(|| Path::new(""));
        let ctx = Arc::new(BundleContext {
            config: self.config.clone(),
            cache: Arc::clone(&self.cache),
            compiler: Arc::clone(&self.compiler),
            plugins: self.plugins.clone(),
            html: Arc::from(html),
            document_dir: self.root.join(document_dir),
            input_directory: self.root.join(&self.config.input_directory),
            build_root: self.root.join(&route.build_root),
        });

        // Dispatch every pipeline before awaiting any of them; joining in
        // extraction order keeps replacement order stable regardless of
        // completion order.
        let tasks: Vec<_> = references
            .iter()
            .map(|reference| tokio::spawn(transform_stylesheet(Arc::clone(&ctx), reference.clone())))
            .collect();

        let mut rewrites: Vec<Rewrite> = Vec::with_capacity(tasks.len());
        for (reference, task) in references.into_iter().zip(tasks) {
            match task.await {
                Ok(Ok(public_path)) => rewrites.push(Rewrite {
                    input: reference,
                    output: route.relative_url(&public_path),
                }),
                // Recorded failure: siblings and the bundle proceed.
                Ok(Err(err)) => log!("error"; "{err:#}"),
                Err(_) => return Err(SystemicError::TaskPanic { reference }),
            }
        }

        let mut rewritten = html.to_string();
        for rewrite in &rewrites {
            rewritten = rewritten.replace(&rewrite.input, &rewrite.output);
        }

        if !rewrites.is_empty() {
            let urls: Vec<&str> = rewrites.iter().map(|r| r.output.as_str()).collect();
            log!("styles"; "[{}] injected into {}", urls.join(", "), output_path.display());
        }

        Ok(rewritten)
    }
}
