//! Per-stylesheet pipeline: Resolve → Compile → Normalize → Emit.
//!
//! The pipeline short-circuits on the first failing stage and converts
//! every failure into a [`BundleError`] associated with the one reference
//! being built. The whole chain runs behind the style cache, keyed on the
//! reference's literal text, so the start/done log lines fire once per
//! uncached reference.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::StyleCache;
use crate::compile::StylesheetCompiler;
use crate::config::StylesConfig;
use crate::emit::emit;
use crate::error::BundleError;
use crate::log;
use crate::normalize::{NormalizeContext, PostProcess, normalize};
use crate::resolve::resolve;

/// Everything a dispatched pipeline task needs, shared read-only across
/// all concurrent pipelines of one bundle invocation.
pub(crate) struct BundleContext {
    pub config: StylesConfig,
    pub cache: Arc<StyleCache>,
    pub compiler: Arc<dyn StylesheetCompiler>,
    pub plugins: Vec<Arc<dyn PostProcess>>,
    /// The rendered document, used as the purge target.
    pub html: Arc<str>,
    /// Directory of the document's source file (document-local lookups).
    pub document_dir: PathBuf,
    /// Shared style root, resolved against the working root.
    pub input_directory: PathBuf,
    /// Build output root the document is written under.
    pub build_root: PathBuf,
}

/// Build one stylesheet through the memoizing cache, returning its public
/// output path relative to the build root.
pub(crate) async fn transform_stylesheet(
    ctx: Arc<BundleContext>,
    reference: String,
) -> Result<String, BundleError> {
    let cache = Arc::clone(&ctx.cache);
    cache
        .get_or_build(&reference, || build_stylesheet(ctx, reference.clone()))
        .await
}

async fn build_stylesheet(
    ctx: Arc<BundleContext>,
    reference: String,
) -> Result<String, BundleError> {
    log!("styles"; "compiling {reference}");

    let resolved = resolve(
        &reference,
        &ctx.input_directory,
        &ctx.document_dir,
        &ctx.config.public_directory,
    )?;

    let css = ctx
        .compiler
        .compile(&resolved.source, &ctx.config.sass)
        .map_err(|err| BundleError::Compile {
            path: resolved.source.clone(),
            source: err.into(),
        })?;

    let css = normalize(
        &css,
        &NormalizeContext {
            html: &ctx.html,
            minify: &ctx.config.minify,
            purge: &ctx.config.purge,
            plugins: &ctx.plugins,
        },
    )
    .map_err(|err| BundleError::Normalize {
        path: resolved.source.clone(),
        source: err.into(),
    })?;

    let destination = ctx.build_root.join(&resolved.public_path);
    emit(&destination, &css).await?;

    log!("styles"; "compiled {reference} was written to {}", destination.display());
    Ok(resolved.public_path)
}
