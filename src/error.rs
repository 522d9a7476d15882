//! Error types for the bundling pipeline.
//!
//! The four pipeline stages each have a typed failure. All of them are
//! caught at the per-stylesheet boundary and recorded against the one
//! reference that failed; none of them aborts sibling pipelines.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error for failures coming from pluggable collaborators
/// (compiler implementations, post-process plugins).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Per-stylesheet pipeline failure, associated with a single reference.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The referenced stylesheet exists at neither candidate location.
    #[error(
        "stylesheet `{reference}` not found (tried `{document_candidate}` and `{shared_candidate}`)"
    )]
    Resolve {
        reference: String,
        document_candidate: PathBuf,
        shared_candidate: PathBuf,
    },

    /// The SASS compiler rejected the source.
    #[error("failed to compile `{path}`")]
    Compile {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Post-processing (purge, plugin, minify) failed.
    #[error("failed to normalize `{path}`")]
    Normalize {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Directory creation or file write failed.
    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors outside the per-stylesheet boundaries. These degrade the whole
/// bundle invocation to returning the input HTML unchanged.
#[derive(Debug, Error)]
pub enum SystemicError {
    /// The document's output path has no directory components, so the
    /// build root cannot be determined.
    #[error("output path `{path}` has no build directory")]
    OutputPath { path: PathBuf },

    /// A dispatched pipeline task died without settling (panic).
    #[error("pipeline task for `{reference}` panicked")]
    TaskPanic { reference: String },
}
