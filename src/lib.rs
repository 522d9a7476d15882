//! Stylepipe - stylesheet bundling for static site builds.
//!
//! Scans rendered HTML for stylesheet links, compiles each referenced
//! SASS/SCSS/CSS source, post-processes the CSS (purge, plugins, minify),
//! writes the result under the build output tree, and rewrites the HTML
//! to point at the emitted URL.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use stylepipe::{StylesConfig, StylesPlugin};
//!
//! let plugin = StylesPlugin::new(StylesConfig::default());
//!
//! // Once per rendered output file:
//! let html = plugin
//!     .transform(&rendered, Path::new("content/index.html"), Path::new("dist/index.html"))
//!     .await;
//!
//! // From the host's file watcher:
//! plugin.on_files_changed(&changed_paths);
//! ```

pub mod bundle;
pub mod cache;
pub mod compile;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod logger;
pub mod normalize;
pub mod plugin;
pub mod resolve;

pub use bundle::Bundler;
pub use cache::StyleCache;
pub use compile::{SassCompiler, StylesheetCompiler};
pub use config::{MinifyConfig, PurgeConfig, SassConfig, SassStyle, StylesConfig};
pub use error::{BundleError, SystemicError};
pub use extract::{LinkExtractor, ReferenceExtractor};
pub use normalize::PostProcess;
pub use plugin::StylesPlugin;
pub use resolve::{DocumentRoute, ResolvedPaths};
