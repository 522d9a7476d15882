//! Path resolution for discovered stylesheet references.
//!
//! A reference may point at a stylesheet colocated with its document or at
//! one shared under the configured input directory; the document-local
//! candidate wins. Output paths mirror the reference's own structure under
//! the public directory, with the extension normalized to `.css`.

use std::path::{Component, Path, PathBuf};

use crate::error::{BundleError, SystemicError};

/// Filesystem and URL locations derived from one stylesheet reference.
///
/// Pure function of the reference plus the bundle options; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Absolute (or build-relative) location of the stylesheet source.
    pub source: PathBuf,
    /// Output path relative to the build root, extension rewritten to
    /// `.css` and prefixed by the public directory.
    pub public_path: String,
}

/// Where a rendered document lands inside the build tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRoute {
    /// Top-level build output directory (first segment of the output path).
    pub build_root: PathBuf,
    /// How many directories the document sits below the build root.
    pub depth: usize,
}

impl DocumentRoute {
    /// Derive the route from the document's output path.
    ///
    /// `dist/a/b/index.html` → build root `dist`, depth 2.
    pub fn of(output_path: &Path) -> Result<Self, SystemicError> {
        let parent = output_path.parent().unwrap_or_else(|| Path::new(""));
        let segments: Vec<_> = parent
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment),
                _ => None,
            })
            .collect();

        let Some((root, nested)) = segments.split_first() else {
            return Err(SystemicError::OutputPath {
                path: output_path.to_path_buf(),
            });
        };

        Ok(Self {
            build_root: PathBuf::from(root),
            depth: nested.len(),
        })
    }

    /// Re-express a build-relative path as a browser-relative URL from
    /// this document's location: one `..` segment per nesting level.
    pub fn relative_url(&self, public_path: &str) -> String {
        let mut url = String::with_capacity(self.depth * 3 + public_path.len());
        for _ in 0..self.depth {
            url.push_str("../");
        }
        url.push_str(public_path);
        url
    }
}

/// Resolve a reference to its source file and public output path.
///
/// The candidate next to the document is preferred over the shared input
/// directory, so authors can use either a document-local stylesheet or one
/// under the common style root. Under the style root the reference path is
/// probed as-is first, then by file name — references conventionally
/// mirror the public layout (`styles/main.scss`) while the sources sit
/// directly in the input directory.
pub fn resolve(
    reference: &str,
    input_directory: &Path,
    document_dir: &Path,
    public_directory: &str,
) -> Result<ResolvedPaths, BundleError> {
    let document_candidate = document_dir.join(reference);
    let shared_candidate = input_directory.join(reference);

    let source = if document_candidate.is_file() {
        document_candidate
    } else if shared_candidate.is_file() {
        shared_candidate
    } else if let Some(by_name) = shared_by_file_name(reference, input_directory) {
        by_name
    } else {
        return Err(BundleError::Resolve {
            reference: reference.to_string(),
            document_candidate,
            shared_candidate,
        });
    };

    Ok(ResolvedPaths {
        source,
        public_path: public_output_path(reference, public_directory),
    })
}

fn shared_by_file_name(reference: &str, input_directory: &Path) -> Option<PathBuf> {
    let name = Path::new(reference).file_name()?;
    let candidate = input_directory.join(name);
    candidate.is_file().then_some(candidate)
}

/// Build the public output path for a reference: extension rewritten to
/// `.css`, prefixed by the public directory.
pub fn public_output_path(reference: &str, public_directory: &str) -> String {
    let rewritten = with_css_extension(reference.trim_start_matches("./"));
    if public_directory.is_empty() {
        rewritten
    } else {
        format!("{}/{}", public_directory.trim_end_matches('/'), rewritten)
    }
}

fn with_css_extension(reference: &str) -> String {
    match reference.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.css"),
        None => format!("{reference}.css"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_route_depth_nested() {
        let route = DocumentRoute::of(Path::new("dist/a/b/index.html")).unwrap();
        assert_eq!(route.build_root, PathBuf::from("dist"));
        assert_eq!(route.depth, 2);
    }

    #[test]
    fn test_route_depth_top_level() {
        let route = DocumentRoute::of(Path::new("dist/index.html")).unwrap();
        assert_eq!(route.build_root, PathBuf::from("dist"));
        assert_eq!(route.depth, 0);
    }

    #[test]
    fn test_route_ignores_cur_dir_segment() {
        let route = DocumentRoute::of(Path::new("./dist/posts/index.html")).unwrap();
        assert_eq!(route.build_root, PathBuf::from("dist"));
        assert_eq!(route.depth, 1);
    }

    #[test]
    fn test_route_rejects_bare_file() {
        assert!(DocumentRoute::of(Path::new("index.html")).is_err());
    }

    #[test]
    fn test_relative_url_two_levels() {
        let route = DocumentRoute::of(Path::new("dist/a/b/index.html")).unwrap();
        assert_eq!(
            route.relative_url("css/styles/main.css"),
            "../../css/styles/main.css"
        );
    }

    #[test]
    fn test_relative_url_zero_levels() {
        let route = DocumentRoute::of(Path::new("dist/index.html")).unwrap();
        assert_eq!(route.relative_url("styles/main.css"), "styles/main.css");
    }

    #[test]
    fn test_public_output_path_rewrites_extension() {
        assert_eq!(public_output_path("styles/main.scss", ""), "styles/main.css");
        assert_eq!(public_output_path("styles/main.sass", ""), "styles/main.css");
        assert_eq!(public_output_path("styles/main.css", ""), "styles/main.css");
    }

    #[test]
    fn test_public_output_path_prefixes_public_directory() {
        assert_eq!(
            public_output_path("styles/main.scss", "css"),
            "css/styles/main.css"
        );
    }

    #[test]
    fn test_public_output_path_strips_leading_dot_slash() {
        assert_eq!(public_output_path("./main.scss", "css"), "css/main.css");
    }

    #[test]
    fn test_resolve_prefers_document_local() {
        let dir = TempDir::new().unwrap();
        let document_dir = dir.path().join("pages");
        let input_dir = dir.path().join("src/styles");
        fs::create_dir_all(document_dir.join("styles")).unwrap();
        fs::create_dir_all(input_dir.join("styles")).unwrap();
        fs::write(document_dir.join("styles/main.scss"), "a{}").unwrap();
        fs::write(input_dir.join("styles/main.scss"), "b{}").unwrap();

        let resolved = resolve("styles/main.scss", &input_dir, &document_dir, "").unwrap();
        assert_eq!(resolved.source, document_dir.join("styles/main.scss"));
    }

    #[test]
    fn test_resolve_falls_back_to_input_directory() {
        let dir = TempDir::new().unwrap();
        let document_dir = dir.path().join("pages");
        let input_dir = dir.path().join("src/styles");
        fs::create_dir_all(&document_dir).unwrap();
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("main.scss"), "b{}").unwrap();

        let resolved = resolve("main.scss", &input_dir, &document_dir, "css").unwrap();
        assert_eq!(resolved.source, input_dir.join("main.scss"));
        assert_eq!(resolved.public_path, "css/main.css");
    }

    #[test]
    fn test_resolve_shared_by_file_name() {
        // Reference mirrors the public layout (`styles/...`) while the
        // source sits directly in the input directory.
        let dir = TempDir::new().unwrap();
        let document_dir = dir.path().join("content");
        let input_dir = dir.path().join("src/styles");
        fs::create_dir_all(&document_dir).unwrap();
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("main.scss"), "b{}").unwrap();

        let resolved = resolve("styles/main.scss", &input_dir, &document_dir, "").unwrap();
        assert_eq!(resolved.source, input_dir.join("main.scss"));
        assert_eq!(resolved.public_path, "styles/main.css");
    }

    #[test]
    fn test_resolve_not_found() {
        let dir = TempDir::new().unwrap();
        let err = resolve(
            "missing.scss",
            &dir.path().join("styles"),
            &dir.path().join("pages"),
            "",
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::Resolve { .. }));
        assert!(err.to_string().contains("missing.scss"));
    }
}
