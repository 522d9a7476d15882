//! Writing compiled stylesheets into the build tree.

use std::path::Path;

use crate::error::BundleError;

/// Write final CSS to its destination, creating ancestor directories as
/// needed. Overwrites unconditionally — last writer wins.
pub async fn emit(destination: &Path, css: &str) -> Result<(), BundleError> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| BundleError::Write {
                path: destination.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(destination, css)
        .await
        .map_err(|source| BundleError::Write {
            path: destination.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_emit_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("dist/css/styles/main.css");

        emit(&destination, "body{color:red}").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "body{color:red}"
        );
    }

    #[tokio::test]
    async fn test_emit_is_idempotent_on_existing_directories() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("dist/main.css");

        emit(&destination, "a{}").await.unwrap();
        emit(&destination, "a{}").await.unwrap();
    }

    #[tokio::test]
    async fn test_emit_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("main.css");

        emit(&destination, "a{color:red}").await.unwrap();
        emit(&destination, "a{color:blue}").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "a{color:blue}"
        );
    }
}
