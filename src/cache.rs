//! Process-wide cache of compiled-stylesheet results.
//!
//! Entries are keyed by the reference's literal text and created lazily on
//! first pipeline invocation. Concurrent builds of the same key share one
//! in-flight computation: the pending cell is published under its key
//! before any suspension occurs. Failures are never cached, so a failed
//! reference is re-attempted on the next bundle invocation. Entries never
//! expire on their own — staleness is handled entirely by the bulk clear
//! driven by the host's change notifications.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::debug;
use crate::error::BundleError;

/// Extensions whose changes invalidate compiled styles.
const STYLESHEET_EXTENSIONS: [&str; 3] = ["css", "scss", "sass"];

/// Memoization layer over the per-stylesheet pipeline.
///
/// Owned by the host integration layer and shared by every bundle
/// invocation; treat bundle options as constant for its lifetime or call
/// [`StyleCache::clear_all`] explicitly.
#[derive(Debug, Default)]
pub struct StyleCache {
    entries: DashMap<String, Arc<OnceCell<String>>>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached public path for `reference`, or run `build` to
    /// produce it. Callers racing on the same key await the same build
    /// instead of duplicating work; a failed build leaves no entry.
    pub async fn get_or_build<F, Fut>(&self, reference: &str, build: F) -> Result<String, BundleError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, BundleError>>,
    {
        let cell = self
            .entries
            .entry(reference.to_owned())
            .or_default()
            .clone();

        cell.get_or_try_init(build).await.cloned()
    }

    /// Drop every entry. Invalidation is always in bulk, never per key.
    pub fn clear_all(&self) {
        let count = self.entries.len();
        self.entries.clear();
        if count > 0 {
            debug!("cache"; "cleared {count} compiled stylesheet(s)");
        }
    }

    /// Number of keys with a started (possibly still in-flight) build.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a changed file is a stylesheet source.
pub fn is_stylesheet_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.contains(&ext))
}

/// Whether a change notification warrants clearing the cache.
pub fn should_invalidate<P: AsRef<Path>>(changed: &[P]) -> bool {
    changed.iter().any(|path| is_stylesheet_path(path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counted_build(
        counter: &Arc<AtomicUsize>,
    ) -> impl Future<Output = Result<String, BundleError>> + use<> {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("styles/main.css".to_string())
        }
    }

    #[tokio::test]
    async fn test_second_lookup_skips_build() {
        let cache = StyleCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_build("styles/main.scss", || counted_build(&counter))
            .await
            .unwrap();
        let second = cache
            .get_or_build("styles/main.scss", || counted_build(&counter))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_same_key_shares_one_build() {
        let cache = Arc::new(StyleCache::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let slow_build = |counter: Arc<AtomicUsize>| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok("styles/main.css".to_string())
        };

        let a = {
            let cache = Arc::clone(&cache);
            let counter = Arc::clone(&counter);
            tokio::spawn(async move {
                cache
                    .get_or_build("styles/main.scss", || slow_build(counter))
                    .await
            })
        };
        let b = {
            let cache = Arc::clone(&cache);
            let counter = Arc::clone(&counter);
            tokio::spawn(async move {
                cache
                    .get_or_build("styles/main.scss", || slow_build(counter))
                    .await
            })
        };

        assert_eq!(a.await.unwrap().unwrap(), "styles/main.css");
        assert_eq!(b.await.unwrap().unwrap(), "styles/main.css");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_build_separately() {
        let cache = StyleCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_build("a.scss", || counted_build(&counter))
            .await
            .unwrap();
        cache
            .get_or_build("b.scss", || counted_build(&counter))
            .await
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = StyleCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let failing = {
            let counter = Arc::clone(&counter);
            || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(BundleError::Resolve {
                    reference: "x.scss".into(),
                    document_candidate: PathBuf::from("a"),
                    shared_candidate: PathBuf::from("b"),
                })
            }
        };

        assert!(cache.get_or_build("x.scss", failing).await.is_err());
        let ok = cache
            .get_or_build("x.scss", || counted_build(&counter))
            .await;
        assert!(ok.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_all_forces_rebuild() {
        let cache = StyleCache::new();
        let counter = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_build("styles/main.scss", || counted_build(&counter))
            .await
            .unwrap();
        cache.clear_all();
        assert!(cache.is_empty());

        cache
            .get_or_build("styles/main.scss", || counted_build(&counter))
            .await
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_should_invalidate_on_stylesheet_extensions() {
        assert!(should_invalidate(&[PathBuf::from("src/styles/main.scss")]));
        assert!(should_invalidate(&[PathBuf::from("theme.sass")]));
        assert!(should_invalidate(&[
            PathBuf::from("page.html"),
            PathBuf::from("vendor.css"),
        ]));
    }

    #[test]
    fn test_should_not_invalidate_on_other_changes() {
        assert!(!should_invalidate(&[
            PathBuf::from("content/post.md"),
            PathBuf::from("src/main.rs"),
        ]));
        assert!(!should_invalidate::<PathBuf>(&[]));
        // Extension match is exact, not suffix-based
        assert!(!should_invalidate(&[PathBuf::from("notes.xcss")]));
    }
}
