//! Historical draw retrieval
//!
//! `DrawRepository` wraps a `DrawSource` with a session cache keyed by the
//! requested draw count. Failures never escape `fetch`: the caller gets an
//! empty draw list together with the error and decides how to degrade.

pub mod parser;
pub mod source;

pub use parser::parse_payload;
pub use source::{FileDrawSource, HttpDrawSource};

use crate::error::{Result, SenaForgeError};
use crate::types::{Draw, FetchConfig};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Trait for anything that can produce historical draws
#[async_trait]
pub trait DrawSource: Send + Sync {
    /// Fetch at most `count` draws
    async fn fetch_draws(&self, count: usize) -> Result<Vec<Draw>>;

    /// Human readable origin, for logs
    fn describe(&self) -> String;
}

/// Result of a repository fetch
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub draws: Arc<Vec<Draw>>,
    /// Set when the source failed and `draws` is empty
    pub error: Option<SenaForgeError>,
    pub from_cache: bool,
}

impl FetchOutcome {
    fn success(draws: Arc<Vec<Draw>>, from_cache: bool) -> Self {
        Self {
            draws,
            error: None,
            from_cache,
        }
    }

    fn failure(error: SenaForgeError) -> Self {
        Self {
            draws: Arc::new(Vec::new()),
            error: Some(error),
            from_cache: false,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }
}

/// Session-scoped access to historical draws.
///
/// Successful fetches are memoized per `count` for the lifetime of the
/// repository and are never invalidated automatically. Failed fetches are
/// not cached, so a later call retries the source.
pub struct DrawRepository {
    source: Box<dyn DrawSource>,
    cache: RwLock<HashMap<usize, Arc<Vec<Draw>>>>,
}

impl DrawRepository {
    pub fn new(source: impl DrawSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Repository backed by the remote results API
    pub fn http(config: FetchConfig) -> Result<Self> {
        Ok(Self::new(HttpDrawSource::new(config)?))
    }

    /// Repository backed by a saved results payload
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::new(FileDrawSource::new(path))
    }

    /// Fetch up to `count` draws, serving repeated counts from the cache
    pub async fn fetch(&self, count: usize) -> FetchOutcome {
        let cached = self.cache.read().get(&count).cloned();
        if let Some(draws) = cached {
            tracing::debug!(count = %count, "Draws served from cache");
            return FetchOutcome::success(draws, true);
        }

        if count == 0 {
            return FetchOutcome::success(Arc::new(Vec::new()), false);
        }

        let start = Instant::now();
        match self.source.fetch_draws(count).await {
            Ok(draws) => {
                let draws = Arc::new(draws);
                self.cache.write().insert(count, Arc::clone(&draws));

                tracing::info!(
                    source = %self.source.describe(),
                    requested = %count,
                    received = %draws.len(),
                    duration_ms = %start.elapsed().as_millis(),
                    "Draw fetch completed"
                );
                FetchOutcome::success(draws, false)
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.source.describe(),
                    requested = %count,
                    error = %e,
                    duration_ms = %start.elapsed().as_millis(),
                    "Draw fetch failed, continuing with no draws"
                );
                FetchOutcome::failure(e)
            }
        }
    }

    /// Counts currently held in the cache, ascending
    pub fn cached_counts(&self) -> Vec<usize> {
        let mut counts: Vec<usize> = self.cache.read().keys().copied().collect();
        counts.sort_unstable();
        counts
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl DrawSource for CountingSource {
        async fn fetch_draws(&self, count: usize) -> Result<Vec<Draw>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SenaForgeError::network("unreachable", None, None));
            }
            let base = Draw::new(&[1, 2, 3, 4, 5, 6])?;
            Ok(vec![base; count.min(3)])
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    fn repo(fail: bool) -> (DrawRepository, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            calls: Arc::clone(&calls),
            fail,
        };
        (DrawRepository::new(source), calls)
    }

    #[tokio::test]
    async fn test_fetch_is_memoized_by_count() {
        let (repo, calls) = repo(false);

        let first = repo.fetch(2).await;
        assert!(!first.from_cache);
        assert_eq!(first.draws().len(), 2);

        let second = repo.fetch(2).await;
        assert!(second.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        repo.fetch(5).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.cached_counts(), vec![2, 5]);
    }

    #[tokio::test]
    async fn test_failure_yields_empty_and_is_not_cached() {
        let (repo, calls) = repo(true);

        let outcome = repo.fetch(10).await;
        assert!(outcome.is_degraded());
        assert!(outcome.draws().is_empty());
        assert!(outcome.error.as_ref().unwrap().is_network());

        repo.fetch(10).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(repo.cached_counts().is_empty());
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let (repo, calls) = repo(false);
        repo.fetch(1).await;
        repo.clear_cache();
        repo.fetch(1).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_count_skips_source() {
        let (repo, calls) = repo(false);
        let outcome = repo.fetch(0).await;
        assert!(outcome.draws().is_empty());
        assert!(!outcome.is_degraded());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
