use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::models::Match;

/// In-process cache of ranked match lists
///
/// Each entry holds a list ranked up to the configured maximum read limit;
/// smaller reads are served by truncating it. Writers invalidate the keys
/// they touch after committing.
///
/// Every invalidation bumps a generation counter. A reader takes the
/// generation before reading the store and fills the cache through
/// [`MatchCache::fill`], which drops the entry again if a writer invalidated
/// anything in between.
#[derive(Clone)]
pub struct MatchCache {
    entries: Cache<String, Arc<Vec<Match>>>,
    generation: Arc<AtomicU64>,
}

impl MatchCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            entries,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Generation to hand back to [`MatchCache::fill`]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cached list truncated to `limit`
    pub async fn get(&self, key: &str, limit: usize) -> Option<Vec<Match>> {
        let ranked = self.entries.get(key).await?;
        tracing::trace!("Match cache hit: {}", key);
        Some(ranked.iter().take(limit).cloned().collect())
    }

    pub async fn set(&self, key: String, ranked: Vec<Match>) {
        tracing::trace!("Match cache set: {} ({} matches)", key, ranked.len());
        self.entries.insert(key, Arc::new(ranked)).await;
    }

    /// Cache a list read from the store at `generation`.
    ///
    /// Returns false when a writer invalidated in the meantime; the list is
    /// then not kept.
    pub async fn fill(&self, key: String, ranked: Vec<Match>, generation: u64) -> bool {
        if self.generation() != generation {
            tracing::trace!("Match cache fill skipped: {}", key);
            return false;
        }
        self.set(key.clone(), ranked).await;
        // A writer may have bumped and invalidated between the check and the insert
        if self.generation() != generation {
            self.entries.invalidate(&key).await;
            tracing::trace!("Match cache fill raced a writer: {}", key);
            return false;
        }
        true
    }

    pub async fn invalidate(&self, key: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.invalidate(key).await;
    }

    /// Drop the lists a change to one pair can affect
    pub async fn invalidate_pair(&self, project_id: Uuid, professional_id: Uuid) {
        self.invalidate(&CacheKey::project_matches(project_id)).await;
        self.invalidate(&CacheKey::professional_matches(professional_id)).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Ranked matches of a project
    pub fn project_matches(project_id: Uuid) -> String {
        format!("matches:project:{}", project_id)
    }

    /// Ranked matches of a professional
    pub fn professional_matches(professional_id: Uuid) -> String {
        format!("matches:professional:{}", professional_id)
    }
}
