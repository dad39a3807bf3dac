use super::matrix::reconcile;
use crate::domain::attempt::AttemptRecord;
use crate::domain::capability::CapabilityMatrix;
use crate::domain::catalog::DimensionCatalog;
use crate::domain::config::ManualConfiguration;
use crate::domain::ports::{AttemptStoreBox, ConfigurationStoreBox, TerminalId};
use crate::error::Result;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Fingerprint of one reconciliation input snapshot.
///
/// The attempt part ignores ordering, so a reshuffled attempt list maps to the
/// same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    attempts: u64,
    configuration: u64,
}

impl SnapshotKey {
    pub fn of(attempts: &[AttemptRecord], config: &ManualConfiguration) -> Self {
        let mut hashes: Vec<u64> = attempts.iter().map(fingerprint).collect();
        hashes.sort_unstable();
        Self {
            attempts: fingerprint(&hashes),
            configuration: fingerprint(config),
        }
    }
}

fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Number of terminals whose last matrix is kept by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

struct CachedMatrix {
    key: SnapshotKey,
    attempts: Vec<AttemptRecord>,
    config: ManualConfiguration,
    matrix: Arc<CapabilityMatrix>,
    stamp: u64,
}

impl CachedMatrix {
    // The key only filters; the stored inputs decide. Attempts arrive in
    // canonical order.
    fn answers(
        &self,
        key: &SnapshotKey,
        attempts: &[AttemptRecord],
        config: &ManualConfiguration,
    ) -> bool {
        self.key == *key && self.config == *config && self.attempts == attempts
    }
}

#[derive(Default)]
struct MatrixCache {
    entries: HashMap<TerminalId, CachedMatrix>,
    next_stamp: u64,
}

/// Hosts the reconciliation pipeline on top of a Record Store.
///
/// `ReconciliationEngine` reads a full snapshot of a terminal's attempts and
/// configuration before computing, and memoizes the last matrix per terminal
/// until either input changes. At most `cache_capacity` terminals are
/// memoized; the least recently computed one is evicted first.
pub struct ReconciliationEngine {
    attempt_store: AttemptStoreBox,
    configuration_store: ConfigurationStoreBox,
    catalog: DimensionCatalog,
    cache: RwLock<MatrixCache>,
    cache_capacity: usize,
}

impl ReconciliationEngine {
    /// Creates a new `ReconciliationEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `attempt_store` - The store for field attempts.
    /// * `configuration_store` - The store for declared configuration documents.
    pub fn new(attempt_store: AttemptStoreBox, configuration_store: ConfigurationStoreBox) -> Self {
        Self::with_cache_capacity(attempt_store, configuration_store, DEFAULT_CACHE_CAPACITY)
    }

    /// Like [`ReconciliationEngine::new`], memoizing at most `capacity`
    /// terminals. A capacity of zero disables memoization.
    pub fn with_cache_capacity(
        attempt_store: AttemptStoreBox,
        configuration_store: ConfigurationStoreBox,
        capacity: usize,
    ) -> Self {
        Self {
            attempt_store,
            configuration_store,
            catalog: DimensionCatalog::new(),
            cache: RwLock::new(MatrixCache::default()),
            cache_capacity: capacity,
        }
    }

    pub fn catalog(&self) -> &DimensionCatalog {
        &self.catalog
    }

    /// Appends a newly authored attempt for a terminal.
    pub async fn record_attempt(&self, terminal: &str, attempt: AttemptRecord) -> Result<()> {
        self.attempt_store.append(terminal, attempt).await
    }

    /// Replaces a terminal's declared configuration.
    pub async fn declare_configuration(
        &self,
        terminal: &str,
        config: ManualConfiguration,
    ) -> Result<()> {
        self.configuration_store.store(terminal, config).await
    }

    /// Computes the capability matrix of a terminal.
    ///
    /// A terminal without a configuration document is reconciled against an
    /// empty one. Unchanged inputs return the memoized matrix.
    pub async fn reconcile_terminal(&self, terminal: &str) -> Result<Arc<CapabilityMatrix>> {
        let mut attempts = self.attempt_store.snapshot(terminal).await?;
        // Canonical order, so a reordered snapshot still hits the cache.
        attempts.sort_by_cached_key(|attempt| fingerprint(attempt));
        let config = self
            .configuration_store
            .get(terminal)
            .await?
            .unwrap_or_default();
        let key = SnapshotKey::of(&attempts, &config);

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.entries.get(terminal)
                && cached.answers(&key, &attempts, &config)
            {
                debug!(terminal, "Reusing memoized capability matrix");
                return Ok(Arc::clone(&cached.matrix));
            }
        }

        let matrix = Arc::new(reconcile(&attempts, &config, &self.catalog));
        info!(
            terminal,
            attempts = attempts.len(),
            supported = matrix.summary.supported_count,
            unsupported = matrix.summary.unsupported_count,
            unknown = matrix.summary.unknown_count,
            conflicts = matrix.summary.conflict_count,
            "Reconciled terminal capabilities"
        );

        if self.cache_capacity == 0 {
            return Ok(matrix);
        }
        let mut cache = self.cache.write().await;
        if !cache.entries.contains_key(terminal) && cache.entries.len() >= self.cache_capacity {
            let oldest = cache
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stamp)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                debug!(terminal = oldest.as_str(), "Evicting memoized capability matrix");
                cache.entries.remove(&oldest);
            }
        }
        let stamp = cache.next_stamp;
        cache.next_stamp += 1;
        cache.entries.insert(
            terminal.to_string(),
            CachedMatrix {
                key,
                attempts,
                config,
                matrix: Arc::clone(&matrix),
                stamp,
            },
        );
        Ok(matrix)
    }

    /// Drops the memoized matrix of a terminal, if any.
    pub async fn forget(&self, terminal: &str) {
        self.cache.write().await.entries.remove(terminal);
    }

    /// Number of terminals currently memoized.
    pub async fn cached_terminals(&self) -> usize {
        self.cache.read().await.entries.len()
    }
}
