//! The cached ledger access layer.
//!
//! [`LedgerStore`] owns the in-memory mapping from player identity to the
//! one cached [`PlayerLedgerRecord`] per identity, and orchestrates the
//! three persistence motions around it:
//!
//! 1. **Cache-populate** -- the first access for an identity loads its row
//!    (or creates a default row for a never-seen identity), then the cached
//!    copy is the single source of truth for the rest of the process
//!    lifetime. Storage failures degrade to a zero-valued record; callers
//!    never see an error.
//! 2. **Write-behind** -- every mutation snapshots the record under its
//!    per-identity lock and dispatches one asynchronous full-record write.
//!    Callers never wait on storage. Failed writes are logged and dropped.
//! 3. **Shutdown flush** -- outstanding writes are drained and every cached
//!    record is persisted synchronously before the pool closes.
//!
//! Composite check-then-act operations (sufficiency-checked removes,
//! rebirth) pass their whole check-mutate sequence as one closure to
//! [`update`](LedgerStore::update), which holds that identity's lock
//! throughout. Two concurrent removes against the same balance therefore
//! serialize instead of double-spending.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;

use gilder_db::{LedgerPool, PlayerStore};
use gilder_types::{PlayerId, PlayerLedgerRecord};

/// A cached record entry: the per-identity lock plus the record behind it.
type CacheEntry = Arc<Mutex<PlayerLedgerRecord>>;

/// Cache-first, write-behind access to every player's ledger record.
pub struct LedgerStore {
    pool: LedgerPool,
    cache: RwLock<HashMap<PlayerId, CacheEntry>>,
    /// Outstanding fire-and-forget writes, awaited collectively at flush.
    writes: Mutex<JoinSet<()>>,
}

impl LedgerStore {
    /// Create a store over an already-connected pool.
    pub fn new(pool: LedgerPool) -> Self {
        Self {
            pool,
            cache: RwLock::new(HashMap::new()),
            writes: Mutex::new(JoinSet::new()),
        }
    }

    /// Read a value out of one player's record.
    ///
    /// Populates the cache on first access for the identity; afterwards
    /// this is purely in-memory.
    pub async fn read<T>(&self, id: PlayerId, f: impl FnOnce(&PlayerLedgerRecord) -> T) -> T {
        let entry = self.entry(id).await;
        let record = entry.lock().await;
        f(&record)
    }

    /// Mutate one player's record and schedule persistence.
    ///
    /// The closure runs with the per-identity lock held, so a
    /// check-then-act sequence inside it cannot interleave with another
    /// mutation of the same identity. The mutated record is snapshotted
    /// under the same lock and written behind; the caller does not wait for
    /// storage.
    pub async fn update<T>(
        &self,
        id: PlayerId,
        f: impl FnOnce(&mut PlayerLedgerRecord) -> T,
    ) -> T {
        let entry = self.entry(id).await;
        let (result, snapshot) = {
            let mut record = entry.lock().await;
            let result = f(&mut record);
            (result, record.clone())
        };
        self.dispatch_persist(id, snapshot).await;
        result
    }

    /// Return the currently cached record for `id`, or `None` if the
    /// identity was never populated.
    ///
    /// Never touches storage; this is the read-only snapshot surface for
    /// templating adapters.
    pub async fn snapshot(&self, id: PlayerId) -> Option<PlayerLedgerRecord> {
        let entry = self.cache.read().await.get(&id).cloned();
        match entry {
            Some(entry) => Some(entry.lock().await.clone()),
            None => None,
        }
    }

    /// Eagerly populate the cache for `id` so later accesses are fast.
    ///
    /// Called when an identity is first observed (session join).
    pub async fn preload(&self, id: PlayerId) {
        let _ = self.entry(id).await;
    }

    /// Number of identities currently cached.
    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Persist every cached record and settle all outstanding writes.
    ///
    /// This is the one place writes are awaited. After it returns, every
    /// identity cached at call time has a storage row matching its cached
    /// snapshot (barring storage failures, which are logged).
    pub async fn flush_all(&self) {
        self.drain_writes().await;

        let entries: Vec<(PlayerId, CacheEntry)> = self
            .cache
            .read()
            .await
            .iter()
            .map(|(id, entry)| (*id, Arc::clone(entry)))
            .collect();

        let store = PlayerStore::new(self.pool.pool());
        let mut flushed = 0_usize;
        for (id, entry) in entries {
            let record = entry.lock().await.clone();
            match store.save(id, &record).await {
                Ok(()) => flushed = flushed.saturating_add(1),
                Err(e) => {
                    tracing::warn!(player = %id, error = %e, "Failed to flush ledger record");
                }
            }
        }

        // Writes dispatched while the loop ran still need settling.
        self.drain_writes().await;

        tracing::info!(flushed, "Flushed cached ledger records");
    }

    /// Flush everything, then close the connection pool.
    pub async fn shutdown(&self) {
        self.flush_all().await;
        self.pool.close().await;
    }

    /// Resolve the cached entry for `id`, running cache-populate on first
    /// access.
    async fn entry(&self, id: PlayerId) -> CacheEntry {
        if let Some(entry) = self.cache.read().await.get(&id) {
            return Arc::clone(entry);
        }

        let record = self.load_or_create(id).await;

        // A concurrent first access may have populated the entry while we
        // were at the database; whichever insert wins, both callers share
        // the same record from here on.
        let mut cache = self.cache.write().await;
        Arc::clone(
            cache
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(record))),
        )
    }

    /// One storage round trip: load the row, or create a default row for a
    /// never-seen identity. Degrades to a zero-valued record on failure.
    async fn load_or_create(&self, id: PlayerId) -> PlayerLedgerRecord {
        let store = PlayerStore::new(self.pool.pool());
        match store.fetch(id).await {
            Ok(Some(record)) => {
                tracing::debug!(player = %id, "Loaded ledger record");
                record
            }
            Ok(None) => {
                // A concurrent populate racing us may insert first; the
                // primary key decides, and the loser is ignored.
                if let Err(e) = store.insert_default(id).await {
                    tracing::warn!(player = %id, error = %e, "Failed to create ledger row");
                }
                PlayerLedgerRecord::zeroed()
            }
            Err(e) => {
                tracing::warn!(
                    player = %id,
                    error = %e,
                    "Failed to load ledger record, serving zero-valued record"
                );
                PlayerLedgerRecord::zeroed()
            }
        }
    }

    /// Spawn one write-behind task for `snapshot` and track it.
    async fn dispatch_persist(&self, id: PlayerId, snapshot: PlayerLedgerRecord) {
        let pool = self.pool.clone();
        let mut writes = self.writes.lock().await;

        // Reap already-finished tasks so the tracked set stays small under
        // sustained mutation.
        while writes.try_join_next().is_some() {}

        writes.spawn(async move {
            if let Err(e) = PlayerStore::new(pool.pool()).save(id, &snapshot).await {
                tracing::warn!(player = %id, error = %e, "Dropped ledger write");
            }
        });
    }

    /// Await every outstanding write-behind task.
    async fn drain_writes(&self) {
        let mut writes = self.writes.lock().await;
        while writes.join_next().await.is_some() {}
    }
}
