//! Process-wide store of shared metadata.
//!
//! Holds three get-or-create maps: canonical descriptors by record symbol
//! and trailing flags, value witness tables by symbol, and
//! runtime-canonicalized descriptors by caching token. Each map is sharded;
//! a lookup takes the shard's read lock and a miss takes the write lock and
//! re-checks before inserting, so concurrent requests for one key converge on
//! a single `Arc`.

use std::hash::BuildHasher;
use std::sync::{Arc, OnceLock};

use kiln_types::TargetInfo;
use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::{MetadataDescriptor, TrailingFlags, ValueWitnessTable};

const NUM_SHARDS: usize = 16;

/// Layout depends on the target, so every key carries it.
///
/// Canonical records also carry their trailing flags: the owning module and
/// its clients emit different records for one instantiation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    symbol: String,
    target: TargetInfo,
    flags: TrailingFlags,
}

struct ShardedMap<V> {
    shards: [RwLock<FxHashMap<CacheKey, Arc<V>>>; NUM_SHARDS],
}

impl<V> ShardedMap<V> {
    fn new() -> Self {
        ShardedMap {
            shards: std::array::from_fn(|_| RwLock::new(FxHashMap::default())),
        }
    }

    fn shard(&self, key: &CacheKey) -> &RwLock<FxHashMap<CacheKey, Arc<V>>> {
        let hash = FxBuildHasher.hash_one(key);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "only the low bits select a shard"
        )]
        let index = (hash as usize) % NUM_SHARDS;
        &self.shards[index]
    }

    fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.shard(key).read().get(key).cloned()
    }

    /// Returns the stored value and whether this call inserted it.
    fn get_or_insert_with(&self, key: CacheKey, make: impl FnOnce() -> Arc<V>) -> (Arc<V>, bool) {
        let shard = self.shard(&key);
        if let Some(hit) = shard.read().get(&key) {
            return (Arc::clone(hit), false);
        }

        let mut guard = shard.write();
        // Another writer may have inserted between the two locks.
        if let Some(hit) = guard.get(&key) {
            return (Arc::clone(hit), false);
        }
        let value = make();
        guard.insert(key, Arc::clone(&value));
        (value, true)
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }
}

/// Shared metadata for one program.
///
/// Keys are mangled symbols, so every table planned against one cache must
/// describe the same program.
pub struct CanonicalCache {
    canonical: ShardedMap<MetadataDescriptor>,
    witnesses: ShardedMap<ValueWitnessTable>,
    resolved: ShardedMap<MetadataDescriptor>,
}

impl CanonicalCache {
    pub fn new() -> Self {
        CanonicalCache {
            canonical: ShardedMap::new(),
            witnesses: ShardedMap::new(),
            resolved: ShardedMap::new(),
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static CanonicalCache {
        static GLOBAL: OnceLock<CanonicalCache> = OnceLock::new();
        GLOBAL.get_or_init(CanonicalCache::new)
    }

    /// Canonical descriptor for a record symbol with `flags`, if one was
    /// planned.
    pub fn canonical(
        &self,
        symbol: &str,
        target: TargetInfo,
        flags: TrailingFlags,
    ) -> Option<Arc<MetadataDescriptor>> {
        self.canonical.get(&record_key(symbol, target, flags))
    }

    /// Get the canonical descriptor for `symbol` with `flags`, building it on
    /// first request.
    pub fn intern_canonical(
        &self,
        symbol: &str,
        target: TargetInfo,
        flags: TrailingFlags,
        build: impl FnOnce() -> MetadataDescriptor,
    ) -> Arc<MetadataDescriptor> {
        let (descriptor, inserted) = self
            .canonical
            .get_or_insert_with(record_key(symbol, target, flags), || Arc::new(build()));
        tracing::trace!(symbol, flags = flags.bits(), inserted, "canonical descriptor");
        descriptor
    }

    /// Get the witness table for `symbol`, building it on first request.
    pub fn intern_witnesses(
        &self,
        symbol: &str,
        target: TargetInfo,
        build: impl FnOnce() -> ValueWitnessTable,
    ) -> Arc<ValueWitnessTable> {
        self.witnesses
            .get_or_insert_with(key(symbol, target), || Arc::new(build()))
            .0
    }

    /// Memoize a runtime canonicalization: the first descriptor registered
    /// for a caching token wins.
    pub fn resolve_token(
        &self,
        token: &str,
        target: TargetInfo,
        candidate: impl FnOnce() -> Arc<MetadataDescriptor>,
    ) -> Arc<MetadataDescriptor> {
        let (descriptor, inserted) = self
            .resolved
            .get_or_insert_with(key(token, target), candidate);
        tracing::trace!(token, inserted, "runtime canonicalization");
        descriptor
    }

    /// Number of canonical descriptors.
    pub fn canonical_len(&self) -> usize {
        self.canonical.len()
    }

    /// Number of distinct witness tables.
    pub fn witness_len(&self) -> usize {
        self.witnesses.len()
    }

    /// Number of runtime-canonicalized instantiations.
    pub fn resolved_len(&self) -> usize {
        self.resolved.len()
    }
}

impl Default for CanonicalCache {
    fn default() -> Self {
        Self::new()
    }
}

fn key(symbol: &str, target: TargetInfo) -> CacheKey {
    record_key(symbol, target, TrailingFlags::empty())
}

fn record_key(symbol: &str, target: TargetInfo, flags: TrailingFlags) -> CacheKey {
    CacheKey {
        symbol: symbol.to_owned(),
        target,
        flags,
    }
}
