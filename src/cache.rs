//! Memoization of read queries, keyed by the content they were computed from.
//!
//! The cache never invalidates: a key captures every row of the table and the
//! condition set, so any change to the data produces a different key. Entries
//! live for the life of the cache; growth is unbounded.

use std::collections::HashMap;

use allocative::Allocative;
use tracing::debug;

use crate::row::{Conditions, Row, sorted_pairs};
use crate::value::Value;

/// Kind of read operation a fingerprint was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Allocative)]
pub enum QueryKind {
    Select,
}

/// Deterministic, content-derived identity of a query.
///
/// Two fingerprints are equal exactly when the operation, the multiset of
/// rows (each compared key by key) and the condition set are equal. Row order
/// in storage does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Allocative)]
pub struct Fingerprint {
    kind: QueryKind,
    row_count: usize,
    /// Per-row pairs sorted by column, then the rows themselves sorted.
    rows: Vec<Vec<(String, Value)>>,
    /// `None` is the "no condition" sentinel, distinct from an empty set.
    conditions: Option<Conditions>,
}

impl Fingerprint {
    pub fn select(rows: &[Row], conditions: Option<&Conditions>) -> Self {
        let mut sorted: Vec<_> = rows.iter().map(sorted_pairs).collect();
        sorted.sort_unstable();
        Self {
            kind: QueryKind::Select,
            row_count: rows.len(),
            rows: sorted,
            conditions: conditions.cloned(),
        }
    }
}

/// Counters describing how the cache has been used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Heap bytes owned by the cache (keys and cached results).
    pub allocated_bytes: usize,
}

/// Process-lifetime query result cache.
#[derive(Debug, Default, Allocative)]
pub struct QueryCache {
    entries: HashMap<Fingerprint, Vec<Row>>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `key`, computing and storing it on a miss.
    ///
    /// The returned rows are a copy; callers may mutate them freely.
    pub fn get_or_compute<F>(&mut self, key: Fingerprint, compute: F) -> Vec<Row>
    where
        F: FnOnce() -> Vec<Row>,
    {
        if let Some(rows) = self.entries.get(&key) {
            self.hits += 1;
            debug!(rows = rows.len(), "query cache hit");
            return rows.clone();
        }

        self.misses += 1;
        let rows = compute();
        debug!(rows = rows.len(), "query cache miss");
        self.entries.insert(key, rows.clone());
        rows
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            allocated_bytes: allocative::size_of_unique_allocated_data(self),
        }
    }
}
