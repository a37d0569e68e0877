//! Fingerprint-keyed result caching
//!
//! Two namespaces exist: single quotes (age + sex + premium + term) and
//! collections (age + sex + premium). Keys are the canonical parameter
//! encoding itself, so distinct inputs can never collide and the two
//! namespaces stay disjoint through their literal prefixes.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use crate::quote::{CollectionParams, CollectionResult, Quote, QuoteParams};

/// Fingerprint for the single-quote namespace
pub fn quote_fingerprint(params: &QuoteParams) -> String {
    format!(
        "quote:{}:{}:{}:{}",
        params.actuarial_age,
        params.sex.as_str(),
        params.monthly_premium,
        params.payment_term_years
    )
}

/// Fingerprint for the collection namespace
pub fn collection_fingerprint(params: &CollectionParams) -> String {
    format!(
        "collection:{}:{}:{}",
        params.actuarial_age,
        params.sex.as_str(),
        params.monthly_premium
    )
}

/// Unbounded last-writer-wins cache keyed by parameter fingerprints
///
/// No TTL and no eviction: configuration changes are the only reason to
/// invalidate, they are rare and externally triggered, so entries live
/// until an explicit clear or process exit.
#[derive(Debug)]
pub struct FingerprintCache<T> {
    entries: HashMap<String, T>,

    /// Statistics
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl<T: Clone> FingerprintCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    /// Look up a previously stored result, updating hit/miss counters
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(value) => {
                self.cache_hits += 1;
                Some(value.clone())
            }
            None => {
                self.cache_misses += 1;
                None
            }
        }
    }

    /// Store a result; an existing entry for the key is overwritten
    pub fn put(&mut self, key: String, value: T) {
        self.entries.insert(key, value);
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Get number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

impl<T: Clone> Default for FingerprintCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry counts per cache namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub quotes: usize,
    pub collections: usize,
}

/// Both cache namespaces, shared between the services
///
/// Each namespace is serialized behind its own lock; critical sections are
/// O(1) map operations.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    pub quotes: Mutex<FingerprintCache<Quote>>,
    pub collections: Mutex<FingerprintCache<CollectionResult>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry counts for both namespaces
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            quotes: self.quotes.lock().unwrap().len(),
            collections: self.collections.lock().unwrap().len(),
        }
    }

    /// Clear the collection namespace only, returning the removed count
    pub fn clear_collections(&self) -> usize {
        self.collections.lock().unwrap().clear()
    }
}
