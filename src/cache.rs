//! In-memory result cache for lookups.
//!
//! Keyed by `(normalized postcode, house-number fragment)`. Entries
//! live for the process lifetime: there is no TTL and no eviction, and
//! there is no in-flight coalescing, so two concurrent lookups for the
//! same key can both miss and both call upstream. Known limitations at
//! this request volume; revisit if the cache ever outlives a session.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::normalize::NormalizedProperty;

/// Cache key: normalized postcode plus the raw house-number fragment.
pub type CacheKey = (String, String);

/// Session cache of normalized lookup results, shared by reference
/// across queries. Interior mutability keeps the pipeline functions
/// free to borrow it immutably.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: Mutex<HashMap<CacheKey, NormalizedProperty>>,
}

impl ScheduleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the cached property for this key, if any.
    #[must_use]
    pub fn get(&self, postcode: &str, fragment: &str) -> Option<NormalizedProperty> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(&(postcode.to_string(), fragment.to_string()))
            .cloned()
    }

    /// Stores a lookup result, replacing any previous entry for the key.
    pub fn insert(&self, postcode: String, fragment: String, property: NormalizedProperty) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert((postcode, fragment), property);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
