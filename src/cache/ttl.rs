// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A cached value together with its expiry deadline
#[derive(Debug, Clone)]
struct TtlEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Mutex-protected map of expiring entries.
///
/// An entry is either present and fresh or treated as absent; there is no
/// stale-but-served state. Expiry is a strict `now >= expires_at`
/// comparison, and expired entries are removed on access.
#[derive(Debug, Default)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, TtlEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value for `key` if it exists and has not expired
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or overwrite the entry for `key`, fresh for `ttl`
    pub fn put(&self, key: K, value: V, ttl: Duration) {
        let entry = TtlEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().unwrap().insert(key, entry);
    }

    /// Drop the entry for `key`, forcing a fresh fetch on next access
    pub fn invalidate(&self, key: &K) {
        self.entries.lock().unwrap().remove(key);
    }
}
