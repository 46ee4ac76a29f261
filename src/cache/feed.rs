// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use bytes::Bytes;

use super::ttl::TtlCache;

/// Feed cache key: (credential identity key, podcast id)
pub type FeedKey = (String, String);

/// Time-bounded cache of rendered feed documents.
///
/// Pure cache semantics; the orchestrator owns the cold path.
#[derive(Debug, Default)]
pub struct FeedCache {
    entries: TtlCache<FeedKey, Bytes>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self {
            entries: TtlCache::new(),
        }
    }

    pub fn get(&self, identity_key: &str, podcast_id: &str) -> Option<Bytes> {
        self.entries
            .get(&(identity_key.to_string(), podcast_id.to_string()))
    }

    pub fn put(&self, identity_key: &str, podcast_id: &str, document: Bytes, ttl: Duration) {
        self.entries.put(
            (identity_key.to_string(), podcast_id.to_string()),
            document,
            ttl,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_are_keyed_by_identity_and_podcast() {
        let cache = FeedCache::new();
        let ttl = Duration::from_secs(60);

        cache.put("identity-a", "podcast-1", Bytes::from_static(b"<rss/>"), ttl);

        assert_eq!(
            cache.get("identity-a", "podcast-1"),
            Some(Bytes::from_static(b"<rss/>"))
        );
        assert_eq!(cache.get("identity-a", "podcast-2"), None);
        assert_eq!(cache.get("identity-b", "podcast-1"), None);
    }

    #[test]
    fn expired_document_is_absent() {
        let cache = FeedCache::new();
        cache.put("identity", "podcast", Bytes::from_static(b"<rss/>"), Duration::ZERO);
        assert_eq!(cache.get("identity", "podcast"), None);
    }
}
