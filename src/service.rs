// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};

use crate::cache::{ContentLengthResolver, FeedCache, FeedKey, KeyedLocks, TokenCache};
use crate::config::Config;
use crate::error::ServiceError;
use crate::feed::render_feed;
use crate::http::HttpClient;
use crate::upstream::{Authenticator, GraphqlTransport, fetch_all_episodes};

/// Top-level request orchestrator.
///
/// Per request: validate the podcast id, resolve an auth token through the
/// token cache, then resolve the feed through the feed cache. The cold
/// path (paginate upstream, render RSS, store) runs single-flighted per
/// (identity, podcast id) so concurrent misses build the document once.
pub struct FeedService {
    username: String,
    password: SecretString,
    page_size: usize,
    feed_ttl: Duration,
    transport: Arc<dyn GraphqlTransport>,
    token_cache: TokenCache,
    feed_cache: FeedCache,
    content_lengths: ContentLengthResolver,
    builds: KeyedLocks<FeedKey>,
}

impl FeedService {
    pub fn new(
        config: &Config,
        transport: Arc<dyn GraphqlTransport>,
        authenticator: Arc<dyn Authenticator>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            username: config.podimo_username.clone(),
            password: config.podimo_password.clone(),
            page_size: config.page_size,
            feed_ttl: Duration::from_secs(config.feed_ttl_secs),
            transport,
            token_cache: TokenCache::new(
                authenticator,
                Duration::from_secs(config.token_ttl_secs),
            ),
            feed_cache: FeedCache::new(),
            content_lengths: ContentLengthResolver::new(http),
            builds: KeyedLocks::new(),
        }
    }

    /// Serve the RSS document for `podcast_id`, from cache when warm
    pub async fn podcast_feed(&self, podcast_id: &str) -> Result<Bytes, ServiceError> {
        if !is_valid_podcast_id(podcast_id) {
            return Err(ServiceError::InvalidPodcastId {
                id: podcast_id.to_string(),
            });
        }

        let (token, identity_key) = self
            .token_cache
            .get_or_authenticate(&self.username, self.password.expose_secret())
            .await?;

        if let Some(document) = self.feed_cache.get(&identity_key, podcast_id) {
            return Ok(document);
        }

        let key = (identity_key.clone(), podcast_id.to_string());
        let _guard = self.builds.acquire(key).await;

        // A concurrent request may have built the feed while we waited.
        if let Some(document) = self.feed_cache.get(&identity_key, podcast_id) {
            return Ok(document);
        }

        let data =
            fetch_all_episodes(self.transport.as_ref(), &token, podcast_id, self.page_size)
                .await?;
        let document = render_feed(&data, &self.content_lengths).await?;

        self.feed_cache
            .put(&identity_key, podcast_id, document.clone(), self.feed_ttl);
        tracing::info!(
            podcast_id,
            episodes = data.episodes.len(),
            bytes = document.len(),
            "rebuilt feed"
        );

        Ok(document)
    }
}

/// Podcast ids are hex digits and hyphens, nothing else
fn is_valid_podcast_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}
