// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::json;

use crate::error::{FetchError, TransportError};

use super::transport::GraphqlTransport;

const EPISODES_QUERY: &str = r#"
query ChannelEpisodesQuery($podcastId: String!, $limit: Int!, $offset: Int!, $sorting: PodcastEpisodeSorting) {
  episodes: podcastEpisodes(
    podcastId: $podcastId
    converted: true
    published: true
    limit: $limit
    offset: $offset
    sorting: $sorting
  ) {
    ...EpisodeBase
  }
  podcast: podcastById(podcastId: $podcastId) {
    title
    description
    webAddress
    authorName
    language
    images {
      coverImageUrl
    }
  }
}

fragment EpisodeBase on PodcastEpisode {
  description
  datetime
  title
  streamMedia {
    duration
    url
  }
}
"#;

/// Channel-level podcast metadata, passed through to the feed verbatim
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastInfo {
    pub title: String,
    pub description: String,
    pub web_address: String,
    pub author_name: String,
    pub language: String,
    pub images: PodcastImages,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastImages {
    pub cover_image_url: String,
}

/// A single published episode as reported by the upstream API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    pub title: String,
    pub description: String,
    pub datetime: DateTime<FixedOffset>,
    pub stream_media: StreamMedia,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMedia {
    /// Episode length in seconds
    pub duration: f64,
    pub url: String,
}

/// One page of the episodes query
#[derive(Debug, Deserialize)]
struct EpisodePage {
    episodes: Vec<EpisodeRecord>,
    podcast: PodcastInfo,
}

/// Everything needed to render one podcast's feed
#[derive(Debug, Clone)]
pub struct PodcastData {
    pub podcast_info: PodcastInfo,
    pub episodes: Vec<EpisodeRecord>,
}

/// Fetch the complete episode list for a podcast.
///
/// Pages of `page_size` episodes are requested at increasing offsets until
/// the upstream returns a short page. Upstream orders episodes newest-first
/// and that order is preserved. Every page repeats the same podcast
/// metadata; the last page's copy wins, which is harmless.
///
/// A podcast with an exact multiple of `page_size` episodes costs one extra
/// request that returns an empty page.
pub async fn fetch_all_episodes(
    transport: &dyn GraphqlTransport,
    token: &str,
    podcast_id: &str,
    page_size: usize,
) -> Result<PodcastData, FetchError> {
    let mut episodes = Vec::new();
    let mut offset = 0usize;

    loop {
        let variables = json!({
            "podcastId": podcast_id,
            "limit": page_size,
            "offset": offset,
            "sorting": "PUBLISHED_DESCENDING",
        });

        let data = transport
            .execute(EPISODES_QUERY, variables, Some(token))
            .await
            .map_err(|source| match source {
                // The upstream reports an unknown podcast id as a query
                // error rather than a dedicated status.
                TransportError::Query { message } => FetchError::PodcastNotFound {
                    podcast_id: podcast_id.to_string(),
                    message,
                },
                other => FetchError::UpstreamFetchFailure {
                    podcast_id: podcast_id.to_string(),
                    source: other,
                },
            })?;

        let page: EpisodePage = serde_json::from_value(data)?;

        let page_len = page.episodes.len();
        episodes.extend(page.episodes);

        // A short page (including an empty one) signals the last page.
        if page_len < page_size {
            return Ok(PodcastData {
                podcast_info: page.podcast,
                episodes,
            });
        }

        offset += page_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;

    fn episode_json(index: usize) -> Value {
        json!({
            "title": format!("Episode {index}"),
            "description": format!("Description {index}"),
            "datetime": "2024-01-15T12:00:00+00:00",
            "streamMedia": {
                "duration": 1800.0,
                "url": format!("https://cdn.example.com/audios/{index}.mp3"),
            },
        })
    }

    fn page_json(episode_count: usize) -> Value {
        json!({
            "episodes": (0..episode_count).map(episode_json).collect::<Vec<_>>(),
            "podcast": {
                "title": "Test Podcast",
                "description": "A test podcast",
                "webAddress": "https://example.com",
                "authorName": "Test Author",
                "language": "en",
                "images": {"coverImageUrl": "https://example.com/cover.jpg"},
            },
        })
    }

    struct PagedTransport {
        pages: Mutex<VecDeque<Value>>,
        calls: AtomicUsize,
        offsets: Mutex<Vec<u64>>,
    }

    impl PagedTransport {
        fn new(page_sizes: &[usize]) -> Self {
            Self {
                pages: Mutex::new(page_sizes.iter().map(|&n| page_json(n)).collect()),
                calls: AtomicUsize::new(0),
                offsets: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GraphqlTransport for PagedTransport {
        async fn execute(
            &self,
            _query: &str,
            variables: Value,
            auth_token: Option<&str>,
        ) -> Result<Value, TransportError> {
            assert_eq!(auth_token, Some("token"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.offsets
                .lock()
                .unwrap()
                .push(variables["offset"].as_u64().unwrap());

            let page = self.pages.lock().unwrap().pop_front();
            Ok(page.unwrap_or_else(|| page_json(0)))
        }
    }

    struct FailingTransport {
        error: fn() -> TransportError,
    }

    #[async_trait]
    impl GraphqlTransport for FailingTransport {
        async fn execute(
            &self,
            _query: &str,
            _variables: Value,
            _auth_token: Option<&str>,
        ) -> Result<Value, TransportError> {
            Err((self.error)())
        }
    }

    #[tokio::test]
    async fn pagination_stops_on_short_page() {
        let transport = PagedTransport::new(&[100, 100, 37]);

        let data = fetch_all_episodes(&transport, "token", "abc-123", 100)
            .await
            .unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        assert_eq!(data.episodes.len(), 237);
        assert_eq!(data.podcast_info.title, "Test Podcast");
        assert_eq!(*transport.offsets.lock().unwrap(), vec![0, 100, 200]);
    }

    #[tokio::test]
    async fn exact_multiple_costs_one_extra_empty_page() {
        let transport = PagedTransport::new(&[100, 100, 100, 0]);

        let data = fetch_all_episodes(&transport, "token", "abc-123", 100)
            .await
            .unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
        assert_eq!(data.episodes.len(), 300);
    }

    #[tokio::test]
    async fn empty_podcast_needs_a_single_request() {
        let transport = PagedTransport::new(&[0]);

        let data = fetch_all_episodes(&transport, "token", "abc-123", 100)
            .await
            .unwrap();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(data.episodes.is_empty());
    }

    #[tokio::test]
    async fn episode_order_is_preserved() {
        let transport = PagedTransport::new(&[2, 1]);

        let data = fetch_all_episodes(&transport, "token", "abc-123", 2)
            .await
            .unwrap();

        let titles: Vec<_> = data.episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Episode 0", "Episode 1", "Episode 0"]);
    }

    #[tokio::test]
    async fn query_error_maps_to_podcast_not_found() {
        let transport = FailingTransport {
            error: || TransportError::Query {
                message: "unknown podcast".to_string(),
            },
        };

        let result = fetch_all_episodes(&transport, "token", "abc-123", 100).await;

        assert!(matches!(
            result,
            Err(FetchError::PodcastNotFound { podcast_id, .. }) if podcast_id == "abc-123"
        ));
    }

    #[tokio::test]
    async fn decode_error_maps_to_fetch_failure() {
        let transport = FailingTransport {
            error: || TransportError::Decode {
                detail: "garbage".to_string(),
            },
        };

        let result = fetch_all_episodes(&transport, "token", "abc-123", 100).await;

        assert!(matches!(
            result,
            Err(FetchError::UpstreamFetchFailure { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_page_is_rejected() {
        struct GarbageTransport;

        #[async_trait]
        impl GraphqlTransport for GarbageTransport {
            async fn execute(
                &self,
                _query: &str,
                _variables: Value,
                _auth_token: Option<&str>,
            ) -> Result<Value, TransportError> {
                // Episode missing its streamMedia entirely
                Ok(json!({
                    "episodes": [{"title": "Broken", "description": "x", "datetime": "2024-01-15T12:00:00+00:00"}],
                    "podcast": page_json(0)["podcast"].clone(),
                }))
            }
        }

        let result = fetch_all_episodes(&GarbageTransport, "token", "abc-123", 100).await;
        assert!(matches!(
            result,
            Err(FetchError::MalformedUpstreamData(_))
        ));
    }
}
