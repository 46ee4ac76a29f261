// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use async_trait::async_trait;

/// Timeout applied to every outbound request
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per request before a transient failure is surfaced
pub(crate) const MAX_ATTEMPTS: usize = 3;

/// HTTP client abstraction for testability
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a HEAD request and return the Content-Length header value,
    /// if the server reports one.
    async fn content_length(&self, url: &str) -> Result<Option<u64>, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest.
///
/// Transient network failures are retried up to [`MAX_ATTEMPTS`] times;
/// anything beyond that is the caller's problem.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestClient with a custom reqwest::Client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn content_length(&self, url: &str) -> Result<Option<u64>, reqwest::Error> {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let result = self
                .client
                .head(url)
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            match result {
                // HEAD responses carry no body, so the header itself is
                // authoritative rather than reqwest's body size hint.
                Ok(response) => {
                    return Ok(response
                        .headers()
                        .get(reqwest::header::CONTENT_LENGTH)
                        .and_then(|value| value.to_str().ok())
                        .and_then(|value| value.parse().ok()));
                }
                Err(e) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(url, attempt, error = %e, "HEAD request failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reqwest_client_can_be_created() {
        let _client = ReqwestClient::new();
        let _client_default = ReqwestClient::default();
    }

    #[test]
    fn reqwest_client_can_be_cloned() {
        let client = ReqwestClient::new();
        let _cloned = client.clone();
    }
}
