// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::TransportError;
use crate::http::{MAX_ATTEMPTS, REQUEST_TIMEOUT};

/// GraphQL-over-HTTPS transport abstraction for testability.
///
/// Implementations must keep the two upstream failure classes apart:
/// a query-level error (the server answered and said no) surfaces as
/// [`TransportError::Query`], a network-level failure as
/// [`TransportError::Http`].
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Execute a query with variables, optionally authenticated, and
    /// return the response's `data` object.
    async fn execute(
        &self,
        query: &str,
        variables: Value,
        auth_token: Option<&str>,
    ) -> Result<Value, TransportError>;
}

/// Wire shape of a GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Default transport implementation using reqwest.
///
/// Transient network failures are retried up to [`MAX_ATTEMPTS`] times.
/// Query errors are returned immediately: the server has already made up
/// its mind and asking again will not change the answer.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GraphqlTransport for ReqwestTransport {
    async fn execute(
        &self,
        query: &str,
        variables: Value,
        auth_token: Option<&str>,
    ) -> Result<Value, TransportError> {
        let body = json!({
            "query": query,
            "variables": variables,
        });

        let mut attempt = 0;
        let envelope: GraphqlEnvelope = loop {
            attempt += 1;

            let mut request = self
                .client
                .post(&self.endpoint)
                .timeout(REQUEST_TIMEOUT)
                .json(&body);

            if let Some(token) = auth_token {
                request = request.header("authorization", token);
            }

            let result = match request.send().await {
                Ok(response) => match response.error_for_status() {
                    Ok(response) => response.json().await,
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };

            match result {
                Ok(envelope) => break envelope,
                Err(e) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(
                        endpoint = %self.endpoint,
                        attempt,
                        error = %e,
                        "GraphQL request failed, retrying"
                    );
                }
                Err(e) => {
                    return Err(TransportError::Http {
                        url: self.endpoint.clone(),
                        source: e,
                    });
                }
            }
        };

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .into_iter()
                .map(|entry| entry.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TransportError::Query { message });
        }

        envelope.data.ok_or_else(|| TransportError::Decode {
            detail: "response contained neither data nor errors".to_string(),
        })
    }
}
