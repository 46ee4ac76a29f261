// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AuthError, TransportError};

use super::transport::GraphqlTransport;

const LOGIN_QUERY: &str = r#"
query web_logInUser($email: String!, $password: String!) {
    tokenWithCredentials(
        email: $email,
        password: $password
    ) {
        token
    }
}
"#;

/// Upstream login collaborator
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange a credential pair for an opaque bearer token
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    token_with_credentials: TokenPayload,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    token: String,
}

/// Authenticator backed by the Podimo GraphQL login mutation
pub struct GraphqlAuthenticator {
    transport: Arc<dyn GraphqlTransport>,
}

impl GraphqlAuthenticator {
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Authenticator for GraphqlAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let variables = json!({
            "email": username,
            "password": password,
        });

        let data = self
            .transport
            .execute(LOGIN_QUERY, variables, None)
            .await
            .map_err(|source| AuthError::UpstreamAuthFailure { source })?;

        let login: LoginData = serde_json::from_value(data).map_err(|e| {
            AuthError::UpstreamAuthFailure {
                source: TransportError::Decode {
                    detail: e.to_string(),
                },
            }
        })?;

        Ok(login.token_with_credentials.token)
    }
}
