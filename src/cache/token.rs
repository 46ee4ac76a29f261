// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use std::time::Duration;

use crate::error::AuthError;
use crate::identity::credential_key;
use crate::upstream::Authenticator;

use super::singleflight::KeyedLocks;
use super::ttl::TtlCache;

/// Time-bounded cache of auth tokens keyed by credential identity.
///
/// Owns the upstream login collaborator: a cache miss (or an expired
/// entry) triggers exactly one login per identity key, serialized through
/// a per-key lock so a stampede of cold requests cannot log in twice.
pub struct TokenCache {
    authenticator: Arc<dyn Authenticator>,
    entries: TtlCache<String, String>,
    locks: KeyedLocks<String>,
    ttl: Duration,
}

impl TokenCache {
    pub fn new(authenticator: Arc<dyn Authenticator>, ttl: Duration) -> Self {
        Self {
            authenticator,
            entries: TtlCache::new(),
            locks: KeyedLocks::new(),
            ttl,
        }
    }

    /// Return a valid token for the credential pair, along with the
    /// identity key it is cached under.
    ///
    /// The username must contain an `@`; credentials are operator
    /// configuration, so anything else is a misconfiguration, not user
    /// input to be lenient about. Login failures propagate without retry:
    /// nothing is cached, so the next request retries naturally.
    pub async fn get_or_authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, String), AuthError> {
        if !username.contains('@') {
            return Err(AuthError::InvalidCredentialFormat {
                username: username.to_string(),
            });
        }

        let key = credential_key(username, password);

        if let Some(token) = self.entries.get(&key) {
            return Ok((token, key));
        }

        let _guard = self.locks.acquire(key.clone()).await;

        // Another request may have logged in while we waited.
        if let Some(token) = self.entries.get(&key) {
            return Ok((token, key));
        }

        let token = self.authenticator.authenticate(username, password).await?;
        self.entries.put(key.clone(), token.clone(), self.ttl);
        tracing::debug!(identity = %key, "cached fresh auth token");

        Ok((token, key))
    }
}
