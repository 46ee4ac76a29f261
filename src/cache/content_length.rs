// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::BuildError;
use crate::http::HttpClient;

use super::singleflight::KeyedLocks;

/// Memoized media content lengths.
///
/// Entries never expire: once an episode is published its media file is
/// assumed immutable, so one HEAD request per URL suffices for the whole
/// process lifetime.
pub struct ContentLengthResolver {
    http: Arc<dyn HttpClient>,
    entries: Mutex<HashMap<String, u64>>,
    locks: KeyedLocks<String>,
}

impl ContentLengthResolver {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            entries: Mutex::new(HashMap::new()),
            locks: KeyedLocks::new(),
        }
    }

    /// Byte length of the media at `url`.
    ///
    /// RSS players require an enclosure length, so a missing header or a
    /// failed HEAD request is fatal for the surrounding feed build.
    pub async fn length_of(&self, url: &str) -> Result<u64, BuildError> {
        if let Some(length) = self.entries.lock().unwrap().get(url).copied() {
            return Ok(length);
        }

        let _guard = self.locks.acquire(url.to_string()).await;

        if let Some(length) = self.entries.lock().unwrap().get(url).copied() {
            return Ok(length);
        }

        let length = self
            .http
            .content_length(url)
            .await
            .map_err(|source| BuildError::ContentLengthUnavailable {
                url: url.to_string(),
                source: Some(source),
            })?
            .ok_or_else(|| BuildError::ContentLengthUnavailable {
                url: url.to_string(),
                source: None,
            })?;

        self.entries
            .lock()
            .unwrap()
            .insert(url.to_string(), length);

        Ok(length)
    }
}
