// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use sha2::{Digest, Sha256};

/// Separator between username and password in the hash input
const SEPARATOR: u8 = b'~';

/// Derive a stable identity key from a credential pair.
///
/// The key is the lower-hex SHA-256 digest of `username ~ password` and is
/// used as a cache key so the raw password is never stored anywhere.
pub fn credential_key(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update([SEPARATOR]);
    hasher.update(password.as_bytes());

    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
