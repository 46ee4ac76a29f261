// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

const HLS_PATH_SEGMENT: &str = "hls-media";
const HLS_MANIFEST_SUFFIX: &str = "/main.m3u8";
const DIRECT_PATH_SEGMENT: &str = "audios";
const DIRECT_FILE_SUFFIX: &str = ".mp3";

/// Rewrite an HLS streaming-manifest URL to its direct-file equivalent.
///
/// Podimo's newer URL layout points at an HLS manifest
/// (`.../hls-media/<id>/main.m3u8`), but podcast clients expect a plain
/// downloadable enclosure. The same media is available at
/// `.../audios/<id>.mp3`. URLs missing either marker are left untouched.
pub fn rewrite_stream_url(url: &str) -> String {
    if url.contains(HLS_PATH_SEGMENT) && url.contains(HLS_MANIFEST_SUFFIX) {
        url.replace(HLS_PATH_SEGMENT, DIRECT_PATH_SEGMENT)
            .replace(HLS_MANIFEST_SUFFIX, DIRECT_FILE_SUFFIX)
    } else {
        url.to_string()
    }
}

/// MIME type for an enclosure, derived from the URL path's file extension
pub fn mime_type_for_url(url: &Url) -> &'static str {
    let extension = url
        .path()
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m3u8" => "application/vnd.apple.mpegurl",
        _ => "audio/mpeg",
    }
}
