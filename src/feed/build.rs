// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;
use rss::extension::itunes::{ITunesChannelExtensionBuilder, ITunesItemExtensionBuilder};
use rss::{ChannelBuilder, EnclosureBuilder, ImageBuilder, ItemBuilder};
use url::Url;

use crate::cache::ContentLengthResolver;
use crate::error::BuildError;
use crate::upstream::PodcastData;

use super::media::{mime_type_for_url, rewrite_stream_url};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Render podcast data as an RSS 2.0 document with iTunes extensions.
///
/// Episodes are emitted in upstream order. Every enclosure carries a
/// concrete byte length resolved through `lengths`; a single unresolvable
/// episode aborts the whole build, since a feed with a lengthless
/// enclosure breaks podcast clients.
pub async fn render_feed(
    data: &PodcastData,
    lengths: &ContentLengthResolver,
) -> Result<Bytes, BuildError> {
    let podcast = &data.podcast_info;

    let mut items = Vec::with_capacity(data.episodes.len());
    for episode in &data.episodes {
        let rewritten = rewrite_stream_url(&episode.stream_media.url);
        let url = Url::parse(&rewritten).map_err(|_| BuildError::MalformedUpstreamData {
            title: episode.title.clone(),
            field: "streamMedia.url",
        })?;

        let length = lengths.length_of(url.as_str()).await?;

        let enclosure = EnclosureBuilder::default()
            .url(url.to_string())
            .length(length.to_string())
            .mime_type(mime_type_for_url(&url).to_string())
            .build();

        let itunes = ITunesItemExtensionBuilder::default()
            .duration(format_duration(episode.stream_media.duration))
            .build();

        items.push(
            ItemBuilder::default()
                .title(episode.title.clone())
                .description(episode.description.clone())
                .pub_date(episode.datetime.to_rfc2822())
                .enclosure(enclosure)
                .itunes_ext(itunes)
                .build(),
        );
    }

    let image = ImageBuilder::default()
        .url(podcast.images.cover_image_url.clone())
        .title(podcast.title.clone())
        .link(podcast.web_address.clone())
        .build();

    let itunes_channel = ITunesChannelExtensionBuilder::default()
        .author(podcast.author_name.clone())
        .image(podcast.images.cover_image_url.clone())
        .build();

    let channel = ChannelBuilder::default()
        .title(podcast.title.clone())
        .description(podcast.description.clone())
        .link(podcast.web_address.clone())
        .language(podcast.language.clone())
        .image(image)
        .itunes_ext(itunes_channel)
        .items(items)
        .build();

    let mut document = String::from(XML_DECLARATION);
    document.push_str(&channel.to_string());

    Ok(Bytes::from(document))
}

/// iTunes duration as whole seconds
fn format_duration(seconds: f64) -> String {
    format!("{}", seconds.round() as u64)
}
