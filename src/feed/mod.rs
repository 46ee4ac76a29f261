mod build;
mod media;

pub use build::render_feed;
pub use media::{mime_type_for_url, rewrite_stream_url};
