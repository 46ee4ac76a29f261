mod content_length;
mod feed;
mod singleflight;
mod token;
mod ttl;

pub use content_length::ContentLengthResolver;
pub use feed::{FeedCache, FeedKey};
pub use singleflight::KeyedLocks;
pub use token::TokenCache;
pub use ttl::TtlCache;
