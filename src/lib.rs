pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod identity;
pub mod server;
pub mod service;
pub mod upstream;

// Re-export main types for convenience
pub use cache::{ContentLengthResolver, FeedCache, KeyedLocks, TokenCache, TtlCache};
pub use config::Config;
pub use error::{AuthError, BuildError, FetchError, ServiceError, TransportError};
pub use feed::{mime_type_for_url, render_feed, rewrite_stream_url};
pub use http::{HttpClient, ReqwestClient};
pub use identity::credential_key;
pub use server::{AppState, create_router};
pub use service::FeedService;
pub use upstream::{
    Authenticator, EpisodeRecord, GraphqlAuthenticator, GraphqlTransport, PodcastData,
    PodcastInfo, ReqwestTransport, fetch_all_episodes,
};
