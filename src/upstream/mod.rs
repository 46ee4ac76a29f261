mod auth;
mod episodes;
mod transport;

pub use auth::{Authenticator, GraphqlAuthenticator};
pub use episodes::{
    EpisodeRecord, PodcastData, PodcastImages, PodcastInfo, StreamMedia, fetch_all_episodes,
};
pub use transport::{GraphqlTransport, ReqwestTransport};
