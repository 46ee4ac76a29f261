use thiserror::Error;

/// Errors raised by the GraphQL transport.
///
/// A `Query` error means the upstream server answered but rejected the
/// query itself; it is never retried. `Http` covers network and protocol
/// failures on the way to the server.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Upstream returned a query error: {message}")]
    Query { message: String },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not decode upstream response: {detail}")]
    Decode { detail: String },
}

/// Errors that can occur while resolving an auth token
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configured username '{username}' does not look like an e-mail address")]
    InvalidCredentialFormat { username: String },

    #[error("Upstream login failed: {source}")]
    UpstreamAuthFailure {
        #[source]
        source: TransportError,
    },
}

/// Errors that can occur while paginating episode data
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Podcast {podcast_id} was not found upstream: {message}")]
    PodcastNotFound { podcast_id: String, message: String },

    #[error("Failed to fetch episodes for podcast {podcast_id}: {source}")]
    UpstreamFetchFailure {
        podcast_id: String,
        #[source]
        source: TransportError,
    },

    #[error("Upstream returned malformed podcast data: {0}")]
    MalformedUpstreamData(#[from] serde_json::Error),
}

/// Errors that can occur while rendering the RSS document
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Episode '{title}' has a malformed {field}")]
    MalformedUpstreamData { title: String, field: &'static str },

    #[error("Could not determine content length for {url}")]
    ContentLengthUnavailable {
        url: String,
        #[source]
        source: Option<reqwest::Error>,
    },
}

/// Top-level errors for serving a podcast feed
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid podcast id format: '{id}'")]
    InvalidPodcastId { id: String },

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Feed build error: {0}")]
    Build(#[from] BuildError),
}
