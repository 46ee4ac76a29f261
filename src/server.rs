use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{FetchError, ServiceError};
use crate::service::FeedService;

/// Shared state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FeedService>,
}

/// Build the application router: a single feed endpoint plus request
/// tracing and permissive CORS, mirroring the service's public surface.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/podcast/{podcast_file}", get(podcast_feed_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /podcast/{podcast_id}.xml`
///
/// Route parameters match whole path segments, so the handler strips the
/// mandatory `.xml` suffix itself.
async fn podcast_feed_handler(
    State(state): State<AppState>,
    Path(podcast_file): Path<String>,
) -> Response {
    let Some(podcast_id) = podcast_file.strip_suffix(".xml") else {
        return (
            StatusCode::BAD_REQUEST,
            "Expected a path of the form /podcast/{id}.xml.",
        )
            .into_response();
    };

    match state.service.podcast_feed(podcast_id).await {
        Ok(document) => ([(header::CONTENT_TYPE, "text/xml")], document).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Map service failures onto the external status taxonomy.
///
/// Clients get a short human-readable detail string; source chains and
/// upstream payloads stay in the log.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ServiceError::InvalidPodcastId { id } => (
                StatusCode::BAD_REQUEST,
                format!("Invalid podcast id format: '{id}'."),
            ),
            ServiceError::Fetch(FetchError::PodcastNotFound { podcast_id, .. }) => (
                StatusCode::NOT_FOUND,
                format!("Podcast {podcast_id} was not found."),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not produce the podcast feed.".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = ?self, status = %status, "request rejected");
        }

        (status, detail).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::{AuthError, BuildError, TransportError};

    #[test]
    fn invalid_id_maps_to_bad_request() {
        let response = ServiceError::InvalidPodcastId {
            id: "nope".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_podcast_maps_to_not_found() {
        let response = ServiceError::Fetch(FetchError::PodcastNotFound {
            podcast_id: "abc".to_string(),
            message: "unknown".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_failures_map_to_server_errors() {
        let auth = ServiceError::Auth(AuthError::UpstreamAuthFailure {
            source: TransportError::Decode {
                detail: "bad".to_string(),
            },
        })
        .into_response();
        assert_eq!(auth.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid_credentials = ServiceError::Auth(AuthError::InvalidCredentialFormat {
            username: "nope".to_string(),
        })
        .into_response();
        assert_eq!(
            invalid_credentials.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let build = ServiceError::Build(BuildError::ContentLengthUnavailable {
            url: "https://example.com/a.mp3".to_string(),
            source: None,
        })
        .into_response();
        assert_eq!(build.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
