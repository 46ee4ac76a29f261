use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing_subscriber::EnvFilter;

use podimo_rss::{
    AppState, Authenticator, Config, FeedService, GraphqlAuthenticator, GraphqlTransport,
    HttpClient, ReqwestClient, ReqwestTransport, create_router,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.rust_log))
        .init();

    let transport: Arc<dyn GraphqlTransport> =
        Arc::new(ReqwestTransport::new(&config.graphql_url));
    let authenticator: Arc<dyn Authenticator> =
        Arc::new(GraphqlAuthenticator::new(transport.clone()));
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new());

    let service = Arc::new(FeedService::new(&config, transport, authenticator, http));
    let app = create_router(AppState { service });

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("Invalid listen address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "serving podcast feeds");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// Resolve when the process is asked to stop (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, shutting down");
}
