use crate::config::Config;
use crate::genres::GenreCache;
use crate::render::{HtmlRenderer, Renderer, SCRIPT_PATH};
use crate::tmdb::{MediaApi, TmdbClient};
use crate::{api, pages, sitemap};
use anyhow::Result;
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const APP_JS: &str = include_str!("../assets/app.js");

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub media: Arc<dyn MediaApi>,
    pub genres: Arc<GenreCache>,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(config: Config, media: Arc<dyn MediaApi>) -> Self {
        let renderer = Arc::new(HtmlRenderer::new(config.site_name.clone()));
        Self {
            config: Arc::new(config),
            media,
            genres: Arc::new(GenreCache::new()),
            renderer,
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let media: Arc<dyn MediaApi> = Arc::new(TmdbClient::new(&config)?);
    let port = config.port;
    let app = build_router(AppState::new(config, media));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/movie/:id", get(pages::movie))
        .route("/movie/:id/:slug", get(pages::movie))
        .route("/tv/:id", get(pages::tv))
        .route("/tv/:id/:slug", get(pages::tv))
        .route("/search", get(pages::search))
        .route("/genre/:media/:genre_id", get(pages::genre))
        .route("/genre/:media/:genre_id/:slug", get(pages::genre))
        .route("/year/:media/:year", get(pages::year))
        .route("/api/section", get(api::section))
        .route("/about", get(pages::about))
        .route("/privacy-policy", get(pages::privacy_policy))
        .route("/terms", get(pages::terms))
        .route("/dmca", get(pages::dmca))
        .route("/contact", get(pages::contact))
        .route("/robots.txt", get(sitemap::robots))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route(SCRIPT_PATH, get(app_js))
        .route("/health", get(health))
        .fallback(pages::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn app_js() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        APP_JS,
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
