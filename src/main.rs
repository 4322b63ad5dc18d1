use anyhow::{Context, Result};
use axum::{extract::FromRef, Router};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use crate::{
    catalog::{Catalog, ClickLog},
    config::Settings,
    suggest::SuggestionIndex,
};

// Declare modules
mod catalog;
mod config;
mod error;
mod filters;
mod listing;
mod models;
mod offers;
mod routes;
mod suggest;

// Shared state handed to every handler
#[derive(Clone, FromRef)]
struct AppState {
    settings: Arc<Settings>,
    base_url: Arc<Url>,
    catalog: Arc<Catalog>,
    clicks: Arc<ClickLog>,
    suggestions: Arc<SuggestionIndex>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "automarket=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing AutoMarket server...");

    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let catalog = Catalog::load(Path::new(&settings.catalog_path))
        .context("Failed to load vehicle catalog")?;

    let app_state = AppState {
        base_url: Arc::new(settings.base_url()?),
        suggestions: Arc::new(SuggestionIndex::new(settings.suggestion_limit)),
        catalog: Arc::new(catalog),
        clicks: Arc::new(ClickLog::new(settings.click_log_capacity)),
        settings: Arc::new(settings),
    };

    let router: Router = routes::create_router(app_state.clone());
    let app = router
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = app_state
        .settings
        .server_address
        .parse()
        .with_context(|| {
            format!(
                "Invalid server address format: {}",
                app_state.settings.server_address
            )
        })?;

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    // Connect info feeds the client address recorded with each tracked click
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
