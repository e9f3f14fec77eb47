//! Gestloc contract server
//!
//! HTTP server for a small rental-management backend. For a stored lease it
//! assembles the French rental contract (fixed blocks plus the authored
//! clause library, placeholders substituted) and serves it three ways:
//!
//! - HTML preview
//! - Raster PDF download (headless Chromium capture, sliced into A4 pages)
//! - Word-compatible `.doc` download (MHTML envelope)
//!
//! Lease, tenant, landlord and clause records live in SQLite; the render
//! itself is pure and always reflects the current rows.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod models;
mod seed;
mod state;

use api::{handle_download, handle_health, handle_preview};
use state::{AppState, ServerConfig};

/// Command-line arguments for the Gestloc server
#[derive(Parser, Debug)]
#[command(name = "gestloc-server")]
#[command(about = "Rental contract assembly and export server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// PDF render timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,

    /// Building name printed in every contract header
    #[arg(long, default_value = "Résidence Les Oliviers")]
    building_name: String,

    /// URL of the agency logo; falls back to GESTLOC_LOGO_URL, empty
    /// renders without one
    #[arg(long, default_value = "")]
    logo_url: String,

    /// Insert a demonstration landlord, tenant and lease on startup
    #[arg(long)]
    seed_demo: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gestloc server on {}:{}", args.host, args.port);

    let logo_url = if args.logo_url.is_empty() {
        std::env::var("GESTLOC_LOGO_URL").unwrap_or_default()
    } else {
        args.logo_url
    };

    let config = ServerConfig {
        building_name: args.building_name,
        logo_url,
        timeout_ms: args.timeout_ms,
    };

    let state = Arc::new(AppState::new(config).await?);

    seed::seed_default_clauses(&state.db).await?;
    if args.seed_demo {
        let lease_id = seed::seed_demo_data(&state.db).await?;
        info!("Demo lease ready: GET /api/contracts/{}/preview", lease_id);
    }

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .expect("Failed to create rate limiter config"),
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/contracts/:lease_id/preview", get(handle_preview))
        .route("/api/contracts/:lease_id/download", get(handle_download))
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);

    axum::serve(listener, app).await?;

    Ok(())
}
