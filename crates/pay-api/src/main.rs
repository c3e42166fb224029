//! # square-relay
//!
//! Storefront backend that fronts the Square payments API.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export SQUARE_ACCESS_TOKEN=EAAAl...
//! export SQUARE_LOCATION_ID=L...
//! export SQUARE_ENVIRONMENT=sandbox
//!
//! # Run the server
//! square-relay
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.provider.provider_name());
    info!(
        "CORS origin: {} (localhost origins {})",
        state.config.allowed_origin,
        if state.config.allow_localhost_origins { "allowed" } else { "not allowed" }
    );

    // Create router
    let app = routes::create_router(state);

    info!("square-relay v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Catalog: GET http://{}/catalog", addr);
        info!("Payment: POST http://{}/create-payment", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters; `LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
