//! # Tour Booking
//!
//! Booking and payment-session coordination service.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export BOOKING_STORE_URL=http://localhost:4000/api/v1
//! export PAYMENT_API_URL=http://localhost:4000/api/v1
//!
//! # Run the server
//! tour-booking
//! ```

use booking_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Tours open for booking: {}",
        state.coordinator.catalog().active_tours().count()
    );

    let app = routes::create_router(state);

    info!("Tour booking starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Bookings: POST http://{}/api/v1/bookings", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Tour Booking
  ━━━━━━━━━━━━━━━━━━━━━━━
  Booking and payment coordination
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
