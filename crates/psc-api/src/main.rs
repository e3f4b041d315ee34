//! # psc Service Entry Point
//!
//! Parses configuration, initializes tracing, and serves the catalog API.

use std::net::SocketAddr;

use clap::Parser;

use psc_api::{AppConfig, AppState};

/// PSC Stack API service — public service catalog publishing core.
///
/// Serves the multi-language publishing lifecycle, the connection
/// workbench, and translation vendor orders.
#[derive(Parser, Debug)]
#[command(name = "psc", version, about)]
struct Args {
    /// Socket address to listen on.
    #[arg(long, env = "PSC_LISTEN_ADDR", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Base URL of the translation vendor API.
    #[arg(long, env = "PSC_VENDOR_URL", default_value = "http://127.0.0.1:9470/vendor")]
    vendor_url: String,

    /// Bearer token for the translation vendor API.
    #[arg(long, env = "PSC_VENDOR_API_KEY", default_value = "", hide_env_values = true)]
    vendor_api_key: String,

    /// Vendor dispatch timeout in seconds.
    #[arg(long, env = "PSC_VENDOR_TIMEOUT_SECS", default_value_t = 30)]
    vendor_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let state = AppState::new(AppConfig {
        vendor_url: args.vendor_url,
        vendor_api_key: args.vendor_api_key,
        vendor_timeout_secs: args.vendor_timeout_secs,
    })?;
    let app = psc_api::app(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!(addr = %args.listen, "catalog service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
