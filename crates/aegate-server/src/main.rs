//! Aegate server binary
//!
//! Serves the dashboard API over HTTP: health, dataset introspection, and
//! templated query execution against the Cloudflare Analytics Engine SQL
//! endpoint. Configuration comes from the environment (`CF_ACCOUNT_ID`,
//! `CF_API_TOKEN`), optionally via a `.env` file.

mod routes;

use aegate_core::{AnalyticsClient, AnalyticsConfig};
use clap::Parser;
use std::net::IpAddr;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "aegate")]
#[command(about = "Analytics Engine SQL gateway for dashboard UIs")]
#[command(version)]
struct Cli {
    /// Address to bind the API server to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8787, env = "AEGATE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging with environment-based filtering
    // Set RUST_LOG=debug for verbose logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = AnalyticsConfig::from_env();
    if config.is_configured() {
        info!(
            account_id = config.account_id.as_deref().unwrap_or_default(),
            token = %config.masked_token(),
            "analytics credentials loaded"
        );
    } else {
        // Data-bearing endpoints will answer 400 until credentials are set;
        // the UI treats that as demo mode
        warn!("CF_ACCOUNT_ID / CF_API_TOKEN not set, serving in unconfigured mode");
    }

    let client = AnalyticsClient::new(config);
    let api = routes::api(client);

    info!("aegate listening on http://{}:{}", cli.host, cli.port);
    warp::serve(api).run((cli.host, cli.port)).await;

    Ok(())
}
