//! Gatepass TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Demo mode with a seeded in-memory store
//! gatepass-tui
//!
//! # Against a hosted backend
//! gatepass-tui --url https://xyz.supabase.co --anon-key eyJ...
//! ```

use std::io;
use std::sync::Arc;

use clap::Parser;
use gatepass_core::SystemClock;
use gatepass_core::store::{ProfileStore, RestConfig, RestStore};
use gatepass_tui::{Runtime, TerminalDriver, demo};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Gatepass terminal UI client
#[derive(Parser, Debug)]
#[command(name = "gatepass-tui")]
#[command(about = "Terminal UI for warehouse exit clearance")]
#[command(version)]
struct Args {
    /// Hosted backend base URL (enables the REST store)
    ///
    /// If not provided, runs against a seeded in-memory store.
    /// Falls back to the GATEPASS_SUPABASE_URL environment variable.
    #[arg(long)]
    url: Option<String>,

    /// Anonymous API key for the hosted backend
    ///
    /// Falls back to the GATEPASS_SUPABASE_KEY environment variable.
    #[arg(long)]
    anon_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Resolves the hosted-backend settings from flags and environment.
fn rest_config(args: &Args) -> Result<Option<RestConfig>, String> {
    let base_url =
        args.url.clone().or_else(|| std::env::var("GATEPASS_SUPABASE_URL").ok());
    let anon_key =
        args.anon_key.clone().or_else(|| std::env::var("GATEPASS_SUPABASE_KEY").ok());

    match (base_url, anon_key) {
        (Some(base_url), Some(anon_key)) => Ok(Some(RestConfig { base_url, anon_key })),
        (None, None) => Ok(None),
        _ => Err(
            "the hosted backend needs both --url and --anon-key \
             (or GATEPASS_SUPABASE_URL and GATEPASS_SUPABASE_KEY)"
                .to_owned(),
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Logs go to stderr; stdout belongs to the alternate screen.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_ansi(false))
        .with(filter)
        .init();

    let config = rest_config(&args)?;
    let demo_mode = config.is_none();
    let store: Arc<dyn ProfileStore> = match config {
        Some(config) => {
            tracing::info!(url = %config.base_url, "using hosted profile store");
            Arc::new(RestStore::new(config)?)
        },
        None => {
            tracing::info!("using seeded in-memory store");
            Arc::new(demo::seeded_store()?)
        },
    };

    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(driver, store, Arc::new(SystemClock));
    if demo_mode {
        runtime
            .app_mut()
            .set_status(format!("Demo store. Try dana@example.com / {}", demo::DEMO_PASSWORD));
    }

    Ok(runtime.run().await?)
}
