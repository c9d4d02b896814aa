//! SQLite table viewer.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌────────────────────────────────────────────────────┐
//!                     │                    TABLE VIEWER                     │
//!                     │                                                     │
//!   Client Request    │  ┌────────┐    ┌─────────────┐    ┌─────────────┐  │
//!   ──────────────────┼─▶│  http  │───▶│ access gate │───▶│  db (SQLite)│  │
//!                     │  │ server │    └──────┬──────┘    └─────────────┘  │
//!                     │  └───┬────┘           │                            │
//!                     │      │ login/logout   ▼                            │
//!                     │      └──────────▶┌─────────┐◀──── sweeper (tick)   │
//!                     │                  │ session │                       │
//!                     │                  │  store  │                       │
//!                     │                  └─────────┘                       │
//!                     │  config (settings file) · observability · lifecycle │
//!                     └────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use table_viewer::config::load_settings;
use table_viewer::lifecycle::signals::spawn_signal_listener;
use table_viewer::lifecycle::Application;
use table_viewer::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "table-viewer")]
#[command(about = "Serve the tables of a SQLite database over HTTP", long_about = None)]
struct Args {
    /// Settings file (JSON, or TOML when the extension is `.toml`).
    #[arg(short, long, default_value = "settings.json")]
    settings: PathBuf,

    /// Expose Prometheus metrics on this address.
    #[arg(long)]
    metrics_address: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = load_settings(&args.settings);
    logging::init(loaded.as_ref().map(|s| s.debug).unwrap_or(false));

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(path = %args.settings.display(), error = %e, "Invalid settings");
            return Err(e.into());
        }
    };

    tracing::info!(
        database = %settings.database_path.display(),
        protection = settings.protection,
        auto_logout_secs = ?settings.auto_logout.map(|d| d.as_secs()),
        users = settings.users.len(),
        debug = settings.debug,
        "Settings loaded"
    );

    if let Some(addr) = args.metrics_address {
        metrics::init_metrics(addr);
    }

    let app = Application::bind(settings).await?;
    tracing::info!(address = %app.local_addr()?, "Listening for connections");

    let signals = spawn_signal_listener(app.shutdown_handle());
    app.run().await?;
    signals.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
