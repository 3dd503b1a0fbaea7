//! Conversion server binary
//!
//! Run with: cargo run -p docmark --bin docmark-server -- --config docmark.toml

use clap::Parser;
use docmark::{config::DocmarkConfig, server::DocmarkServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "docmark-server", version, about = "Document to Markdown conversion service")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    host: Option<String>,

    /// Override the port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the worker count
    #[arg(short, long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docmark=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                          docmark                          ║
║          Document to Markdown Conversion Service          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = match &args.config {
        Some(path) => DocmarkConfig::from_file(path)?,
        None => DocmarkConfig::default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.workers.is_some() {
        config.processing.workers = args.workers;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - CPU count: {}", num_cpus::get());
    tracing::info!("  - Workers: {}", config.processing.worker_count());
    tracing::info!(
        "  - Directory extensions: {}",
        config.processing.supported_extensions.join(", ")
    );
    tracing::info!(
        "  - Tools: {} / {}",
        config.conversion.pdftotext_program,
        config.conversion.pandoc_program
    );

    let server = DocmarkServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/convert        - Queue files for conversion");
    println!("  GET  /api/status         - Poll per-file status");
    println!("  GET  /api/status/summary - Counts and recent activity");
    println!("  POST /api/clear          - Clear status history");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
