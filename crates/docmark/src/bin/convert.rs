//! Command-line conversion
//!
//! `docmark-convert file report.docx` converts one file in the foreground.
//! `docmark-convert batch "docs/**/*.pdf"` converts many on a worker pool.

use clap::{Parser, Subcommand};
use docmark::{
    batch_convert,
    config::{batch_worker_count, DocmarkConfig},
    conversion::MarkdownConverter,
    ingestion::PathResolver,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "docmark-convert", version, about = "Convert documents to Markdown")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a single file
    File {
        input: PathBuf,
        /// Output path (defaults to the input with a .md extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert files, directories and wildcard patterns in parallel
    Batch {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Worker count (defaults to one per core)
        #[arg(short, long)]
        workers: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docmark=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DocmarkConfig::from_file(path)?,
        None => DocmarkConfig::default(),
    };
    let converter = MarkdownConverter::from_config(&config.conversion);

    match cli.command {
        Command::File { input, output } => {
            match converter.convert_file(&input, output.as_deref()).await {
                Ok(message) => {
                    println!("{}", message);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Batch { paths, workers } => {
            let resolution = PathResolver::from_config(&config.processing).resolve(&paths);
            for entry in &resolution.unresolved {
                eprintln!("Skipping '{}': no convertible files found", entry);
            }
            if resolution.resolved.is_empty() {
                eprintln!("No files to convert");
                return Ok(ExitCode::FAILURE);
            }

            let total = resolution.resolved.len();
            let workers = workers.unwrap_or_else(|| batch_worker_count(total));
            println!("Converting {} files with {} workers", total, workers);

            let results = batch_convert(resolution.resolved.clone(), Arc::new(converter), Some(workers)).await;

            let mut failed = 0;
            for path in &resolution.resolved {
                match results.get(path) {
                    Some(outcome) if outcome.is_success() => {
                        println!("[ok]    {}: {}", path.display(), outcome.message());
                    }
                    Some(outcome) => {
                        failed += 1;
                        println!("[error] {}: {}", path.display(), outcome.message());
                    }
                    None => {
                        failed += 1;
                        println!("[error] {}: no result", path.display());
                    }
                }
            }

            println!("\nCompleted: {}, Failed: {}, Total: {}", total - failed, failed, total);
            Ok(if failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
