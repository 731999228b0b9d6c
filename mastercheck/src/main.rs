use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

mod app;

#[derive(Parser, Debug)]
#[command(author, version, about = "mastercheck - compressed-format support check for the mastering pipeline", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory that receives the published sample files
    #[arg(long)]
    publish_dir: Option<Utf8PathBuf>,

    /// Skip writing sample files for manual testing
    #[arg(long)]
    no_publish: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    info!("Starting mastercheck v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if let Some(config_path) = args.config {
        mastercheck_core::config::Config::load_from_path(config_path)?
    } else {
        mastercheck_core::config::Config::load_or_default()?
    };

    // Override with CLI arguments
    if let Some(dir) = args.publish_dir {
        config.publish.directory = dir;
    }
    if args.no_publish {
        config.publish.enabled = false;
    }

    info!("Codec tool: {}", config.codec.binary);
    info!("Output sample rate: {} Hz", config.pipeline.sample_rate);

    let code = app::run(config).await;
    Ok(ExitCode::from(code))
}
