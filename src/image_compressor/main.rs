mod application;
mod args;
mod domain;
mod infrastructure;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use crate::application::compression_service::CompressionService;
use crate::application::orchestrator::Orchestrator;
use crate::args::Args;
use crate::domain::quality::Quality;
use crate::infrastructure::batch;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::console::Console;
use crate::infrastructure::file_storage::LocalFileStorage;
use crate::infrastructure::image_compressor::DefaultImageCompressor;
use crate::infrastructure::object_url::ObjectUrlRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(out_dir) = &args.out_dir {
        config.output_dir = out_dir.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let quality = Quality::new(args.quality.unwrap_or(config.default_quality as u32))
        .context("invalid default quality")?;
    info!(
        "Starting with quality {} and output directory {}",
        quality.label(),
        config.output_dir.display()
    );

    let orchestrator = Orchestrator::new(
        CompressionService::new(Arc::new(DefaultImageCompressor::new()))
            .with_background_worker(config.background_worker),
        ObjectUrlRegistry::new(),
        config.debounce_window(),
        quality,
    );
    let storage = LocalFileStorage::new(config.output_dir.clone());

    if args.files.is_empty() || args.interactive {
        // with --interactive, the last accepted file stays loaded
        for path in &args.files {
            batch::open_file(&orchestrator, &storage, path, &mut std::io::stdout()).await?;
        }
        orchestrator.settle().await;
        let mut console = Console::new(&orchestrator, &storage, std::io::stdout());
        console.run(BufReader::new(tokio::io::stdin())).await?;
        return Ok(());
    }

    let failures = batch::run_batch(&orchestrator, &storage, &args.files, std::io::stdout()).await?;
    if failures > 0 {
        anyhow::bail!("{} of {} files could not be compressed", failures, args.files.len());
    }
    Ok(())
}
