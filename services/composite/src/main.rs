//! `kcor-composite` entry point.

use anyhow::{Context, Result};
use archive::JsocArchive;
use composite::{Args, Pipeline};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse_args();
    let log = args.log_config();

    // stdout carries only the output path
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log.default_filter()));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "Parsed arguments");

    let request = args.request().context("Invalid time argument")?;
    let archive_config = args.archive_config();
    let archive = JsocArchive::new(archive_config.clone(), log).context("Failed to create archive client")?;
    let pipeline = Pipeline::new(
        &archive,
        archive_config,
        args.processing_config(),
        args.render_config(),
        log,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    let path = runtime
        .block_on(pipeline.run(&request))
        .context("Composite generation failed")?;

    println!("{}", path.display());
    Ok(())
}
