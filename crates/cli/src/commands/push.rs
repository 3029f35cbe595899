use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::progress;

#[derive(Args)]
pub struct PushArgs {
    /// Cache key to store the object under
    #[arg(long)]
    key: String,

    /// File to upload
    #[arg(long)]
    file: PathBuf,
}

pub async fn run(args: PushArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let backend = config.open_backend().await?;

    let file = tokio::fs::File::open(&args.file)
        .await
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let size = file.metadata().await?.len();

    info!(key = %args.key, size, "Pushing object");
    let spinner = progress::create_spinner(&format!(
        "Pushing {} ({})...",
        args.key,
        progress::format_bytes(size)
    ));
    backend.put(&args.key, Box::new(file)).await?;
    spinner.finish_with_message("done");

    println!("Pushed {} ({})", args.key, progress::format_bytes(size));
    Ok(())
}
