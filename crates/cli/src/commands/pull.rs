use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::AppConfig;
use crate::progress;

#[derive(Args)]
pub struct PullArgs {
    /// Cache key to fetch
    #[arg(long)]
    key: String,

    /// Target file for the object contents
    #[arg(long)]
    file: PathBuf,
}

pub async fn run(args: PullArgs) -> Result<()> {
    let config = AppConfig::load()?;
    let backend = config.open_backend().await?;

    info!(key = %args.key, "Pulling object");
    let spinner = progress::create_spinner(&format!("Pulling {}...", args.key));
    let mut reader = backend.get(&args.key).await?;

    if let Some(parent) = args.file.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::File::create(&args.file)
        .await
        .with_context(|| format!("failed to create {}", args.file.display()))?;
    let written = tokio::io::copy(&mut reader, &mut file)
        .await
        .context("failed to write object contents")?;
    file.flush().await?;
    spinner.finish_with_message("done");

    println!(
        "Pulled {} into {} ({})",
        args.key,
        args.file.display(),
        progress::format_bytes(written)
    );
    Ok(())
}
