use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use buildstash_core::backend::Backend;
use buildstash_core::backend::local::LocalBackend;

use crate::config::{AppConfig, BackendConfig, StoreConfig};

#[derive(Args)]
pub struct InitArgs {
    /// Backend type: local, s3 or oss
    #[arg(long)]
    backend: String,

    /// Path for the local backend
    #[arg(long)]
    path: Option<String>,

    /// Endpoint URL (s3, oss)
    #[arg(long)]
    endpoint: Option<String>,

    /// Bucket name (s3, oss)
    #[arg(long)]
    bucket: Option<String>,

    /// S3 region
    #[arg(long, default_value = "auto")]
    region: String,

    /// S3 access key
    #[arg(long)]
    access_key: Option<String>,

    /// S3 secret key
    #[arg(long)]
    secret_key: Option<String>,

    /// S3 key prefix
    #[arg(long)]
    prefix: Option<String>,

    /// OSS access key id
    #[arg(long)]
    access_key_id: Option<String>,

    /// OSS access key secret
    #[arg(long)]
    access_key_secret: Option<String>,

    /// Object ACL applied to OSS uploads (provider-defined value)
    #[arg(long)]
    acl: Option<String>,

    /// Server-side encryption algorithm applied to OSS uploads
    #[arg(long)]
    encryption: Option<String>,

    /// OSS connect timeout override, in seconds
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// OSS read/write timeout override, in seconds
    #[arg(long)]
    read_write_timeout_secs: Option<u64>,
}

pub async fn run(args: InitArgs) -> Result<()> {
    let backend_config = match args.backend.as_str() {
        "local" => {
            let path = args
                .path
                .ok_or_else(|| anyhow::anyhow!("--path required for local backend"))?;
            BackendConfig::Local { path }
        }
        "s3" => {
            let endpoint = args
                .endpoint
                .ok_or_else(|| anyhow::anyhow!("--endpoint required for S3 backend"))?;
            let bucket = args
                .bucket
                .ok_or_else(|| anyhow::anyhow!("--bucket required for S3 backend"))?;
            let access_key = args
                .access_key
                .ok_or_else(|| anyhow::anyhow!("--access-key required for S3 backend"))?;
            let secret_key = args
                .secret_key
                .ok_or_else(|| anyhow::anyhow!("--secret-key required for S3 backend"))?;
            BackendConfig::S3 {
                endpoint,
                region: args.region,
                bucket,
                access_key,
                secret_key,
                prefix: args.prefix,
            }
        }
        "oss" => {
            let endpoint = args
                .endpoint
                .ok_or_else(|| anyhow::anyhow!("--endpoint required for OSS backend"))?;
            let bucket = args
                .bucket
                .ok_or_else(|| anyhow::anyhow!("--bucket required for OSS backend"))?;
            let access_key_id = args
                .access_key_id
                .ok_or_else(|| anyhow::anyhow!("--access-key-id required for OSS backend"))?;
            let access_key_secret = args
                .access_key_secret
                .ok_or_else(|| anyhow::anyhow!("--access-key-secret required for OSS backend"))?;
            BackendConfig::Oss {
                endpoint,
                bucket,
                access_key_id,
                access_key_secret,
                acl: args.acl,
                encryption: args.encryption,
                connect_timeout_secs: args.connect_timeout_secs,
                read_write_timeout_secs: args.read_write_timeout_secs,
            }
        }
        other => anyhow::bail!("unknown backend: {other} (supported: local, s3, oss)"),
    };

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        let overwrite = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Overwrite existing config at {}?",
                config_path.display()
            ))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = AppConfig {
        store: StoreConfig {
            backend: backend_config,
        },
    };

    // Construct the backend once so a broken configuration fails here, not
    // on the first push.
    let _backend: Arc<dyn Backend> = match &config.store.backend {
        BackendConfig::Local { path } => Arc::new(LocalBackend::init(path)?),
        _ => config.open_backend().await?,
    };

    config.save()?;

    info!(config_path = %config_path.display(), "Backend configured");
    println!("Backend configured.");
    println!("Config: {}", config_path.display());
    Ok(())
}
