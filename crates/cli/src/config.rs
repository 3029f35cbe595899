use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use buildstash_core::backend::Backend;
use buildstash_core::backend::local::LocalBackend;
use buildstash_core::backend::oss::OssBackend;
use buildstash_core::backend::s3::S3Backend;

const CONFIG_FILE: &str = "buildstash.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    #[serde(rename = "local")]
    Local { path: String },
    #[serde(rename = "s3")]
    S3 {
        endpoint: String,
        region: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        prefix: Option<String>,
    },
    #[serde(rename = "oss")]
    Oss {
        endpoint: String,
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        acl: Option<String>,
        encryption: Option<String>,
        connect_timeout_secs: Option<u64>,
        read_write_timeout_secs: Option<u64>,
    },
}

impl AppConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("buildstash")
            .join(CONFIG_FILE)
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("config not found at {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config")
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Construct the configured backend. One variant per provider, selected
    /// by the `type` tag.
    pub async fn open_backend(&self) -> Result<Arc<dyn Backend>> {
        match &self.store.backend {
            BackendConfig::Local { path } => Ok(Arc::new(LocalBackend::new(path)?)),
            BackendConfig::S3 {
                endpoint,
                region,
                bucket,
                access_key,
                secret_key,
                prefix,
            } => {
                let backend = S3Backend::new(
                    bucket,
                    endpoint,
                    region,
                    access_key,
                    secret_key,
                    prefix.as_deref(),
                )
                .await?;
                Ok(Arc::new(backend))
            }
            BackendConfig::Oss {
                endpoint,
                bucket,
                access_key_id,
                access_key_secret,
                acl,
                encryption,
                connect_timeout_secs,
                read_write_timeout_secs,
            } => {
                let config = buildstash_oss::Config {
                    endpoint: endpoint.clone(),
                    access_key_id: access_key_id.clone(),
                    access_key_secret: access_key_secret.clone(),
                    connect_timeout: connect_timeout_secs.map(Duration::from_secs),
                    read_write_timeout: read_write_timeout_secs.map(Duration::from_secs),
                };
                let backend =
                    OssBackend::new(bucket, acl.as_deref(), encryption.as_deref(), config)?;
                Ok(Arc::new(backend))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oss_config_parses_with_optional_fields_omitted() {
        let toml = r#"
            [store.backend]
            type = "oss"
            endpoint = "oss-cn-hangzhou.aliyuncs.com"
            bucket = "build-cache"
            access_key_id = "id"
            access_key_secret = "secret"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        match config.store.backend {
            BackendConfig::Oss {
                acl,
                encryption,
                connect_timeout_secs,
                ..
            } => {
                assert!(acl.is_none());
                assert!(encryption.is_none());
                assert!(connect_timeout_secs.is_none());
            }
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn local_config_roundtrips() {
        let config = AppConfig {
            store: StoreConfig {
                backend: BackendConfig::Local {
                    path: "/var/cache/buildstash".to_string(),
                },
            },
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&serialized).unwrap();
        match parsed.store.backend {
            BackendConfig::Local { path } => assert_eq!(path, "/var/cache/buildstash"),
            other => panic!("unexpected backend: {other:?}"),
        }
    }
}
