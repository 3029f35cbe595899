use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::auth::Credentials;
use crate::bucket::Bucket;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_READ_WRITE_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection parameters for an OSS endpoint.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint URL, e.g. `oss-cn-hangzhou.aliyuncs.com`. A missing scheme
    /// defaults to https.
    pub endpoint: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Overrides the 5 second connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Overrides the 60 second read/write timeout.
    pub read_write_timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct Client {
    pub(crate) http: reqwest::Client,
    endpoint: Url,
    pub(crate) credentials: Credentials,
}

impl Client {
    /// Build a client bound to the configured endpoint and credentials.
    ///
    /// Fails on a malformed endpoint; no request is issued.
    pub fn new(config: Config) -> Result<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
            .timeout(
                config
                    .read_write_timeout
                    .unwrap_or(DEFAULT_READ_WRITE_TIMEOUT),
            )
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            credentials: Credentials {
                access_key_id: config.access_key_id,
                access_key_secret: config.access_key_secret,
            },
        })
    }

    /// Resolve a handle for the named bucket without issuing a request.
    ///
    /// The name is checked against OSS bucket naming rules; objects are then
    /// addressed through the virtual-hosted bucket URL.
    pub fn bucket(&self, name: &str) -> Result<Bucket<'_>> {
        check_bucket_name(name)?;
        let host = self
            .endpoint
            .host_str()
            .expect("endpoint host verified at construction");
        let mut base = format!("{}://{name}.{host}", self.endpoint.scheme());
        if let Some(port) = self.endpoint.port() {
            base.push_str(&format!(":{port}"));
        }
        let base =
            Url::parse(&base).with_context(|| format!("invalid bucket URL for {name:?}"))?;
        Ok(Bucket {
            client: self,
            name: name.to_string(),
            base,
        })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.is_empty() {
        anyhow::bail!("endpoint must not be empty");
    }
    let with_scheme = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    let url =
        Url::parse(&with_scheme).with_context(|| format!("invalid endpoint: {endpoint:?}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!("unsupported endpoint scheme: {other}"),
    }
    if url.host_str().is_none() {
        anyhow::bail!("endpoint has no host: {endpoint:?}");
    }
    Ok(url)
}

fn check_bucket_name(name: &str) -> Result<()> {
    if name.len() < 3 || name.len() > 63 {
        anyhow::bail!("bucket name must be 3-63 characters: {name:?}");
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        anyhow::bail!("bucket name may only contain lowercase letters, digits and hyphens: {name:?}");
    }
    if name.starts_with('-') || name.ends_with('-') {
        anyhow::bail!("bucket name must not begin or end with a hyphen: {name:?}");
    }
    Ok(())
}
