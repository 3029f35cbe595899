use anyhow::Result;
use async_trait::async_trait;
use buildstash_oss::{Client, Config, PutOption};

use super::{Backend, BackendError, ObjectReader, ObjectSource};

/// Aliyun OSS variant of the storage capability.
///
/// The handle is read-only after construction: one bucket, one set of
/// credentials, an optional object ACL and an optional server-side
/// encryption algorithm applied to every upload.
pub struct OssBackend {
    bucket: String,
    acl: Option<String>,
    encryption: Option<String>,
    client: Client,
}

impl OssBackend {
    /// Build a backend over the given connection configuration. Fails when
    /// the client cannot be constructed (malformed endpoint); no half-built
    /// handle is ever returned.
    pub fn new(
        bucket: &str,
        acl: Option<&str>,
        encryption: Option<&str>,
        config: Config,
    ) -> Result<Self> {
        let client = Client::new(config)?;
        Ok(Self {
            bucket: bucket.to_string(),
            acl: acl.map(str::to_string),
            encryption: encryption.map(str::to_string),
            client,
        })
    }
}

#[async_trait]
impl Backend for OssBackend {
    async fn get(&self, key: &str) -> Result<ObjectReader> {
        let bucket = self
            .client
            .bucket(&self.bucket)
            .map_err(|e| BackendError::bucket_resolution(&self.bucket, e))?;
        let body = bucket
            .get_object(key)
            .await
            .map_err(|e| BackendError::object_fetch(key, e))?;
        Ok(body)
    }

    async fn put(&self, key: &str, source: ObjectSource) -> Result<()> {
        let bucket = self
            .client
            .bucket(&self.bucket)
            .map_err(|e| BackendError::bucket_resolution(&self.bucket, e))?;

        // Unset configuration contributes no directive at all.
        let mut options = Vec::new();
        if let Some(ref encryption) = self.encryption {
            options.push(PutOption::server_side_encryption(encryption));
        }
        if let Some(ref acl) = self.acl {
            options.push(PutOption::object_acl(acl));
        }

        bucket
            .put_object(key, source, &options)
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        Ok(())
    }
}
