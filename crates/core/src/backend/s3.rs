use std::io::Cursor;

use anyhow::Result;
use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::{Backend, BackendError, ObjectReader, ObjectSource};

pub struct S3Backend {
    bucket: Box<Bucket>,
    prefix: String,
}

impl S3Backend {
    pub async fn new(
        bucket_name: &str,
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        prefix: Option<&str>,
    ) -> Result<Self> {
        let region = Region::Custom {
            region: region.to_string(),
            endpoint: endpoint.to_string(),
        };
        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)?;
        let bucket = Bucket::new(bucket_name, region, credentials)?.with_path_style();
        let prefix = prefix.unwrap_or("").to_string();
        Ok(Self { bucket, prefix })
    }

    fn full_path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{key}", self.prefix)
        }
    }
}

#[async_trait]
impl Backend for S3Backend {
    async fn get(&self, key: &str) -> Result<ObjectReader> {
        let full = self.full_path(key);
        let response = self
            .bucket
            .get_object(&full)
            .await
            .map_err(|e| BackendError::object_fetch(key, e))?;
        Ok(Box::new(Cursor::new(response.to_vec())))
    }

    async fn put(&self, key: &str, mut source: ObjectSource) -> Result<()> {
        let full = self.full_path(key);
        source
            .rewind()
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        let mut data = Vec::new();
        source
            .read_to_end(&mut data)
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        self.bucket
            .put_object(&full, &data)
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        Ok(())
    }
}
