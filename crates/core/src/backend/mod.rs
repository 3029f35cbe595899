pub mod local;
pub mod oss;
pub mod s3;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncSeek};

/// Readable byte stream handed out by [`Backend::get`], positioned at the
/// start of the object content. The caller owns it; dropping it releases the
/// underlying resource.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// Marker for payload streams that can be rewound to byte zero. An upload may
/// need to restart from the beginning, so [`Backend::put`] only accepts
/// seekable sources.
pub trait SeekableRead: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin + ?Sized> SeekableRead for T {}

/// Rewindable payload consumed by [`Backend::put`].
pub type ObjectSource = Box<dyn SeekableRead>;

/// Storage capability: fetch and store opaque objects by key. One
/// implementation per provider; handles are immutable after construction and
/// every operation targets the single configured bucket or root.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get(&self, key: &str) -> Result<ObjectReader>;
    async fn put(&self, key: &str, source: ObjectSource) -> Result<()>;
}

/// Per-operation failure, labelled with the failing operation and carrying
/// the underlying cause. No retry happens at this layer.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("resolve the bucket {bucket}")]
    BucketResolution {
        bucket: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("get the object {key}")]
    ObjectFetch {
        key: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("put the object {key}")]
    ObjectPut {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

impl BackendError {
    pub fn bucket_resolution(bucket: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::BucketResolution {
            bucket: bucket.into(),
            source: source.into(),
        }
    }

    pub fn object_fetch(key: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::ObjectFetch {
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn object_put(key: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::ObjectPut {
            key: key.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_the_operation_label() {
        let err = BackendError::object_fetch("linux/cache.tar", anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "get the object linux/cache.tar");

        let err = BackendError::object_put("linux/cache.tar", anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "put the object linux/cache.tar");

        let err = BackendError::bucket_resolution("build-cache", anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "resolve the bucket build-cache");
    }

    #[test]
    fn errors_preserve_the_cause() {
        let err = BackendError::object_put("k", anyhow::anyhow!("quota exceeded"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "quota exceeded");
    }
}
