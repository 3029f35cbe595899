use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use super::{Backend, BackendError, ObjectReader, ObjectSource};

pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        Ok(Self { root })
    }

    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create directory: {}", root.display()))?;
        Ok(Self { root })
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn get(&self, key: &str) -> Result<ObjectReader> {
        let full = self.full_path(key);
        let file = tokio::fs::File::open(&full)
            .await
            .map_err(|e| BackendError::object_fetch(key, e))?;
        Ok(Box::new(file))
    }

    async fn put(&self, key: &str, mut source: ObjectSource) -> Result<()> {
        let full = self.full_path(key);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BackendError::object_put(key, e))?;
        }
        source
            .rewind()
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        let mut file = tokio::fs::File::create(&full)
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        tokio::io::copy(&mut source, &mut file)
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        file.flush()
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        Ok(())
    }
}
