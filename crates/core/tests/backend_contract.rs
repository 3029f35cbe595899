use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use buildstash_core::backend::{Backend, BackendError, ObjectReader, ObjectSource};

/// In-memory stand-in exercising the contract without a provider.
#[derive(Default)]
struct MemoryBackend {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<ObjectReader> {
        let objects = self.objects.lock().unwrap();
        let data = objects
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::object_fetch(key, anyhow::anyhow!("no such object")))?;
        Ok(Box::new(Cursor::new(data)))
    }

    async fn put(&self, key: &str, mut source: ObjectSource) -> Result<()> {
        source
            .rewind()
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        let mut data = Vec::new();
        source
            .read_to_end(&mut data)
            .await
            .map_err(|e| BackendError::object_put(key, e))?;
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }
}

async fn read_all(mut reader: ObjectReader) -> Vec<u8> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn roundtrip_preserves_bytes() {
    let backend = MemoryBackend::default();
    let content = b"arbitrary object content \x00\x01\x02".to_vec();

    backend
        .put("linux/cache.tar", Box::new(Cursor::new(content.clone())))
        .await
        .unwrap();

    let data = read_all(backend.get("linux/cache.tar").await.unwrap()).await;
    assert_eq!(data, content);
}

#[tokio::test]
async fn get_on_an_absent_key_never_yields_a_reader() {
    let backend = MemoryBackend::default();
    let err = backend.get("absent").await.err().unwrap();
    assert!(matches!(
        err.downcast_ref::<BackendError>(),
        Some(BackendError::ObjectFetch { .. })
    ));
}

#[tokio::test]
async fn payload_is_rewound_before_upload() {
    let backend = MemoryBackend::default();

    let mut source = Cursor::new(b"read twice, same bytes".to_vec());
    // Leave the cursor mid-stream, as a caller that already hashed the
    // payload would.
    source.set_position(11);
    backend.put("obj", Box::new(source)).await.unwrap();

    let data = read_all(backend.get("obj").await.unwrap()).await;
    assert_eq!(data, b"read twice, same bytes");
}

#[tokio::test]
async fn concurrent_puts_to_distinct_keys_do_not_interfere() {
    let backend = Arc::new(MemoryBackend::default());

    let mut handles = Vec::new();
    for i in 0..8u32 {
        let backend = Arc::clone(&backend);
        handles.push(tokio::spawn(async move {
            let key = format!("key-{i}");
            let content = format!("content-{i}").into_bytes();
            backend
                .put(&key, Box::new(Cursor::new(content)))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for i in 0..8u32 {
        let data = read_all(backend.get(&format!("key-{i}")).await.unwrap()).await;
        assert_eq!(data, format!("content-{i}").into_bytes());
    }
}
