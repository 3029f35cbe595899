use std::io::SeekFrom;

use anyhow::{Context, Result};
use futures::TryStreamExt;
use reqwest::Body;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, DATE};
use tokio::io::{AsyncRead, AsyncSeek, AsyncSeekExt};
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::debug;

use crate::auth;
use crate::client::Client;
use crate::options::PutOption;

/// Streaming object body returned by [`Bucket::get_object`]. Dropping it
/// releases the underlying connection.
pub type ObjectBody = Box<dyn AsyncRead + Send + Unpin>;

/// Handle to a single bucket, bound to its virtual-hosted URL.
pub struct Bucket<'a> {
    pub(crate) client: &'a Client,
    pub(crate) name: String,
    pub(crate) base: reqwest::Url,
}

impl Bucket<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn object_url(&self, key: &str) -> reqwest::Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/{key}"));
        url
    }

    fn resource(&self, key: &str) -> String {
        format!("/{}/{key}", self.name)
    }

    /// Fetch an object as a byte stream positioned at the start of its
    /// content.
    pub async fn get_object(&self, key: &str) -> Result<ObjectBody> {
        let url = self.object_url(key);
        let date = httpdate_now();
        let authorization = auth::authorization(
            &self.client.credentials,
            "GET",
            "",
            "",
            &date,
            &[],
            &self.resource(key),
        );

        let resp = self
            .client
            .http
            .get(url.clone())
            .header(DATE, date.as_str())
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {url} returned {status}: {body}");
        }

        debug!(bucket = %self.name, key, "object fetched");
        let stream = resp.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::new(StreamReader::new(Box::pin(stream))))
    }

    /// Upload an object from a rewindable payload, applying the given
    /// directives.
    ///
    /// The payload is reset to byte zero before the request regardless of
    /// where the caller left it, and its length is taken from the seekable
    /// range so the body can be streamed with an exact `Content-Length`.
    pub async fn put_object<R>(&self, key: &str, mut body: R, options: &[PutOption]) -> Result<()>
    where
        R: AsyncRead + AsyncSeek + Send + Unpin + 'static,
    {
        let len = body
            .seek(SeekFrom::End(0))
            .await
            .context("failed to measure the payload")?;
        body.rewind().await.context("failed to rewind the payload")?;

        let url = self.object_url(key);
        let date = httpdate_now();
        let oss_headers: Vec<(String, String)> =
            options.iter().map(PutOption::header).collect();
        let authorization = auth::authorization(
            &self.client.credentials,
            "PUT",
            "",
            "",
            &date,
            &oss_headers,
            &self.resource(key),
        );

        let mut req = self
            .client
            .http
            .put(url.clone())
            .header(DATE, date.as_str())
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_LENGTH, len);
        for (name, value) in &oss_headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let resp = req
            .body(Body::wrap_stream(ReaderStream::new(body)))
            .send()
            .await
            .with_context(|| format!("PUT {url} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("PUT {url} returned {status}: {body}");
        }

        debug!(bucket = %self.name, key, bytes = len, "object stored");
        Ok(())
    }
}

fn httpdate_now() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
