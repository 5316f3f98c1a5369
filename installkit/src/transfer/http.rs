//! HTTP(S) GET transport.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{TransferState, Transport};
use crate::error::TransferError;
use crate::host::BoxFuture;

/// Default connect and stall timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Streams a response body to a file with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Result<Self, TransferError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with a custom connect and stall timeout.
    ///
    /// The timeout bounds connecting and each wait for more body bytes, not
    /// the whole transfer. A slow download that keeps receiving data never
    /// times out.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransferError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        state: &TransferState,
    ) -> Result<u64, TransferError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status(status.as_u16()));
        }

        if let Some(len) = response.content_length() {
            state.set_total(len);
        }

        let io_err = |source: std::io::Error| TransferError::Io {
            path: dest.to_path_buf(),
            source,
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let mut file = File::create(dest).await.map_err(io_err)?;

        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await.map_err(io_err)?;
            written += chunk.len() as u64;
            state.add_bytes(chunk.len() as u64);
        }
        file.flush().await.map_err(io_err)?;

        debug!(url, bytes = written, path = %dest.display(), "Download complete");
        Ok(written)
    }
}

impl Transport for HttpTransport {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
        state: &'a TransferState,
    ) -> BoxFuture<'a, Result<u64, TransferError>> {
        Box::pin(self.download(url, dest, state))
    }
}
