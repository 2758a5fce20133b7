//! Test utilities for tempstick-client
//!
//! Runs an axum router on a loopback port and points a client at it.

use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::net::TcpListener;

use crate::config::ClientConfig;
use crate::response::DecodeMode;
use crate::{Result, TempStickClient};

/// API key configured on clients created by [`TestServer`]
pub const TEST_API_KEY: &str = "test-api-key";

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: TempStickClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start `router` and create a client that reads gzip bodies
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{routing::get, Router};
    /// use tempstick_client::testing::{gzip_bytes, TestServer};
    ///
    /// let router = Router::new().route("/sensors/all", get(|| async {
    ///     gzip_bytes(br#"{"type":"success","message":"","data":{"items":[]}}"#)
    /// }));
    /// let server = TestServer::start(router).await?;
    /// let sensors = server.client.list_sensors().await?;
    /// ```
    pub async fn start<S>(router: axum::Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        Self::start_with_mode(router, DecodeMode::Stream).await
    }

    /// Start `router` and create a client using `mode`
    pub async fn start_with_mode<S>(router: axum::Router<S>, mode: DecodeMode) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: axum::Router = router.into();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let config = ClientConfig::builder()
            .base_url(format!("http://{}", addr))
            .api_key(TEST_API_KEY)
            .decode_mode(mode)
            .request_timeout_ms(5_000)
            .connect_timeout_ms(2_000)
            .build();
        let client = TempStickClient::from_config(&config)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &TempStickClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Gzip-compress `data` the way the API compresses response bodies
pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec cannot fail
    let _ = encoder.write_all(data);
    encoder.finish().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::gunzip;

    #[test]
    fn test_gzip_bytes() {
        let packed = gzip_bytes(b"{\"type\":\"success\"}");
        assert_eq!(&packed[..2], &[0x1f, 0x8b]);
        assert_eq!(gunzip(&packed).unwrap(), b"{\"type\":\"success\"}");
    }

    #[tokio::test]
    async fn test_server_base_url() {
        let server = TestServer::start(axum::Router::new()).await.unwrap();
        assert_eq!(server.client().base_url(), server.base_url());
        assert_eq!(server.client().decode_mode(), DecodeMode::Stream);
        server.shutdown().await;
    }
}
