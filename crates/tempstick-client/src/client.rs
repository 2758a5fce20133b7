//! TempStick HTTP client implementation

use std::sync::Arc;

use reqwest::header::{ACCEPT, ACCEPT_ENCODING};
use serde::de::DeserializeOwned;
use tempstick_core::{ReadingListEnvelope, SensorEnvelope, SensorListEnvelope, UserEnvelope};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ClientConfig, API_KEY_HEADER, DEFAULT_BASE_URL};
use crate::error::{collect_headers, Result, TempStickError};
use crate::request::Endpoint;
use crate::response::{DecodeMode, RawResponse, ResponseDecoder};
use crate::transport::Transport;
use crate::types::ReadingsQuery;

/// TempStick REST API client
///
/// Cheap to clone; clones share the connection pool and decode settings.
/// Calls on one client may run concurrently.
#[derive(Debug, Clone)]
pub struct TempStickClient {
    transport: Transport,
    base_url: String,
    decoder: Arc<ResponseDecoder>,
}

impl TempStickClient {
    /// Create a client for the public API that authenticates with `api_key`
    ///
    /// Fails with [`TempStickError::InvalidArgument`] when the key is empty or
    /// only whitespace.
    pub fn new(api_key: &str) -> Result<Self> {
        let transport = Transport::from_config(&ClientConfig::default())?.with_api_key(api_key)?;
        Ok(Self::from_parts(
            transport,
            DEFAULT_BASE_URL.to_string(),
            DecodeMode::default(),
        ))
    }

    /// Create a client from a loaded configuration
    ///
    /// The configuration must carry a non-blank `api_key`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            TempStickError::invalid_argument("configuration has no api_key")
        })?;
        let transport = Transport::from_config(config)?
            .with_api_key_header(&config.api_key_header, api_key)?;

        let mut client = Self::from_parts(
            transport,
            DEFAULT_BASE_URL.to_string(),
            config.decode_mode,
        );
        client.set_base_url(&config.base_url)?;
        Ok(client)
    }

    /// Create a client over a preconfigured transport
    ///
    /// The transport must already send the `X-API-KEY` header.
    pub fn with_transport(transport: Transport) -> Result<Self> {
        if !transport.has_header(API_KEY_HEADER) {
            return Err(TempStickError::invalid_argument(format!(
                "transport does not send the {} header",
                API_KEY_HEADER
            )));
        }
        Ok(Self::from_parts(
            transport,
            DEFAULT_BASE_URL.to_string(),
            DecodeMode::default(),
        ))
    }

    fn from_parts(transport: Transport, base_url: String, mode: DecodeMode) -> Self {
        Self {
            transport,
            base_url,
            decoder: Arc::new(ResponseDecoder::new(mode)),
        }
    }

    /// Use a different base URL, e.g. a staging deployment or a test server
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.set_base_url(base_url)?;
        Ok(self)
    }

    /// Change the base URL; it must parse as an absolute URL
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        Url::parse(base_url)?;
        self.base_url = base_url.to_string();
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Change how response bodies are read
    pub fn set_decode_mode(&mut self, mode: DecodeMode) {
        self.decoder = Arc::new(ResponseDecoder::new(mode));
    }

    pub fn with_decode_mode(mut self, mode: DecodeMode) -> Self {
        self.set_decode_mode(mode);
        self
    }

    pub fn decode_mode(&self) -> DecodeMode {
        self.decoder.mode()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Get the account that owns the API key
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<UserEnvelope> {
        self.get_current_user_with_cancel(&CancellationToken::new())
            .await
    }

    /// [`get_current_user`](Self::get_current_user), aborted when `cancel` fires
    #[instrument(skip(self, cancel))]
    pub async fn get_current_user_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<UserEnvelope> {
        self.execute(Endpoint::get("/user"), cancel).await
    }

    // =========================================================================
    // Sensor Operations
    // =========================================================================

    /// Get the detail of one sensor
    #[instrument(skip(self))]
    pub async fn get_sensor(&self, sensor_id: &str) -> Result<SensorEnvelope> {
        self.get_sensor_with_cancel(sensor_id, &CancellationToken::new())
            .await
    }

    /// [`get_sensor`](Self::get_sensor), aborted when `cancel` fires
    #[instrument(skip(self, cancel))]
    pub async fn get_sensor_with_cancel(
        &self,
        sensor_id: &str,
        cancel: &CancellationToken,
    ) -> Result<SensorEnvelope> {
        self.execute(sensor_endpoint(sensor_id)?, cancel).await
    }

    /// List every sensor on the account
    #[instrument(skip(self))]
    pub async fn list_sensors(&self) -> Result<SensorListEnvelope> {
        self.list_sensors_with_cancel(&CancellationToken::new())
            .await
    }

    /// [`list_sensors`](Self::list_sensors), aborted when `cancel` fires
    #[instrument(skip(self, cancel))]
    pub async fn list_sensors_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SensorListEnvelope> {
        self.execute(Endpoint::get("/sensors/all"), cancel).await
    }

    // =========================================================================
    // Reading Operations
    // =========================================================================

    /// Get the reading history of a sensor
    ///
    /// Unset `offset`, `start` and `end` fields of `query` are left out of
    /// the request.
    #[instrument(skip(self))]
    pub async fn get_readings(
        &self,
        sensor_id: &str,
        query: &ReadingsQuery,
    ) -> Result<ReadingListEnvelope> {
        self.get_readings_with_cancel(sensor_id, query, &CancellationToken::new())
            .await
    }

    /// [`get_readings`](Self::get_readings), aborted when `cancel` fires
    #[instrument(skip(self, cancel))]
    pub async fn get_readings_with_cancel(
        &self,
        sensor_id: &str,
        query: &ReadingsQuery,
        cancel: &CancellationToken,
    ) -> Result<ReadingListEnvelope> {
        self.execute(readings_endpoint(sensor_id, query)?, cancel)
            .await
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Send one request and decode its response
    async fn execute<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: Endpoint,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let url = endpoint.build_url(&self.base_url)?;
        let mode = self.decoder.mode();
        debug!(%url, ?mode, "Sending request");

        let mut request = self
            .transport
            .request(endpoint.method().clone(), url)
            .header(ACCEPT, "application/json");
        if mode == DecodeMode::Stream {
            request = request.header(ACCEPT_ENCODING, "gzip");
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TempStickError::Cancelled),
            response = request.send() => response?,
        };

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        debug!(status, "Received response");

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TempStickError::Cancelled),
            body = response.bytes() => body?,
        };

        let decoder = *self.decoder;
        let raw = RawResponse::new(status, headers, body);
        let decode = tokio::task::spawn_blocking(move || decoder.process::<T>(raw));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TempStickError::Cancelled),
            decoded = decode => decoded
                .map_err(|e| TempStickError::DecodeTask(format!("Task join error: {}", e)))?,
        }
    }
}

fn require_sensor_id(sensor_id: &str) -> Result<()> {
    if sensor_id.trim().is_empty() {
        return Err(TempStickError::invalid_argument(
            "sensor_id must not be empty",
        ));
    }
    Ok(())
}

fn sensor_endpoint(sensor_id: &str) -> Result<Endpoint> {
    require_sensor_id(sensor_id)?;
    Ok(Endpoint::get("/sensor/{sensor_id}").path_param("sensor_id", sensor_id))
}

fn readings_endpoint(sensor_id: &str, query: &ReadingsQuery) -> Result<Endpoint> {
    require_sensor_id(sensor_id)?;
    Ok(Endpoint::get("/sensor/{sensor_id}/readings")
        .path_param("sensor_id", sensor_id)
        .query("offset", query.offset)
        .query("setting", query.setting)
        .query("start", query.start)
        .query("end", query.end))
}
