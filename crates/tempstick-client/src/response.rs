//! Response decoding and status classification

use std::io::{self, Read};

use bytes::Bytes;
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiErrorKind, Headers, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// How a response body is turned into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMode {
    /// Read the body as UTF-8 text; parse failures keep the text for diagnostics
    Text,
    /// Treat the body as gzip-compressed UTF-8 JSON
    #[default]
    Stream,
}

/// A completed response, detached from the transport
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Headers,
    /// Entire body; empty when the response had no content
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }
}

/// Decodes responses into typed results
///
/// Built once per client and shared between concurrent calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseDecoder {
    mode: DecodeMode,
}

struct ObjectResponse<T> {
    object: Option<T>,
    text: String,
}

impl ResponseDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Turn a response into `T`, or classify why it cannot be
    ///
    /// - 200 with a payload returns the payload
    /// - 200 with no body or a JSON `null` fails with [`ApiErrorKind::NullPayload`]
    /// - any other status fails with [`ApiErrorKind::UnexpectedStatus`]; the
    ///   body is kept as the partial result when it parses as JSON
    pub fn process<T: DeserializeOwned>(&self, response: RawResponse) -> Result<T> {
        let RawResponse {
            status,
            headers,
            body,
        } = response;

        if status != 200 {
            let text = error_body_text(&body);
            warn!(status, body_len = body.len(), "Unexpected response status");
            let partial = text
                .as_deref()
                .and_then(|t| serde_json::from_str::<serde_json::Value>(t).ok());
            let err: ApiError = ApiError::<()>::new(
                ApiErrorKind::UnexpectedStatus,
                format!(
                    "The HTTP status code of the response was not expected ({}).",
                    status
                ),
                status,
                text.as_deref(),
                headers,
            )
            .with_result(partial);
            return Err(err.into());
        }

        let decoded = self.read_object::<T>(status, &headers, &body)?;
        match decoded.object {
            Some(object) => Ok(object),
            None => {
                warn!(status, "Response carried no payload");
                let err: ApiError = ApiError::new(
                    ApiErrorKind::NullPayload,
                    format!("{} was null which was not expected.", short_type_name::<T>()),
                    status,
                    Some(&decoded.text),
                    headers,
                );
                Err(err.into())
            }
        }
    }

    fn read_object<T: DeserializeOwned>(
        &self,
        status: u16,
        headers: &Headers,
        body: &Bytes,
    ) -> Result<ObjectResponse<T>> {
        if body.is_empty() {
            debug!("Response body is empty");
            return Ok(ObjectResponse {
                object: None,
                text: String::new(),
            });
        }

        match self.mode {
            DecodeMode::Text => {
                let text = String::from_utf8_lossy(body).into_owned();
                match serde_json::from_str::<Option<T>>(&text) {
                    Ok(object) => Ok(ObjectResponse { object, text }),
                    Err(e) => {
                        warn!(error = %e, "Could not deserialize response body string");
                        let err: ApiError = ApiError::new(
                            ApiErrorKind::from_json_error(&e),
                            format!(
                                "Could not deserialize the response body string as {}.",
                                short_type_name::<T>()
                            ),
                            status,
                            Some(&text),
                            headers.clone(),
                        )
                        .with_source(e);
                        Err(err.into())
                    }
                }
            }
            DecodeMode::Stream => {
                let json = gunzip(body).map_err(|e| {
                    warn!(error = %e, "Could not decompress response body stream");
                    let err: ApiError = ApiError::new(
                        ApiErrorKind::Deserialization,
                        format!(
                            "Could not decompress the response body stream for {}.",
                            short_type_name::<T>()
                        ),
                        status,
                        Some(""),
                        headers.clone(),
                    )
                    .with_source(e);
                    err
                })?;

                match serde_json::from_slice::<Option<T>>(&json) {
                    Ok(object) => Ok(ObjectResponse {
                        object,
                        text: String::new(),
                    }),
                    Err(e) => {
                        warn!(error = %e, "Could not deserialize response body stream");
                        let err: ApiError = ApiError::new(
                            ApiErrorKind::from_json_error(&e),
                            format!(
                                "Could not deserialize the response body stream as {}.",
                                short_type_name::<T>()
                            ),
                            status,
                            Some(""),
                            headers.clone(),
                        )
                        .with_source(e);
                        Err(err.into())
                    }
                }
            }
        }
    }
}

/// Largest inflated body accepted from a gzip response, in bytes
pub const MAX_INFLATED_LEN: u64 = 64 * 1024 * 1024;

/// Decompress a gzip body of at most [`MAX_INFLATED_LEN`] inflated bytes
pub fn gunzip(data: &[u8]) -> io::Result<Vec<u8>> {
    gunzip_limited(data, MAX_INFLATED_LEN)
}

/// Decompress a gzip body, failing with `InvalidData` past `limit` inflated bytes
pub fn gunzip_limited(data: &[u8], limit: u64) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)?;
    if out.len() as u64 > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("inflated body exceeds {} bytes", limit),
        ));
    }
    Ok(out)
}

/// Text of an error body; gzip bodies are inflated first
fn error_body_text(body: &Bytes) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    if body.starts_with(&GZIP_MAGIC) {
        if let Ok(inflated) = gunzip(body) {
            return Some(String::from_utf8_lossy(&inflated).into_owned());
        }
    }
    Some(String::from_utf8_lossy(body).into_owned())
}

/// Type name without module paths, e.g. `Envelope<User>`
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or_default());
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or_default());
    out
}
