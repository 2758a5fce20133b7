//! Error types for TempStick client operations

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use reqwest::header::HeaderMap;
use tempstick_core::FormatError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for TempStick client operations
pub type Result<T> = std::result::Result<T, TempStickError>;

/// Response headers as a multi-valued map, keyed by lower-case header name
pub type Headers = BTreeMap<String, Vec<String>>;

/// Maximum number of characters of a response body kept in an [`ApiError`]
pub const SNIPPET_LIMIT: usize = 512;

/// Errors that can occur during TempStick client operations
#[derive(Error, Debug)]
pub enum TempStickError {
    /// Caller misuse detected before any network I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The API answered but the response could not be used
    #[error(transparent)]
    Api(#[from] ApiError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The blocking decode task panicked or was aborted
    #[error("Decode task failed: {0}")]
    DecodeTask(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The caller's cancellation token fired while the request was in flight
    #[error("Request cancelled")]
    Cancelled,
}

impl TempStickError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// The API error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Kind of API error, if this is one
    pub fn kind(&self) -> Option<ApiErrorKind> {
        self.api_error().map(ApiError::kind)
    }

    /// HTTP status code carried by an API error
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(ApiError::status_code)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Classification of a failed response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// A scalar's wire encoding violates its grammar
    Format,
    /// The body is not valid JSON or does not match the expected shape
    Deserialization,
    /// Status 200 with no payload
    NullPayload,
    /// Any status other than 200
    UnexpectedStatus,
}

impl ApiErrorKind {
    /// Classify a JSON error raised while decoding a response body
    pub fn from_json_error(err: &serde_json::Error) -> Self {
        if err.is_data() && FormatError::is_format_message(&err.to_string()) {
            Self::Format
        } else {
            Self::Deserialization
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Format => "format error",
            Self::Deserialization => "deserialization error",
            Self::NullPayload => "null payload",
            Self::UnexpectedStatus => "unexpected status",
        };
        f.write_str(name)
    }
}

/// Diagnostic error for a response that could not be turned into a result
///
/// Carries the status code, at most [`SNIPPET_LIMIT`] characters of the
/// response body, the response headers and, when a JSON error triggered it,
/// that error as [`source`](StdError::source). `T` is the type of any partial
/// result recovered before the failure was detected; the client itself
/// stores the body of non-200 responses as a [`serde_json::Value`] when it
/// parses.
#[derive(Debug)]
pub struct ApiError<T = serde_json::Value> {
    kind: ApiErrorKind,
    message: String,
    status_code: u16,
    snippet: Option<String>,
    headers: Headers,
    result: Option<T>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl<T> ApiError<T> {
    /// Create an error; `response` is cut to [`SNIPPET_LIMIT`] characters
    pub fn new(
        kind: ApiErrorKind,
        message: impl Into<String>,
        status_code: u16,
        response: Option<&str>,
        headers: Headers,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
            snippet: response.map(truncate_snippet),
            headers,
            result: None,
            source: None,
        }
    }

    /// Attach the error that caused this one
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach a partial result, changing the result type
    pub fn with_result<U>(self, result: Option<U>) -> ApiError<U> {
        ApiError {
            kind: self.kind,
            message: self.message,
            status_code: self.status_code,
            snippet: self.snippet,
            headers: self.headers,
            result,
            source: self.source,
        }
    }

    /// Convert the partial result, if any
    pub fn map_result<U>(self, f: impl FnOnce(T) -> U) -> ApiError<U> {
        let ApiError {
            kind,
            message,
            status_code,
            snippet,
            headers,
            result,
            source,
        } = self;
        ApiError {
            kind,
            message,
            status_code,
            snippet,
            headers,
            result: result.map(f),
            source,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Message without the status and snippet suffix
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Leading characters of the response body, `None` when no text was available
    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// All values of a header, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Partial result recovered before the failure
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<T> {
        self.result
    }
}

impl<T> fmt::Display for ApiError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\nStatus: {}\nResponse: \n{}",
            self.message,
            self.status_code,
            self.snippet.as_deref().unwrap_or("(null)")
        )
    }
}

impl<T: fmt::Debug> StdError for ApiError<T> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn StdError + 'static))
    }
}

/// First [`SNIPPET_LIMIT`] characters of a response body
pub fn truncate_snippet(text: &str) -> String {
    text.chars().take(SNIPPET_LIMIT).collect()
}

/// Collect a header map into a multi-valued map
pub fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn content_type_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/json".to_string()],
        );
        headers
    }

    #[test]
    fn test_message_embeds_status_and_response() {
        let err: ApiError = ApiError::new(
            ApiErrorKind::UnexpectedStatus,
            "Test error message",
            400,
            Some("Error response"),
            content_type_headers(),
        );

        let text = err.to_string();
        assert!(text.contains("Test error message"));
        assert!(text.contains("400"));
        assert!(text.contains("Error response"));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.header("Content-Type").unwrap(), ["application/json"]);
    }

    #[test]
    fn test_missing_response_renders_null() {
        let err: ApiError = ApiError::new(
            ApiErrorKind::UnexpectedStatus,
            "Test",
            500,
            None,
            Headers::new(),
        );
        assert!(err.snippet().is_none());
        assert!(err.to_string().ends_with("(null)"));
    }

    #[test]
    fn test_long_response_is_truncated() {
        let long = "x".repeat(1000);
        let err: ApiError = ApiError::new(
            ApiErrorKind::UnexpectedStatus,
            "Test",
            404,
            Some(&long),
            Headers::new(),
        );
        assert_eq!(err.snippet().unwrap(), &long[..512]);
        assert!(err.to_string().contains(&long[..512]));
        assert!(!err.to_string().contains(&long[..513]));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let text = "é".repeat(600);
        let snippet = truncate_snippet(&text);
        assert_eq!(snippet.chars().count(), 512);
        assert_eq!(snippet.len(), 1024);
    }

    #[test]
    fn test_source_and_result() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::<()>::new(
            ApiErrorKind::Deserialization,
            "bad body",
            200,
            Some("{"),
            Headers::new(),
        )
        .with_source(inner)
        .with_result(Some(42u32));

        assert!(err.source().is_some());
        assert_eq!(err.result(), Some(&42));

        let mapped = err.map_result(|n| n.to_string());
        assert_eq!(mapped.into_result().as_deref(), Some("42"));
    }

    #[test]
    fn test_collect_headers_keeps_every_value() {
        let mut map = HeaderMap::new();
        map.append("x-custom-header", HeaderValue::from_static("value1"));
        map.append("x-custom-header", HeaderValue::from_static("value2"));
        map.insert("content-type", HeaderValue::from_static("application/json"));

        let headers = collect_headers(&map);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-custom-header"], vec!["value1", "value2"]);
    }

    #[test]
    fn test_error_accessors() {
        let api: ApiError = ApiError::new(
            ApiErrorKind::NullPayload,
            "Envelope<Sensor> was null which was not expected.",
            200,
            Some(""),
            Headers::new(),
        );
        let err = TempStickError::from(api);
        assert_eq!(err.kind(), Some(ApiErrorKind::NullPayload));
        assert_eq!(err.status_code(), Some(200));
        assert!(!err.is_cancelled());
        assert!(TempStickError::Cancelled.is_cancelled());
        assert!(TempStickError::invalid_argument("x").api_error().is_none());
    }
}
