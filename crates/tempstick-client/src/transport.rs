//! HTTP transport with default headers

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use crate::config::{ClientConfig, API_KEY_HEADER};
use crate::error::{Result, TempStickError};

/// A `reqwest` client plus the headers attached to every request
///
/// `reqwest` does not expose the default headers of a built [`Client`], so
/// they are kept here where the client can check that an API key is present.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    default_headers: HeaderMap,
}

impl Transport {
    /// Wrap an existing client with no default headers
    pub fn new(client: Client) -> Self {
        Self {
            client,
            default_headers: HeaderMap::new(),
        }
    }

    /// Build the underlying client from timeouts and user agent in `config`
    ///
    /// The API key of `config` is not applied here; see [`Transport::with_api_key`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_millis(config.timeouts.request_ms))
            .connect_timeout(Duration::from_millis(config.timeouts.connect_ms));

        if let Some(agent) = &config.user_agent {
            let mut headers = HeaderMap::new();
            let value = HeaderValue::from_str(agent).map_err(|e| {
                TempStickError::invalid_argument(format!("Invalid user agent: {}", e))
            })?;
            headers.insert(USER_AGENT, value);
            builder = builder.default_headers(headers);
        }

        Ok(Self::new(builder.build()?))
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            TempStickError::invalid_argument(format!("Invalid header name '{}': {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            TempStickError::invalid_argument(format!("Invalid value for header '{}': {}", name, e))
        })?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Attach the API key under the default `X-API-KEY` header
    pub fn with_api_key(self, api_key: &str) -> Result<Self> {
        self.with_api_key_header(API_KEY_HEADER, api_key)
    }

    /// Attach the API key under a custom header name
    ///
    /// Blank keys are rejected. The header value is marked sensitive so it is
    /// not printed by `Debug`.
    pub fn with_api_key_header(self, header: &str, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(TempStickError::invalid_argument(
                "API key must not be empty or whitespace",
            ));
        }

        let mut transport = self.with_header(header, api_key)?;
        if let Ok(name) = HeaderName::from_bytes(header.as_bytes()) {
            if let Some(value) = transport.default_headers.get_mut(&name) {
                value.set_sensitive(true);
            }
        }
        Ok(transport)
    }

    /// Whether a default header is set (case-insensitive)
    pub fn has_header(&self, name: &str) -> bool {
        HeaderName::from_bytes(name.as_bytes())
            .map(|name| self.default_headers.contains_key(name))
            .unwrap_or(false)
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Start a request with the default headers applied
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.default_headers.clone())
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_is_required_to_be_non_blank() {
        for key in ["", "   ", "\t\n"] {
            let err = Transport::default().with_api_key(key).unwrap_err();
            assert!(matches!(err, TempStickError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_api_key_header_is_sensitive() {
        let transport = Transport::default().with_api_key("secret").unwrap();
        assert!(transport.has_header("x-api-key"));
        assert!(transport.has_header("X-API-KEY"));

        let value = &transport.default_headers()["x-api-key"];
        assert!(value.is_sensitive());
        assert!(!format!("{:?}", transport).contains("secret"));
    }

    #[test]
    fn test_custom_header() {
        let transport = Transport::default()
            .with_api_key_header("X-Alt-Key", "k")
            .unwrap();
        assert!(transport.has_header("x-alt-key"));
        assert!(!transport.has_header(API_KEY_HEADER));

        assert!(Transport::default().with_header("bad header", "v").is_err());
        assert!(!transport.has_header("bad header"));
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::builder()
            .user_agent("tempstick-test/1.0")
            .request_timeout_ms(1_000)
            .build();
        let transport = Transport::from_config(&config).unwrap();
        assert!(transport.default_headers().is_empty());

        let bad = ClientConfig::builder().user_agent("bad\nagent").build();
        assert!(Transport::from_config(&bad).is_err());
    }
}
