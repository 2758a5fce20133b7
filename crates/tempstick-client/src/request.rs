//! Endpoint descriptors and URL construction

use reqwest::Method;
use url::Url;

use crate::error::{Result, TempStickError};
use crate::param::ParamValue;

/// Query parameter of an endpoint, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub name: String,
    /// Stringified value before percent-encoding; `None` leaves it out of the URL
    pub value: Option<String>,
}

/// One API call: method, path template and query parameters
///
/// The path template may contain `{name}` placeholders which are filled from
/// [`Endpoint::path_param`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: Method,
    template: String,
    path_params: Vec<(String, String)>,
    query: Vec<QueryParam>,
}

impl Endpoint {
    /// Describe a GET request
    pub fn get(template: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            template: template.into(),
            path_params: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn query_params(&self) -> &[QueryParam] {
        &self.query
    }

    /// Bind a `{name}` placeholder of the path template
    pub fn path_param<V: ParamValue + ?Sized>(mut self, name: &str, value: &V) -> Self {
        self.path_params.push((name.to_string(), value.to_param()));
        self
    }

    /// Append an optional query parameter; `None` values are omitted from the URL
    pub fn query<V: ParamValue>(mut self, name: &str, value: Option<V>) -> Self {
        self.query.push(QueryParam {
            name: name.to_string(),
            value: value.map(|v| v.to_param()),
        });
        self
    }

    /// Path with every placeholder replaced by its percent-encoded value
    pub fn path(&self) -> Result<String> {
        let mut path = self.template.clone();
        for (name, value) in &self.path_params {
            let placeholder = format!("{{{}}}", name);
            if !path.contains(&placeholder) {
                return Err(TempStickError::invalid_argument(format!(
                    "path template '{}' has no placeholder '{}'",
                    self.template, placeholder
                )));
            }
            path = path.replace(&placeholder, &urlencoding::encode(value));
        }

        if let Some(start) = path.find('{') {
            let rest = &path[start..];
            let end = rest.find('}').map(|i| i + 1).unwrap_or(rest.len());
            return Err(TempStickError::invalid_argument(format!(
                "path parameter {} is not bound",
                &rest[..end]
            )));
        }

        Ok(path)
    }

    /// Query string without the leading `?`; empty when no parameter has a value
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .filter_map(|param| {
                param.value.as_ref().map(|value| {
                    format!(
                        "{}={}",
                        urlencoding::encode(&param.name),
                        urlencoding::encode(value)
                    )
                })
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Absolute URL text for this endpoint under `base_url`
    ///
    /// Trailing slashes of `base_url` are dropped before the path is appended.
    pub fn url_string(&self, base_url: &str) -> Result<String> {
        let mut url = base_url.trim_end_matches('/').to_string();
        url.push_str(&self.path()?);

        let query = self.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    /// Parsed absolute URL for this endpoint under `base_url`
    pub fn build_url(&self, base_url: &str) -> Result<Url> {
        Ok(Url::parse(&self.url_string(base_url)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReadingRange;

    const BASE: &str = "https://tempstickapi.com/api/v1";

    #[test]
    fn test_fixed_paths() {
        assert_eq!(
            Endpoint::get("/user").url_string(BASE).unwrap(),
            "https://tempstickapi.com/api/v1/user"
        );
        assert_eq!(
            Endpoint::get("/sensors/all")
                .url_string("https://tempstickapi.com/api/v1//")
                .unwrap(),
            "https://tempstickapi.com/api/v1/sensors/all"
        );
    }

    #[test]
    fn test_placeholder_is_encoded_and_null_query_omitted() {
        let endpoint = Endpoint::get("/sensor/{sensor_id}/readings")
            .path_param("sensor_id", "AB 12")
            .query("offset", None::<i32>)
            .query("setting", Some("today"));

        assert_eq!(
            endpoint.url_string(BASE).unwrap(),
            "https://tempstickapi.com/api/v1/sensor/AB%2012/readings?setting=today"
        );
    }

    #[test]
    fn test_query_order_follows_declaration() {
        let endpoint = Endpoint::get("/sensor/{sensor_id}/readings")
            .path_param("sensor_id", "x")
            .query("offset", Some(-5i32))
            .query("setting", Some(ReadingRange::Custom))
            .query("start", Some("2024-01-01"))
            .query("end", Some("2024-01-31"));

        assert_eq!(
            endpoint.query_string(),
            "offset=-5&setting=custom&start=2024-01-01&end=2024-01-31"
        );
    }

    #[test]
    fn test_no_query_means_no_question_mark() {
        let endpoint = Endpoint::get("/sensor/{sensor_id}/readings")
            .path_param("sensor_id", "x")
            .query("offset", None::<i32>);
        assert!(!endpoint.url_string(BASE).unwrap().contains('?'));
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let endpoint = Endpoint::get("/sensor/{sensor_id}")
            .path_param("sensor_id", "a/b?c&d=é")
            .query("note", Some("x y+z"));
        assert_eq!(
            endpoint.url_string(BASE).unwrap(),
            "https://tempstickapi.com/api/v1/sensor/a%2Fb%3Fc%26d%3D%C3%A9?note=x%20y%2Bz"
        );
    }

    #[test]
    fn test_unbound_placeholder_is_rejected() {
        let err = Endpoint::get("/sensor/{sensor_id}").path().unwrap_err();
        assert!(matches!(err, TempStickError::InvalidArgument(_)));

        let err = Endpoint::get("/user").path_param("sensor_id", "x").path().unwrap_err();
        assert!(matches!(err, TempStickError::InvalidArgument(_)));
    }

    #[test]
    fn test_query_params_keep_unset_entries() {
        let endpoint = Endpoint::get("/user")
            .query("verbose", Some(true))
            .query("limit", None::<u32>);
        assert_eq!(endpoint.query_string(), "verbose=true");
        assert_eq!(endpoint.query_params().len(), 2);
        assert!(endpoint.query_params()[1].value.is_none());
    }

    #[test]
    fn test_build_url_parses() {
        let url = Endpoint::get("/sensor/{sensor_id}")
            .path_param("sensor_id", "TS1")
            .build_url(BASE)
            .unwrap();
        assert_eq!(url.path(), "/api/v1/sensor/TS1");

        assert!(Endpoint::get("/user").build_url("not a url").is_err());
    }
}
