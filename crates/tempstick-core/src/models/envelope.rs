//! Response envelope shared by every endpoint

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names the JSON member that carries a payload inside an [`Envelope`]
pub trait EnvelopePayload {
    /// Member name written on serialization
    const KEY: &'static str;
    /// Additional member names accepted on read
    const ALIASES: &'static [&'static str] = &[];
}

/// Outer object of every API response
///
/// `type` and `message` are present on both success and failure. The payload
/// member name depends on the endpoint (see [`EnvelopePayload`]). Any other
/// member is kept in `extra` and written back on serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Envelope<T> {
    /// Status-like `type` member, usually `"success"` or `"error"`
    pub kind: String,
    pub message: String,
    pub payload: Option<T>,
    pub extra: Map<String, Value>,
}

impl<T> Envelope<T> {
    /// Whether the API reported success in the `type` member
    pub fn is_success(&self) -> bool {
        self.kind.eq_ignore_ascii_case("success")
    }

    /// Borrow the payload
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Take the payload, dropping the metadata
    pub fn into_payload(self) -> Option<T> {
        self.payload
    }
}

fn take_string<E: de::Error>(map: &mut Map<String, Value>, key: &str) -> Result<String, E> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(E::custom(format!(
            "expected a string for `{}`, found {}",
            key, other
        ))),
    }
}

impl<'de, T> Deserialize<'de> for Envelope<T>
where
    T: EnvelopePayload + DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;

        let kind = take_string(&mut extra, "type")?;
        let message = take_string(&mut extra, "message")?;

        let raw = std::iter::once(T::KEY)
            .chain(T::ALIASES.iter().copied())
            .find_map(|key| extra.remove(key));

        let payload = match raw {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value).map_err(de::Error::custom)?),
        };

        Ok(Self {
            kind,
            message,
            payload,
            extra,
        })
    }
}

impl<T> Serialize for Envelope<T>
where
    T: EnvelopePayload + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.extra.len()))?;
        map.serialize_entry("type", &self.kind)?;
        map.serialize_entry("message", &self.message)?;
        if let Some(payload) = &self.payload {
            map.serialize_entry(T::KEY, payload)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: String,
    }

    impl EnvelopePayload for Sample {
        const KEY: &'static str = "data";
        const ALIASES: &'static [&'static str] = &["sample"];
    }

    #[test]
    fn test_known_and_unknown_members() {
        let envelope: Envelope<Sample> = serde_json::from_value(json!({
            "type": "success",
            "message": "ok",
            "data": {"id": "p1"},
            "request_id": "abc",
            "paging": {"page": 1}
        }))
        .unwrap();

        assert!(envelope.is_success());
        assert_eq!(envelope.message, "ok");
        assert_eq!(envelope.payload(), Some(&Sample { id: "p1".to_string() }));
        assert_eq!(envelope.extra.len(), 2);
        assert_eq!(envelope.extra["request_id"], json!("abc"));
    }

    #[test]
    fn test_lossless_reserialization() {
        let original = json!({
            "type": "success",
            "message": "ok",
            "data": {"id": "p1"},
            "request_id": "abc"
        });
        let envelope: Envelope<Sample> = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&envelope).unwrap(), original);
    }

    #[test]
    fn test_alias_and_missing_payload() {
        let aliased: Envelope<Sample> =
            serde_json::from_value(json!({"type": "success", "sample": {"id": "p2"}})).unwrap();
        assert_eq!(aliased.payload.unwrap().id, "p2");

        let empty: Envelope<Sample> =
            serde_json::from_value(json!({"type": "error", "message": "nope", "data": null}))
                .unwrap();
        assert!(!empty.is_success());
        assert!(empty.payload.is_none());
        assert!(empty.extra.is_empty());
    }

    #[test]
    fn test_non_string_metadata_is_rejected() {
        let result = serde_json::from_value::<Envelope<Sample>>(json!({"type": 5}));
        assert!(result.is_err());
    }
}
