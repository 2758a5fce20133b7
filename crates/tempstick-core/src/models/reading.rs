//! Reading history shapes

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EnvelopePayload;
use crate::units;
use crate::wire::flex_bool;

/// Timestamp layout used by `sensor_time`
pub const SENSOR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single temperature/humidity sample
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, rename = "sensor_time", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Degrees Celsius
    #[serde(rename = "temperature")]
    pub temperature_celsius: f64,
    /// Relative humidity in percent
    #[serde(rename = "humidity")]
    pub humidity_percent: f64,
    #[serde(default, with = "flex_bool")]
    pub offline: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reading {
    /// Parse `timestamp` as a naive date-time, if present and well formed
    pub fn sensor_time(&self) -> Option<NaiveDateTime> {
        self.timestamp
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, SENSOR_TIME_FORMAT).ok())
    }

    /// Temperature in degrees Fahrenheit
    pub fn temperature_fahrenheit(&self) -> f64 {
        units::celsius_to_fahrenheit(self.temperature_celsius)
    }
}

/// Payload of `GET /sensor/{sensor_id}/readings`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadingHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default)]
    pub readings: Vec<Reading>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvelopePayload for ReadingHistory {
    const KEY: &'static str = "data";
}
