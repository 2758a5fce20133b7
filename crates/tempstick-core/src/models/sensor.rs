//! Sensor detail, sensor list and last-message shapes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EnvelopePayload;
use crate::units;
use crate::wire::flex_bool;

/// Full sensor detail returned by `GET /sensor/{sensor_id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub sensor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_name: Option<String>,
    #[serde(default, rename = "sensor_mac_addr", skip_serializing_if = "Option::is_none")]
    pub sensor_mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_interval: Option<String>,
    /// Last reported temperature in degrees Celsius
    #[serde(default, rename = "last_temp")]
    pub last_temperature: f64,
    #[serde(default)]
    pub last_humidity: f64,
    #[serde(default)]
    pub last_voltage: f64,
    #[serde(default, rename = "battery_pct")]
    pub battery_percentage: f64,
    #[serde(default)]
    pub wifi_connect_time: i32,
    /// Signal strength in dBm
    #[serde(default)]
    pub rssi: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checkin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_checkin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(default, with = "flex_bool")]
    pub offline: bool,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default, with = "flex_bool")]
    pub use_sensor_settings: bool,
    #[serde(default)]
    pub temp_offset: f64,
    #[serde(default)]
    pub humidity_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_temp_below: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_temp_above: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_humidity_below: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_humidity_above: Option<String>,
    #[serde(default)]
    pub connection_sensitivity: f64,
    #[serde(default, with = "flex_bool")]
    pub use_alert_interval: bool,
    #[serde(default, with = "flex_bool")]
    pub use_offset: bool,
    #[serde(default)]
    pub last_messages: Vec<LastMessage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sensor {
    /// Last reported temperature in degrees Fahrenheit
    pub fn last_temperature_fahrenheit(&self) -> f64 {
        units::celsius_to_fahrenheit(self.last_temperature)
    }

    /// Signal quality derived from the RSSI
    pub fn signal_quality(&self) -> String {
        units::signal_quality(f64::from(self.rssi))
    }
}

impl EnvelopePayload for Sensor {
    const KEY: &'static str = "data";
}

/// One of the most recent raw check-ins attached to a sensor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LastMessage {
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, rename = "RSSI", skip_serializing_if = "Option::is_none")]
    pub rssi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_connect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_time_utc: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sensor entry in the `GET /sensors/all` listing
///
/// The listing encodes several numeric fields as strings, unlike the detail
/// endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub sensor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_name: Option<String>,
    #[serde(default, rename = "sensor_mac_addr", skip_serializing_if = "Option::is_none")]
    pub sensor_mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_interval: Option<String>,
    #[serde(default, rename = "last_temp")]
    pub last_temperature: f64,
    #[serde(default)]
    pub last_humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_voltage: Option<String>,
    #[serde(default, rename = "battery_pct")]
    pub battery_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_connect_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checkin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_checkin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(default, with = "flex_bool")]
    pub offline: bool,
    #[serde(default)]
    pub temp_offset: f64,
    #[serde(default)]
    pub humidity_offset: f64,
    #[serde(default)]
    pub group: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of `GET /sensors/all`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorList {
    #[serde(default, rename = "items")]
    pub sensors: Vec<SensorSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvelopePayload for SensorList {
    const KEY: &'static str = "data";
}
