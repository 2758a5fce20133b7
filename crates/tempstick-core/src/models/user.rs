//! Account owner profile and report preferences

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EnvelopePayload;
use crate::wire::{flex_bool, WeekdayIndex};

/// The account owner returned by `GET /user`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, rename = "address_1", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, rename = "address_2", skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, rename = "zip", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Preferred temperature scale, `"C"` or `"F"`
    #[serde(default, rename = "temp_pref", skip_serializing_if = "Option::is_none")]
    pub temperature_scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, rename = "use_local_timezone", with = "flex_bool")]
    pub use_local_time_zone: bool,
    #[serde(default, with = "flex_bool")]
    pub use_sensor_groups: bool,
    #[serde(default, with = "flex_bool")]
    pub chart_fill: bool,
    #[serde(default, with = "flex_bool")]
    pub send_reports: bool,
    #[serde(default, with = "flex_bool")]
    pub daily_reports: bool,
    #[serde(default, with = "flex_bool")]
    pub weekly_reports: bool,
    #[serde(default, with = "flex_bool")]
    pub monthly_reports: bool,
    #[serde(default, with = "flex_bool")]
    pub reports_specific_sensors: bool,
    /// Subscription level
    #[serde(default)]
    pub level: i32,
    /// Day the weekly report is sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_report_day: Option<WeekdayIndex>,
    #[serde(default)]
    pub sensor_count: i32,
    #[serde(default, with = "flex_bool")]
    pub is_sub_user: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvelopePayload for User {
    const KEY: &'static str = "user";
    const ALIASES: &'static [&'static str] = &["data"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FormatError, UserEnvelope};
    use serde_json::json;

    #[test]
    fn test_weekly_report_day_is_offset() {
        let user: User =
            serde_json::from_str(r#"{"id":"12345","weekly_report_day":"3"}"#).unwrap();
        assert_eq!(user.weekly_report_day, Some(WeekdayIndex::TUESDAY));
    }

    #[test]
    fn test_booleans_accept_string_or_int() {
        let user: User = serde_json::from_str(
            r#"{"id":"12345","chart_fill":"1","use_local_timezone":0,"is_sub_user":1}"#,
        )
        .unwrap();
        assert!(user.chart_fill);
        assert!(!user.use_local_time_zone);
        assert!(user.is_sub_user);
        assert!(!user.send_reports);
    }

    #[test]
    fn test_envelope_round_trip() {
        let envelope = UserEnvelope {
            kind: "success".to_string(),
            message: "User retrieved successfully".to_string(),
            payload: Some(User {
                id: "user123".to_string(),
                email: Some("test@example.com".to_string()),
                weekly_report_day: Some(WeekdayIndex::WEDNESDAY),
                use_local_time_zone: true,
                ..Default::default()
            }),
            extra: Map::new(),
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["user"]["weekly_report_day"], json!("4"));
        assert_eq!(value["user"]["use_local_timezone"], json!("1"));
        assert_eq!(value["user"]["chart_fill"], json!("0"));

        let back: UserEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(back, envelope);
    }

    #[test]
    fn test_unknown_user_members_are_kept() {
        let user: User =
            serde_json::from_str(r#"{"id":"1","beta_features":["x"],"level":2}"#).unwrap();
        assert_eq!(user.level, 2);
        assert_eq!(user.extra["beta_features"], json!(["x"]));
    }

    #[test]
    fn test_bad_weekday_fails() {
        let result = serde_json::from_str::<User>(r#"{"id":"1","weekly_report_day":"soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_weekday_keeps_format_message_through_envelope() {
        let body = br#"{"type":"success","message":"","user":{"id":"1","weekly_report_day":"soon"}}"#;

        let err = serde_json::from_slice::<UserEnvelope>(body).unwrap_err();
        assert!(err.is_data());
        assert!(FormatError::is_format_message(&err.to_string()), "{}", err);

        let err = serde_json::from_slice::<Option<UserEnvelope>>(body).unwrap_err();
        assert!(FormatError::is_format_message(&err.to_string()), "{}", err);

        let err = serde_json::from_str::<User>(r#"{"id":"1","weekly_report_day":"soon"}"#)
            .unwrap_err();
        assert!(FormatError::is_format_message(&err.to_string()), "{}", err);
    }

    #[test]
    fn test_numeric_weekday_is_a_type_mismatch() {
        let err = serde_json::from_str::<User>(r#"{"id":"1","weekly_report_day":3}"#)
            .unwrap_err();
        assert!(err.is_data());
        assert!(!FormatError::is_format_message(&err.to_string()), "{}", err);
    }
}
