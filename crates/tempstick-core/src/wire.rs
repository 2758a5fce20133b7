//! Wire-format converters
//!
//! Two fields of the API are not encoded the way their meaning suggests:
//!
//! - **Flexible booleans** arrive as `"1"`/`"0"` strings or `1`/`0` numbers
//!   depending on whether the user has ever changed the setting. Reads accept
//!   both; writes always produce the string form, the one the API accepts.
//! - **Weekday indices** travel as one-based strings (`"1"` = Sunday) while
//!   the in-memory value is zero-based.

use std::fmt;

use chrono::Weekday;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::FormatError;

// =============================================================================
// Flexible Boolean
// =============================================================================

/// Decode a flexible boolean from an already-parsed JSON value
///
/// `"1"` and `1` are `true`; everything else, including `"0"`, `0`, other
/// strings, other numbers, JSON booleans and `null`, is `false`.
pub fn decode_bool(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("1"),
        serde_json::Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Encode a boolean in its canonical wire form
pub fn encode_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Serde adapter for flexible booleans, used as `#[serde(with = "flex_bool")]`
pub mod flex_bool {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(encode_bool(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(decode_bool(&value))
    }
}

// =============================================================================
// Offset Weekday
// =============================================================================

/// Zero-based weekday index, Sunday = 0
///
/// The API sends `"1"`..`"7"` for Sunday..Saturday. Values outside that range
/// are carried through unchanged (`"0"` becomes index -1, `"9"` becomes 8);
/// use [`WeekdayIndex::weekday`] to get a calendar day when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct WeekdayIndex(pub i32);

impl WeekdayIndex {
    pub const SUNDAY: Self = Self(0);
    pub const MONDAY: Self = Self(1);
    pub const TUESDAY: Self = Self(2);
    pub const WEDNESDAY: Self = Self(3);
    pub const THURSDAY: Self = Self(4);
    pub const FRIDAY: Self = Self(5);
    pub const SATURDAY: Self = Self(6);

    /// Zero-based index
    pub fn index(self) -> i32 {
        self.0
    }

    /// Calendar weekday, if the index is in `0..=6`
    pub fn weekday(self) -> Option<Weekday> {
        match self.0 {
            0 => Some(Weekday::Sun),
            1 => Some(Weekday::Mon),
            2 => Some(Weekday::Tue),
            3 => Some(Weekday::Wed),
            4 => Some(Weekday::Thu),
            5 => Some(Weekday::Fri),
            6 => Some(Weekday::Sat),
            _ => None,
        }
    }

    /// Parse the one-based wire string
    pub fn from_wire(value: &str) -> Result<Self, FormatError> {
        value
            .trim()
            .parse::<i32>()
            .map(|n| Self(n.wrapping_sub(1)))
            .map_err(|_| FormatError::InvalidWeekday(value.to_string()))
    }

    /// One-based wire string
    pub fn to_wire(self) -> String {
        self.0.wrapping_add(1).to_string()
    }
}

impl From<Weekday> for WeekdayIndex {
    fn from(day: Weekday) -> Self {
        Self(day.num_days_from_sunday() as i32)
    }
}

impl fmt::Display for WeekdayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weekday() {
            Some(day) => write!(f, "{}", day),
            None => write!(f, "weekday#{}", self.0),
        }
    }
}

impl Serialize for WeekdayIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for WeekdayIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_wire(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Flag {
        #[serde(default, with = "flex_bool")]
        on: bool,
    }

    fn decode(raw: &str) -> bool {
        serde_json::from_str::<Flag>(&format!(r#"{{"on":{}}}"#, raw))
            .unwrap()
            .on
    }

    #[test]
    fn test_flex_bool_truthy_tokens() {
        assert!(decode(r#""1""#));
        assert!(decode("1"));
        assert!(decode("1.0"));
    }

    #[test]
    fn test_flex_bool_falsy_tokens() {
        for raw in [r#""0""#, "0", r#""""#, "2", r#""true""#, "true", "null", "[1]", r#"{"a":1}"#] {
            assert!(!decode(raw), "{} should decode to false", raw);
        }
    }

    #[test]
    fn test_flex_bool_absent_is_false() {
        let flag: Flag = serde_json::from_str("{}").unwrap();
        assert!(!flag.on);
    }

    #[test]
    fn test_flex_bool_writes_strings() {
        assert_eq!(serde_json::to_value(Flag { on: true }).unwrap(), json!({"on": "1"}));
        assert_eq!(serde_json::to_value(Flag { on: false }).unwrap(), json!({"on": "0"}));
    }

    #[test]
    fn test_decode_bool_from_value() {
        assert!(decode_bool(&json!("1")));
        assert!(decode_bool(&json!(1)));
        assert!(!decode_bool(&json!("0")));
        assert!(!decode_bool(&json!(0)));
        assert!(!decode_bool(&json!("")));
        assert!(!decode_bool(&json!(2)));
        assert!(!decode_bool(&serde_json::Value::Null));
    }

    #[test]
    fn test_weekday_round_trip_over_valid_range() {
        for n in 1..=7 {
            let wire = n.to_string();
            let day = WeekdayIndex::from_wire(&wire).unwrap();
            assert_eq!(day.index(), n - 1);
            assert_eq!(day.to_wire(), wire);
        }
    }

    #[test]
    fn test_weekday_first_and_last() {
        assert_eq!(WeekdayIndex::from_wire("1").unwrap().weekday(), Some(Weekday::Sun));
        assert_eq!(WeekdayIndex::from_wire("7").unwrap().weekday(), Some(Weekday::Sat));
    }

    #[test]
    fn test_weekday_out_of_range_passes_through() {
        let zero = WeekdayIndex::from_wire("0").unwrap();
        assert_eq!(zero.index(), -1);
        assert_eq!(zero.weekday(), None);
        assert_eq!(zero.to_wire(), "0");

        let nine = WeekdayIndex::from_wire("9").unwrap();
        assert_eq!(nine.index(), 8);
        assert_eq!(nine.weekday(), None);
    }

    #[test]
    fn test_weekday_rejects_non_numeric() {
        assert_eq!(
            WeekdayIndex::from_wire("abc"),
            Err(FormatError::InvalidWeekday("abc".to_string()))
        );

        let err = serde_json::from_str::<WeekdayIndex>(r#""Tuesday""#).unwrap_err();
        assert!(FormatError::is_format_message(&err.to_string()));
    }

    #[test]
    fn test_weekday_serde() {
        let day: WeekdayIndex = serde_json::from_str(r#""3""#).unwrap();
        assert_eq!(day, WeekdayIndex::TUESDAY);
        assert_eq!(serde_json::to_string(&WeekdayIndex::WEDNESDAY).unwrap(), r#""4""#);
    }

    #[test]
    fn test_weekday_from_chrono() {
        assert_eq!(WeekdayIndex::from(Weekday::Sun), WeekdayIndex::SUNDAY);
        assert_eq!(WeekdayIndex::from(Weekday::Sat), WeekdayIndex::SATURDAY);
        assert_eq!(WeekdayIndex::MONDAY.to_string(), "Mon");
    }
}
