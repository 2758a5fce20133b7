//! Request types for the TempStick client

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::param::{enum_param, ParamValue, WireEnum};

// =============================================================================
// Reading Range
// =============================================================================

/// Time period accepted by the `setting` query parameter of the readings endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadingRange {
    #[default]
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "24_hours")]
    Last24Hours,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "last_week")]
    LastWeek,
    #[serde(rename = "7_days")]
    Last7Days,
    #[serde(rename = "this_week")]
    ThisWeek,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "30_days")]
    Last30Days,
    #[serde(rename = "last_month")]
    LastMonth,
    #[serde(rename = "three_months")]
    ThreeMonths,
    /// Use the `start` and `end` dates of the query
    #[serde(rename = "custom")]
    Custom,
}

impl ReadingRange {
    pub const ALL: [ReadingRange; 11] = [
        Self::Today,
        Self::Last24Hours,
        Self::Yesterday,
        Self::LastWeek,
        Self::Last7Days,
        Self::ThisWeek,
        Self::ThisMonth,
        Self::Last30Days,
        Self::LastMonth,
        Self::ThreeMonths,
        Self::Custom,
    ];

    /// Name sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Last24Hours => "24_hours",
            Self::Yesterday => "yesterday",
            Self::LastWeek => "last_week",
            Self::Last7Days => "7_days",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::Last30Days => "30_days",
            Self::LastMonth => "last_month",
            Self::ThreeMonths => "three_months",
            Self::Custom => "custom",
        }
    }
}

impl WireEnum for ReadingRange {
    fn wire_name(&self) -> Option<&'static str> {
        Some(self.as_str())
    }

    fn ordinal(&self) -> i64 {
        *self as i64
    }
}

impl ParamValue for ReadingRange {
    fn to_param(&self) -> String {
        enum_param(self)
    }
}

impl fmt::Display for ReadingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|range| range.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown reading range: {}", s))
    }
}

// =============================================================================
// Readings Query
// =============================================================================

/// Optional parameters of a reading-history lookup
///
/// The default asks for today's readings with no offset or date bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingsQuery {
    /// Timezone offset in hours
    pub offset: Option<i32>,
    pub setting: Option<ReadingRange>,
    /// First day, used with [`ReadingRange::Custom`]
    pub start: Option<NaiveDate>,
    /// Last day, used with [`ReadingRange::Custom`]
    pub end: Option<NaiveDate>,
}

impl Default for ReadingsQuery {
    fn default() -> Self {
        Self {
            offset: None,
            setting: Some(ReadingRange::Today),
            start: None,
            end: None,
        }
    }
}

impl ReadingsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query a fixed period
    pub fn range(setting: ReadingRange) -> Self {
        Self {
            setting: Some(setting),
            ..Self::default()
        }
    }

    /// Query an explicit date span
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            setting: Some(ReadingRange::Custom),
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn setting(mut self, setting: Option<ReadingRange>) -> Self {
        self.setting = setting;
        self
    }

    pub fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }
}
