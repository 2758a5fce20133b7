//! tempstick-core - Wire converters and data types for the TempStick API
//!
//! The TempStick REST API is inconsistent about how it encodes some scalars:
//! booleans arrive as `"1"`/`"0"` strings on one endpoint and as `1`/`0`
//! integers on another, and the weekly report day is a one-based string.
//! This crate holds the converters that normalise those encodings and the
//! data-transfer shapes the client deserializes into.
//!
//! # Example
//!
//! ```rust
//! use tempstick_core::{Reading, WeekdayIndex};
//!
//! let reading: Reading = serde_json::from_str(
//!     r#"{"sensor_time":"2024-03-01 10:00:00","temperature":21.5,"humidity":40,"offline":"0"}"#,
//! ).unwrap();
//! assert!(!reading.offline);
//!
//! let day: WeekdayIndex = serde_json::from_str(r#""3""#).unwrap();
//! assert_eq!(day, WeekdayIndex::TUESDAY);
//! ```

pub mod error;
pub mod models;
pub mod units;
pub mod wire;

pub use error::FormatError;
pub use models::*;
pub use wire::WeekdayIndex;
