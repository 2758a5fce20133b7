//! TempStick Client Library
//!
//! Provides a typed HTTP client for the TempStick sensor REST API.
//!
//! # Example
//!
//! ```rust,no_run
//! use tempstick_client::{ReadingRange, ReadingsQuery, TempStickClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = TempStickClient::new("my-api-key")?;
//!
//!     // Account owner
//!     let user = client.get_current_user().await?;
//!
//!     // Every sensor on the account
//!     let sensors = client.list_sensors().await?;
//!
//!     // Last 24 hours of readings for one sensor
//!     let query = ReadingsQuery::range(ReadingRange::Last24Hours);
//!     let history = client.get_readings("TS00EMA9JZ", &query).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! A response that cannot be turned into a result fails with
//! [`TempStickError::Api`]. The [`ApiError`] inside carries the status code,
//! the first 512 characters of the body and the response headers:
//!
//! ```rust,ignore
//! match client.get_sensor("TS1").await {
//!     Err(TempStickError::Api(err)) if err.kind() == ApiErrorKind::UnexpectedStatus => {
//!         eprintln!("{} -> {:?}", err.status_code(), err.snippet());
//!     }
//!     other => { /* ... */ }
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module runs an axum router in-process and points a client
//! at it:
//!
//! ```rust,ignore
//! use tempstick_client::testing::TestServer;
//!
//! let server = TestServer::start(router).await?;
//! let sensors = server.client.list_sensors().await?;
//! ```

mod client;
pub mod config;
mod error;
pub mod param;
pub mod request;
pub mod response;
pub mod testing;
pub mod transport;
mod types;

pub use client::TempStickClient;
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError, TimeoutsConfig};
pub use error::{ApiError, ApiErrorKind, Headers, Result, TempStickError, SNIPPET_LIMIT};
pub use response::DecodeMode;
pub use transport::Transport;
pub use types::*;

// Re-export the cancellation token taken by the *_with_cancel operations
pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use tempstick_core as core;
pub use tempstick_core::{
    Envelope, Reading, ReadingHistory, ReadingListEnvelope, Sensor, SensorEnvelope, SensorList,
    SensorListEnvelope, SensorSummary, User, UserEnvelope, WeekdayIndex,
};
