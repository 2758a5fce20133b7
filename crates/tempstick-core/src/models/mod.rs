//! Data-transfer shapes for the TempStick API
//!
//! Every shape keeps JSON members it does not recognise in an `extra` map so
//! that re-serializing a value does not lose data the API added later.

mod envelope;
mod reading;
mod sensor;
mod user;

pub use envelope::*;
pub use reading::*;
pub use sensor::*;
pub use user::*;

/// Envelope returned by `GET /user`
pub type UserEnvelope = Envelope<User>;

/// Envelope returned by `GET /sensor/{sensor_id}`
pub type SensorEnvelope = Envelope<Sensor>;

/// Envelope returned by `GET /sensors/all`
pub type SensorListEnvelope = Envelope<SensorList>;

/// Envelope returned by `GET /sensor/{sensor_id}/readings`
pub type ReadingListEnvelope = Envelope<ReadingHistory>;
