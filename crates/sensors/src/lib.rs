//! Read-only access to the farm's time-series sensor store.
//!
//! The store speaks SQL over HTTP (InfluxDB 3 `query_sql`). This crate owns
//! the query text, the identifier allow-list, and the projection of the
//! latest row onto a [`snapshot::SensorSnapshot`].

pub mod client;
pub mod config;
pub mod query;
pub mod reader;
pub mod snapshot;
pub mod source;

pub use config::{SensorConfigError, SensorSettings};
pub use reader::SensorReader;
pub use snapshot::{Reading, SensorSnapshot};
pub use source::{DisabledSource, QueryParams, Row, SensorError, SensorSource};
