//! MongoDB destination for the data mover.
//!
//! Persists batches of loosely-typed records into one MongoDB collection
//! under one of three [`PersistencePolicy`] variants:
//!
//! - `Insert` - one multi-document insert per batch
//! - `UpsertByFilter` - per-record `$set` upsert matched on several fields
//! - `UpsertByKey` - per-record `$set` upsert matched on one uniquely indexed field
//!
//! # Lifecycle
//!
//! ```ignore
//! use mongodb_destination::{DestinationConfig, MongoDestination, PersistencePolicy};
//!
//! let config = DestinationConfig::new("mongodb://localhost:27017", "app", "events")
//!     .with_timeouts("10s", "10s")
//!     .with_policy(PersistencePolicy::upsert_by_key("event_id"));
//!
//! let mut destination = MongoDestination::new(config);
//! destination.initialize().await?; // parse timeouts, connect, ping, create indexes
//! destination.persist(batch).await?;
//! ```
//!
//! The destination never retries; every failure is returned to the caller
//! with a [`DestinationError`] naming the failing stage.

mod config;
mod connect;
mod destination;
pub mod duration;
mod error;
pub mod index;
mod write;

pub use config::{DestinationConfig, PersistencePolicy, Timeouts, DEFAULT_TIMEOUT};
pub use connect::{ping, Connection};
pub use destination::MongoDestination;
pub use duration::{parse_duration, DurationParseError};
pub use error::{DestinationError, ErrorKind, Result};
pub use index::{IndexDirection, IndexKey, IndexSpec};
pub use write::{UpsertOp, WritePlan};
