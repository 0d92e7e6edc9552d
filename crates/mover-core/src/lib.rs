//! Core types for the data mover.
//!
//! This crate defines the narrow contract between an upstream data mover
//! and the adapters it drives:
//!
//! - [`Record`] / [`Batch`] - loosely-typed records as produced by a source
//! - [`Source`] - produces batches of records until exhausted
//! - [`Destination`] - durably persists batches of records
//!
//! # Architecture
//!
//! ```text
//! mover-core (this crate)
//!    │
//!    ├─── jsonl-source          (implements Source for JSONL files)
//!    ├─── mongodb-types         (Record <-> BSON document conversion)
//!    └─── mongodb-destination   (implements Destination for MongoDB)
//! ```

mod memory;
mod record;
mod traits;

pub use memory::MemorySource;
pub use record::{record_from_value, Batch, Record, Value};
pub use traits::{Destination, Source};
