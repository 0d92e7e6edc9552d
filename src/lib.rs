//! data-mover-mongodb library
//!
//! Wires a record [`Source`] to the MongoDB destination.
//!
//! # Crates
//!
//! - `mover-core` - `Record`, `Batch`, and the `Source` / `Destination` traits
//! - `mongodb-types` - record <-> BSON conversion
//! - `mongodb-destination` - connection, index provisioning, and the three
//!   persistence policies
//! - `jsonl-source` - JSONL file source
//!
//! # CLI Usage
//!
//! ```bash
//! # Verify connectivity and create the unique index for keyed upserts
//! data-mover-mongodb check --database app --collection users --upsert-key user_id
//!
//! # Upsert records from a JSONL file, matching on two fields
//! data-mover-mongodb import --input users.jsonl \
//!   --database app --collection users --filter-field tenant,email
//!
//! # Same, with settings from a TOML file
//! data-mover-mongodb import --input users.jsonl --config destination.toml
//! ```
//!
//! [`Source`]: mover_core::Source

mod config;
mod import;
mod opts;

pub use config::load_config;
pub use import::{run_import, ImportStats};
pub use opts::MongoOpts;

pub use jsonl_source::JsonlSource;
pub use mongodb_destination::{DestinationConfig, MongoDestination, PersistencePolicy};
