//! MongoDB/BSON conversions for data mover records.
//!
//! This crate provides pure conversions between mover-core's [`Record`]
//! and BSON documents. Nothing here touches the network, so every rule
//! can be unit tested without a running MongoDB.
//!
//! # Modules
//!
//! - [`forward`] - Record → BSON document conversion (fallible)
//! - [`reverse`] - BSON document → Record conversion
//!
//! # Example
//!
//! ```ignore
//! use mongodb_types::{document_to_record, record_to_document};
//!
//! let doc = record_to_document(&record)?;
//! let back = document_to_record(&doc);
//! ```
//!
//! [`Record`]: mover_core::Record

mod error;
pub mod forward;
pub mod reverse;

pub use error::ConversionError;
pub use forward::{record_to_document, select_fields, set_document};
pub use reverse::{bson_to_json, document_to_record, document_to_record_without_id};

/// Name of the store-assigned identity field.
pub const ID_FIELD: &str = "_id";
