//! Error types for the MongoDB destination.

use crate::duration::DurationParseError;
use mongodb_types::ConversionError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while initializing or writing to the destination.
///
/// Every variant names the failing stage so a caller's error handler can
/// tell network trouble apart from bad data. Use [`DestinationError::kind`]
/// for a flat classification.
#[derive(Error, Debug)]
pub enum DestinationError {
    /// A timeout setting is not a valid duration expression.
    #[error("Invalid {setting} '{value}': {source}")]
    InvalidDuration {
        setting: &'static str,
        value: String,
        #[source]
        source: DurationParseError,
    },

    /// Any other invalid setting.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The connection string could not be parsed or the client not built.
    #[error("Failed to connect to MongoDB: {0}")]
    Connection(#[source] mongodb::error::Error),

    #[error("Timed out after {0:?} connecting to MongoDB")]
    ConnectionTimeout(Duration),

    /// The primary did not answer the ping.
    #[error("MongoDB ping failed: {0}")]
    Connectivity(#[source] mongodb::error::Error),

    #[error("MongoDB ping timed out after {0:?}")]
    ConnectivityTimeout(Duration),

    #[error("Failed to create indexes on {namespace}: {source}")]
    Index {
        namespace: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("Timed out after {timeout:?} creating indexes on {namespace}")]
    IndexTimeout { namespace: String, timeout: Duration },

    /// `persist` was called without a successful `initialize`.
    #[error("Destination is not initialized; call initialize() before persist()")]
    Uninitialized,

    /// A record could not be turned into a document or filter. Nothing
    /// from the batch was written.
    #[error("Record {position} cannot be converted to a document: {source}")]
    Serialization {
        position: usize,
        #[source]
        source: ConversionError,
    },

    /// The store rejected a multi-document insert. How many documents were
    /// committed is up to the store's ordered-insert semantics.
    #[error("Insert of {count} documents failed: {source}")]
    Insert {
        count: usize,
        #[source]
        source: mongodb::error::Error,
    },

    /// The store rejected the upsert of one record. Records before
    /// `position` are already applied.
    #[error("Upsert of record {position} failed: {source}")]
    Upsert {
        position: usize,
        #[source]
        source: mongodb::error::Error,
    },

    /// The batch ran out of query time. Writes acknowledged before the
    /// deadline stay in the store. `acknowledged` is `None` for inserts:
    /// the store may have committed a prefix of the multi-document insert
    /// without reporting it.
    #[error("Persist timed out after {timeout:?} ({})", progress(.acknowledged, .total))]
    Timeout {
        timeout: Duration,
        acknowledged: Option<usize>,
        total: usize,
    },
}

/// Flat classification of [`DestinationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Connection,
    Connectivity,
    Index,
    Uninitialized,
    Serialization,
    Insert,
    Upsert,
    Timeout,
}

impl ErrorKind {
    /// Whether the failure class is network-related and may succeed when
    /// retried by the caller.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::Connectivity | ErrorKind::Timeout
        )
    }
}

impl DestinationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDuration { .. } | Self::Configuration(_) => ErrorKind::Configuration,
            Self::Connection(_) | Self::ConnectionTimeout(_) => ErrorKind::Connection,
            Self::Connectivity(_) | Self::ConnectivityTimeout(_) => ErrorKind::Connectivity,
            Self::Index { .. } | Self::IndexTimeout { .. } => ErrorKind::Index,
            Self::Uninitialized => ErrorKind::Uninitialized,
            Self::Serialization { .. } => ErrorKind::Serialization,
            Self::Insert { .. } => ErrorKind::Insert,
            Self::Upsert { .. } => ErrorKind::Upsert,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Write failures count as transient only when the driver reports a
    /// network-level cause; constraint violations never do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Insert { source, .. } | Self::Upsert { source, .. } => is_network_error(source),
            other => other.kind().is_transient(),
        }
    }
}

fn is_network_error(err: &mongodb::error::Error) -> bool {
    use mongodb::error::ErrorKind as DriverKind;
    matches!(
        *err.kind,
        DriverKind::Io(_)
            | DriverKind::ServerSelection { .. }
            | DriverKind::ConnectionPoolCleared { .. }
    )
}

fn progress(acknowledged: &Option<usize>, total: &usize) -> String {
    match acknowledged {
        Some(n) => format!("{n} of {total} records acknowledged"),
        None => format!("unknown how many of {total} records were committed"),
    }
}

pub type Result<T> = std::result::Result<T, DestinationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err = DestinationError::InvalidDuration {
            setting: "query_timeout",
            value: "soon".to_string(),
            source: crate::duration::parse_duration("soon").unwrap_err(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!err.is_transient());
        assert!(err.to_string().starts_with("Invalid query_timeout 'soon': "));

        assert_eq!(DestinationError::Uninitialized.kind(), ErrorKind::Uninitialized);
        assert!(DestinationError::ConnectionTimeout(Duration::from_secs(1)).is_transient());
        assert!(DestinationError::ConnectivityTimeout(Duration::from_secs(1)).is_transient());
        assert!(!DestinationError::IndexTimeout {
            namespace: "db.coll".to_string(),
            timeout: Duration::from_secs(1),
        }
        .is_transient());
    }

    #[test]
    fn test_serialization_message_names_position() {
        let err = DestinationError::Serialization {
            position: 3,
            source: ConversionError::MissingField("id".to_string()),
        };
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(
            err.to_string(),
            "Record 3 cannot be converted to a document: Field 'id' is missing from the record"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = DestinationError::Timeout {
            timeout: Duration::from_secs(2),
            acknowledged: Some(4),
            total: 10,
        };
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "Persist timed out after 2s (4 of 10 records acknowledged)"
        );

        let err = DestinationError::Timeout {
            timeout: Duration::from_secs(2),
            acknowledged: None,
            total: 10,
        };
        assert_eq!(
            err.to_string(),
            "Persist timed out after 2s (unknown how many of 10 records were committed)"
        );
    }
}
