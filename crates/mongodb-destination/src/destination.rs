//! The MongoDB destination.

use crate::config::DestinationConfig;
use crate::connect::Connection;
use crate::error::{DestinationError, Result};
use crate::index;
use crate::write::{self, WritePlan};
use mover_core::{Batch, Destination};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Persists record batches into one MongoDB collection.
///
/// `initialize` takes `&mut self` and `persist` takes `&self`, so once
/// initialized the destination can be shared (e.g. behind an `Arc`) by any
/// number of concurrent workers without locking.
#[derive(Debug)]
pub struct MongoDestination {
    config: DestinationConfig,
    connection: Option<Connection>,
}

impl MongoDestination {
    pub fn new(config: DestinationConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.connection.is_some()
    }

    /// Validate the configuration, connect, ping the primary, and create
    /// the indexes the policy needs.
    ///
    /// Calling it again replaces the previous connection. On failure the
    /// destination is left uninitialized, even if it was initialized before.
    pub async fn initialize(&mut self) -> Result<()> {
        self.connection = None;

        let timeouts = self.config.validate()?;
        let indexes = index::required_indexes(&self.config.policy)?;
        info!(
            "Initializing MongoDB destination for {} (policy: {})",
            self.config.namespace(),
            self.config.policy.name()
        );

        let connection = Connection::open(&self.config, timeouts).await?;
        index::provision(connection.collection(), indexes, timeouts.query).await?;

        self.connection = Some(connection);
        Ok(())
    }

    /// Write one batch under the configured policy.
    ///
    /// The whole batch shares one query-timeout. No transaction wraps it:
    /// on timeout or a store error, writes acknowledged so far remain.
    pub async fn persist(&self, batch: Batch) -> Result<()> {
        let connection = self
            .connection
            .as_ref()
            .ok_or(DestinationError::Uninitialized)?;
        if batch.is_empty() {
            return Ok(());
        }

        let plan = WritePlan::build(&self.config.policy, &batch)?;
        drop(batch);

        let total = plan.len();
        let counts_acknowledgements = matches!(plan, WritePlan::Upsert(_));
        let timeout = connection.timeouts().query;
        let acknowledged = AtomicUsize::new(0);
        let outcome = tokio::time::timeout(
            timeout,
            write::apply(connection.collection(), plan, &acknowledged),
        )
        .await;

        match outcome {
            Ok(result) => result?,
            Err(_) => {
                let acknowledged =
                    counts_acknowledgements.then(|| acknowledged.load(Ordering::Relaxed));
                warn!(
                    "Persist to {} timed out after {:?} with {:?} of {} records acknowledged",
                    self.config.namespace(),
                    timeout,
                    acknowledged,
                    total
                );
                return Err(DestinationError::Timeout {
                    timeout,
                    acknowledged,
                    total,
                });
            }
        }

        debug!("Persisted {} records to {}", total, self.config.namespace());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Destination for MongoDestination {
    type Error = DestinationError;

    async fn initialize(&mut self) -> Result<()> {
        MongoDestination::initialize(self).await
    }

    async fn persist(&self, batch: Batch) -> Result<()> {
        MongoDestination::persist(self, batch).await
    }
}
