//! Source and Destination trait definitions.
//!
//! These traits are the whole surface a data mover sees. The mover owns
//! concurrency, batching cadence, retries and statistics; implementations
//! only move one batch at a time.

use crate::record::Batch;

/// Trait for producing records.
///
/// `get_data` returning an empty batch signals that the source is exhausted.
#[async_trait::async_trait]
pub trait Source: Send {
    /// Prepare the source (open files, connect, ...). Called once.
    async fn initialize(&mut self) -> anyhow::Result<()>;

    /// Fetch the next batch of records.
    async fn get_data(&mut self) -> anyhow::Result<Batch>;
}

/// Trait for persisting records.
///
/// # Usage Pattern
///
/// ```ignore
/// let mut destination = MongoDestination::new(config);
/// destination.initialize().await?;
///
/// // After initialize the destination is shared read-only, so concurrent
/// // workers can persist through one instance.
/// let destination = Arc::new(destination);
/// destination.persist(batch).await?;
/// ```
#[async_trait::async_trait]
pub trait Destination: Send + Sync {
    /// Error type surfaced to the mover's error handler.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Establish whatever the destination needs before accepting writes.
    ///
    /// Must be called exactly once, before any `persist`.
    async fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Persist one batch. Each call is independent and may run concurrently
    /// with other calls on the same instance.
    async fn persist(&self, batch: Batch) -> Result<(), Self::Error>;
}
