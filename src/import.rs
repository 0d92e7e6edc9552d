//! Source-to-destination driver.

use anyhow::Context;
use mover_core::{Destination, Source};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub batches: usize,
    pub records: usize,
}

/// Initialize both ends, then move batches until the source is exhausted.
///
/// Batches are persisted one at a time and never retried; the first
/// failure ends the import.
pub async fn run_import<S, D>(source: &mut S, destination: &mut D) -> anyhow::Result<ImportStats>
where
    S: Source,
    D: Destination,
{
    source
        .initialize()
        .await
        .context("Failed to initialize source")?;
    destination
        .initialize()
        .await
        .context("Failed to initialize destination")?;

    let mut stats = ImportStats::default();
    loop {
        let batch = source
            .get_data()
            .await
            .with_context(|| format!("Failed to read batch {}", stats.batches + 1))?;
        if batch.is_empty() {
            break;
        }

        let size = batch.len();
        destination.persist(batch).await.with_context(|| {
            format!(
                "Failed to persist batch {} ({} records, {} persisted before it)",
                stats.batches + 1,
                size,
                stats.records
            )
        })?;
        stats.batches += 1;
        stats.records += size;
        debug!("Persisted batch {} ({} records)", stats.batches, size);
    }

    info!(
        "Import complete: {} records in {} batches",
        stats.records, stats.batches
    );
    Ok(stats)
}
