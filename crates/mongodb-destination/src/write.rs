//! Write planning and application.
//!
//! A batch is first turned into a [`WritePlan`] without touching the store,
//! so conversion problems abort the batch before anything is written.

use crate::config::PersistencePolicy;
use crate::error::{DestinationError, Result};
use bson::Document;
use mongodb::Collection;
use mongodb_types::{record_to_document, select_fields, set_document, ConversionError};
use mover_core::Record;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// One filtered `$set` upsert. The filter is an `$eq` match per field.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOp {
    pub filter: Document,
    pub update: Document,
}

/// Store operations for one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WritePlan {
    /// One multi-document insert.
    Insert(Vec<Document>),
    /// One round trip per record, in input order.
    Upsert(Vec<UpsertOp>),
}

impl WritePlan {
    /// Convert every record in `batch` according to `policy`.
    pub fn build(policy: &PersistencePolicy, batch: &[Record]) -> Result<Self> {
        match policy {
            PersistencePolicy::Insert => batch
                .iter()
                .enumerate()
                .map(|(position, record)| {
                    record_to_document(record).map_err(|e| serialization(position, e))
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Insert),
            PersistencePolicy::UpsertByFilter { fields, .. } => upserts(batch, fields),
            PersistencePolicy::UpsertByKey { field } => {
                upserts(batch, std::slice::from_ref(field))
            }
        }
    }

    /// Number of records the plan writes.
    pub fn len(&self) -> usize {
        match self {
            Self::Insert(docs) => docs.len(),
            Self::Upsert(ops) => ops.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn upserts(batch: &[Record], fields: &[String]) -> Result<WritePlan> {
    batch
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let filter = select_fields(record, fields).map_err(|e| serialization(position, e))?;
            let update = set_document(record).map_err(|e| serialization(position, e))?;
            Ok(UpsertOp { filter, update })
        })
        .collect::<Result<Vec<_>>>()
        .map(WritePlan::Upsert)
}

fn serialization(position: usize, source: ConversionError) -> DestinationError {
    DestinationError::Serialization { position, source }
}

/// Apply `plan`, counting acknowledged upserts in `acknowledged`.
///
/// Upserts stop at the first failure; earlier ones stay applied. An insert
/// is one round trip, so it is not counted.
pub(crate) async fn apply(
    collection: &Collection<Document>,
    plan: WritePlan,
    acknowledged: &AtomicUsize,
) -> Result<()> {
    match plan {
        WritePlan::Insert(docs) => {
            let count = docs.len();
            let result = collection.insert_many(docs).await.map_err(|source| {
                warn!(
                    "Insert of {} documents into {} failed: {}",
                    count,
                    collection.namespace(),
                    source
                );
                DestinationError::Insert { count, source }
            })?;
            debug!(
                "Inserted {} documents into {}",
                result.inserted_ids.len(),
                collection.namespace()
            );
        }
        WritePlan::Upsert(ops) => {
            let total = ops.len();
            for (position, op) in ops.into_iter().enumerate() {
                let result = collection
                    .update_one(op.filter, op.update)
                    .upsert(true)
                    .await
                    .map_err(|source| {
                        warn!(
                            "Upsert of record {} of {} into {} failed after {} applied: {}",
                            position,
                            total,
                            collection.namespace(),
                            position,
                            source
                        );
                        DestinationError::Upsert { position, source }
                    })?;
                acknowledged.fetch_add(1, Ordering::Relaxed);
                if result.upserted_id.is_some() {
                    debug!("Record {} inserted a new document", position);
                }
            }
            debug!("Upserted {} records into {}", total, collection.namespace());
        }
    }
    Ok(())
}
