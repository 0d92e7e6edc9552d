//! Index declarations and provisioning.
//!
//! - `upsert_by_key`: one ascending unique index on the key field
//! - `upsert_by_filter`: whatever the caller declared, possibly nothing
//! - `insert`: nothing

use crate::config::PersistencePolicy;
use crate::duration::parse_duration;
use crate::error::{DestinationError, Result};
use bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use mongodb_types::ID_FIELD;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Sort order of one index key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl IndexDirection {
    fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
    pub field: String,
    #[serde(default)]
    pub direction: IndexDirection,
}

/// Caller-declared index for the filtered-upsert policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub keys: Vec<IndexKey>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub sparse: bool,
    #[serde(default)]
    pub name: Option<String>,
    /// TTL as duration text, e.g. "30d"
    #[serde(default)]
    pub expire_after: Option<String>,
}

impl IndexSpec {
    /// Single-field ascending index.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            keys: vec![IndexKey {
                field: field.into(),
                direction: IndexDirection::Ascending,
            }],
            ..Self::default()
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(DestinationError::Configuration(
                "index declarations need at least one key".to_string(),
            ));
        }
        if self.keys.iter().any(|k| k.field.is_empty()) {
            return Err(DestinationError::Configuration(
                "index key field names cannot be empty".to_string(),
            ));
        }
        self.expire_after().map(|_| ())
    }

    fn expire_after(&self) -> Result<Option<Duration>> {
        self.expire_after
            .as_deref()
            .map(|text| {
                parse_duration(text).map_err(|source| DestinationError::InvalidDuration {
                    setting: "expire_after",
                    value: text.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn to_model(&self) -> Result<IndexModel> {
        let mut keys = Document::new();
        for key in &self.keys {
            keys.insert(key.field.clone(), key.direction.as_i32());
        }

        let mut options = IndexOptions::default();
        options.name = self.name.clone();
        options.unique = self.unique.then_some(true);
        options.sparse = self.sparse.then_some(true);
        options.expire_after = self.expire_after()?;

        Ok(IndexModel::builder().keys(keys).options(options).build())
    }
}

/// Indexes the policy needs before the first write.
pub fn required_indexes(policy: &PersistencePolicy) -> Result<Vec<IndexModel>> {
    match policy {
        PersistencePolicy::Insert => Ok(Vec::new()),
        PersistencePolicy::UpsertByFilter { indexes, .. } => {
            indexes.iter().map(IndexSpec::to_model).collect()
        }
        // _id is always uniquely indexed, and the server rejects `unique` on it.
        PersistencePolicy::UpsertByKey { field } if field == ID_FIELD => Ok(Vec::new()),
        PersistencePolicy::UpsertByKey { field } => {
            let mut options = IndexOptions::default();
            options.unique = Some(true);
            Ok(vec![IndexModel::builder()
                .keys(doc! { field.as_str(): 1 })
                .options(options)
                .build()])
        }
    }
}

/// Create all `indexes` in one call, bounded by `timeout`.
pub async fn provision(
    collection: &Collection<Document>,
    indexes: Vec<IndexModel>,
    timeout: Duration,
) -> Result<()> {
    let namespace = collection.namespace().to_string();
    if indexes.is_empty() {
        debug!("No indexes to provision on {}", namespace);
        return Ok(());
    }

    let count = indexes.len();
    debug!("Creating {} indexes on {}", count, namespace);
    let result = tokio::time::timeout(timeout, collection.create_indexes(indexes))
        .await
        .map_err(|_| DestinationError::IndexTimeout {
            namespace: namespace.clone(),
            timeout,
        })?
        .map_err(|source| DestinationError::Index {
            namespace: namespace.clone(),
            source,
        })?;

    info!(
        "Provisioned {} indexes on {}: {:?}",
        count, namespace, result.index_names
    );
    Ok(())
}
