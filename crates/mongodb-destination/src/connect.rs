//! Connection establishment.

use crate::config::{DestinationConfig, Timeouts};
use crate::error::{DestinationError, Result};
use bson::{doc, Document};
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria};
use mongodb::{Client, Collection};
use std::time::Duration;
use tracing::{debug, info};

const APP_NAME: &str = "data-mover-mongodb";

/// The resolved target collection and the timeouts bounding its use.
///
/// Created once by `initialize` and shared read-only afterwards. The
/// collection handle keeps its client alive, and the driver's client is
/// safe for concurrent use.
#[derive(Clone, Debug)]
pub struct Connection {
    collection: Collection<Document>,
    timeouts: Timeouts,
}

impl Connection {
    /// Connect, ping the primary, and bind the target collection.
    pub async fn open(config: &DestinationConfig, timeouts: Timeouts) -> Result<Self> {
        // Parsing may resolve SRV/TXT records, so it counts as connecting.
        let mut options = tokio::time::timeout(timeouts.connection, ClientOptions::parse(&config.uri))
            .await
            .map_err(|_| DestinationError::ConnectionTimeout(timeouts.connection))?
            .map_err(DestinationError::Connection)?;

        // Keep driver-internal waits inside our own bounds.
        options.connect_timeout = Some(timeouts.connection);
        options.server_selection_timeout = Some(timeouts.query);
        if options.app_name.is_none() {
            options.app_name = Some(APP_NAME.to_string());
        }

        // Never log the URI itself; it may carry credentials.
        let hosts = options
            .hosts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        debug!("Creating MongoDB client for hosts: {}", hosts);
        let client = Client::with_options(options).map_err(DestinationError::Connection)?;

        ping(&client, timeouts.query).await?;
        debug!("MongoDB primary answered ping");

        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);
        info!(
            "Connected to MongoDB at {}; target collection {}",
            hosts,
            config.namespace()
        );

        Ok(Self {
            collection,
            timeouts,
        })
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Same connection with a different per-batch bound.
    #[cfg(test)]
    pub(crate) fn with_query_timeout(mut self, query: Duration) -> Self {
        self.timeouts.query = query;
        self
    }
}

/// Ping the primary, bounded by `timeout`.
pub async fn ping(client: &Client, timeout: Duration) -> Result<()> {
    let admin = client.database("admin");
    let command = admin
        .run_command(doc! { "ping": 1 })
        .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary));
    tokio::time::timeout(timeout, command)
        .await
        .map_err(|_| DestinationError::ConnectivityTimeout(timeout))?
        .map_err(DestinationError::Connectivity)?;
    Ok(())
}
