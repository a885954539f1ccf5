//! MongoDB-backed record sink.

use crate::config::StoreConfig;
use crate::error::{AgentError, Result};
use crate::metrics::data::HealthSample;
use crate::store::RecordSink;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info};

/// Sink that inserts one document per sample into a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoSink {
    collection: Collection<HealthSample>,
}

impl MongoSink {
    /// Connect to the store and check it answers a `ping`.
    ///
    /// Every failure, from a malformed connection string to an unreachable
    /// cluster, comes back as [`AgentError::Connection`]. Nothing is retried.
    pub async fn connect(config: &StoreConfig, app_name: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(config.uri.as_str())
            .await
            .map_err(|e| AgentError::connection_error(format!("invalid connection string: {}", e)))?;

        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(config.connect_timeout);
        }
        if options.app_name.is_none() {
            options.app_name = Some(app_name.to_string());
        }

        let client = Client::with_options(options)
            .map_err(|e| AgentError::connection_error(e.to_string()))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| AgentError::connection_error(format!("ping failed: {}", e)))?;

        info!(
            "Connected to record store, writing to {}.{}",
            config.database, config.collection
        );

        let collection = client
            .database(&config.database)
            .collection::<HealthSample>(&config.collection);

        Ok(Self { collection })
    }

    /// Namespace samples are written to.
    pub fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }
}

impl RecordSink for MongoSink {
    async fn append(&mut self, sample: &HealthSample) -> Result<()> {
        let inserted = self
            .collection
            .insert_one(sample, None)
            .await
            .map_err(|e| AgentError::persist_error(e.to_string()))?;

        debug!("Inserted sample with id {}", inserted.inserted_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_malformed_uri_is_connection_error() {
        let config = StoreConfig::new("not-a-connection-string");
        let result = MongoSink::connect(&config, "test-node").await;
        assert!(matches!(result, Err(AgentError::Connection(_))));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_connection_error() {
        let config = StoreConfig::new("mongodb://127.0.0.1:1/")
            .with_connect_timeout(Duration::from_millis(300));
        let result = MongoSink::connect(&config, "test-node").await;

        match result {
            Err(err) => {
                assert!(err.is_fatal());
                assert!(matches!(err, AgentError::Connection(_)));
            }
            Ok(_) => panic!("Connecting to a closed port should fail"),
        }
    }
}
