//! # docdb-adapter demo
//!
//! Drives an in-memory document store through the adapter so the telemetry it
//! emits can be watched:
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! Settings are read from `DOCUMENTDB_CONFIG` / `DOCUMENTDB__*` when present.

use docdb_adapter::client::{links, Database, Document, DocumentCollection, SqlQuerySpec};
use docdb_adapter::mock::MockClientFactory;
use docdb_adapter::telemetry::setup_tracing;
use docdb_adapter::{DocumentDbAdapter, DocumentDbSettings};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let settings = match DocumentDbSettings::load(None) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!(error = %e, "No usable settings, continuing without");
            None
        }
    };

    let adapter = DocumentDbAdapter::new(Arc::new(MockClientFactory::new()), settings);

    let span = tracing::info_span!("provisioning");
    async {
        info!("Creating database and collection");
        adapter.create_database(Database::new("shop")).await?;
        adapter
            .create_collection(
                &links::database("shop"),
                DocumentCollection::new("orders").with_partition_key("/customerId"),
            )
            .await?;
        Ok::<_, docdb_adapter::DocumentClientError>(())
    }
    .instrument(span)
    .await?;

    let orders = links::collection("shop", "orders");

    let span = tracing::info_span!("orders");
    async {
        adapter
            .create_document(
                &orders,
                Document::new("o-1", json!({ "customerId": "c-1", "total": 42.5 })),
            )
            .await?;
        adapter
            .upsert_document(
                &orders,
                Document::new("o-1", json!({ "customerId": "c-1", "total": 40.0 })),
            )
            .await?;

        let feed = adapter
            .query_documents(&orders, SqlQuerySpec::new("SELECT * FROM c"))
            .await?;
        info!(count = feed.items.len(), cost = feed.request_charge, "Queried orders");
        Ok::<_, docdb_adapter::DocumentClientError>(())
    }
    .instrument(span)
    .await?;

    // A miss is logged by the adapter and handed back untouched.
    match adapter
        .read_document(&links::document("shop", "orders", "o-404"))
        .await
    {
        Ok(_) => warn!("Unexpectedly found o-404"),
        Err(e) => info!(status = ?e.status_code(), "Missing order reported as expected"),
    }

    adapter.delete_database(&links::database("shop")).await?;
    info!("Demo completed successfully");
    Ok(())
}
