//! # Remote Client Capabilities
//!
//! The adapter consumes two capabilities and implements neither:
//!
//! - [`DocumentClient`]: the remote document store. Every resource operation returns a
//!   [`ResourceResponse`] carrying cost, status, correlation id and location metadata,
//!   and fails with [`DocumentClientError`].
//! - [`DocumentClientFactory`]: builds a client from optional [`DocumentDbSettings`].
//!
//! Both traits are object safe so the adapter can hold a [`SharedDocumentClient`].

pub mod resource;

pub use resource::*;

use crate::config::DocumentDbSettings;
use crate::error::DocumentClientError;
use async_trait::async_trait;
use std::sync::Arc;

/// The shared client handle. One per adapter, cloned out to every caller.
pub type SharedDocumentClient = Arc<dyn DocumentClient>;

/// Asynchronous, resource-oriented operations against a document store.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn create_database(
        &self,
        database: Database,
    ) -> Result<ResourceResponse<Database>, DocumentClientError>;

    async fn read_database(
        &self,
        database_link: &str,
    ) -> Result<ResourceResponse<Database>, DocumentClientError>;

    async fn delete_database(
        &self,
        database_link: &str,
    ) -> Result<ResourceResponse<Database>, DocumentClientError>;

    async fn create_collection(
        &self,
        database_link: &str,
        collection: DocumentCollection,
    ) -> Result<ResourceResponse<DocumentCollection>, DocumentClientError>;

    async fn read_collection(
        &self,
        collection_link: &str,
    ) -> Result<ResourceResponse<DocumentCollection>, DocumentClientError>;

    async fn delete_collection(
        &self,
        collection_link: &str,
    ) -> Result<ResourceResponse<DocumentCollection>, DocumentClientError>;

    async fn create_document(
        &self,
        collection_link: &str,
        document: Document,
    ) -> Result<ResourceResponse<Document>, DocumentClientError>;

    async fn read_document(
        &self,
        document_link: &str,
    ) -> Result<ResourceResponse<Document>, DocumentClientError>;

    async fn replace_document(
        &self,
        document_link: &str,
        document: Document,
    ) -> Result<ResourceResponse<Document>, DocumentClientError>;

    async fn upsert_document(
        &self,
        collection_link: &str,
        document: Document,
    ) -> Result<ResourceResponse<Document>, DocumentClientError>;

    async fn delete_document(
        &self,
        document_link: &str,
    ) -> Result<ResourceResponse<Document>, DocumentClientError>;

    async fn query_documents(
        &self,
        collection_link: &str,
        query: SqlQuerySpec,
    ) -> Result<FeedResponse<Document>, DocumentClientError>;
}

/// Produces a [`DocumentClient`] from optional settings.
///
/// The settings are passed through exactly as the adapter received them.
#[async_trait]
pub trait DocumentClientFactory: Send + Sync {
    async fn get_document_client(
        &self,
        settings: Option<&DocumentDbSettings>,
    ) -> Result<SharedDocumentClient, DocumentClientError>;
}
