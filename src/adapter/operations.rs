//! Instrumented pass-through operations.
//!
//! Each method fetches the shared client, forwards to the [`DocumentClient`] method of
//! the same name and logs under that name and its reserved tag in [`tags`].
//!
//! [`DocumentClient`]: crate::client::DocumentClient

use super::{tags, DocumentDbAdapter};
use crate::client::{
    Database, Document, DocumentCollection, FeedResponse, ResourceResponse, SqlQuerySpec,
};
use crate::error::DocumentClientError;
use crate::telemetry::Caller;
use paste::paste;

macro_rules! resource_operations {
    ($(
        $(#[$meta:meta])*
        $name:ident($($arg:ident: $ty:ty),*) -> $resource:ty;
    )*) => {
        paste! {
            impl DocumentDbAdapter {
                $(
                    $(#[$meta])*
                    #[tracing::instrument(skip_all)]
                    pub async fn $name(
                        &self,
                        $($arg: $ty),*
                    ) -> Result<ResourceResponse<$resource>, DocumentClientError> {
                        let client = self.get_client().await?;
                        self.execute_and_log_resource(
                            tags::[<$name:upper>],
                            Caller::from_static(stringify!($name)),
                            || client.$name($($arg),*),
                        )
                        .await
                    }
                )*
            }
        }
    };
}

resource_operations! {
    /// Fails with 409 if the database exists.
    create_database(database: Database) -> Database;
    read_database(database_link: &str) -> Database;
    delete_database(database_link: &str) -> Database;

    create_collection(database_link: &str, collection: DocumentCollection) -> DocumentCollection;
    read_collection(collection_link: &str) -> DocumentCollection;
    delete_collection(collection_link: &str) -> DocumentCollection;

    create_document(collection_link: &str, document: Document) -> Document;
    read_document(document_link: &str) -> Document;
    replace_document(document_link: &str, document: Document) -> Document;
    /// Status 201 when the document was created, 200 when it replaced an existing one.
    upsert_document(collection_link: &str, document: Document) -> Document;
    delete_document(document_link: &str) -> Document;
}

impl DocumentDbAdapter {
    /// Runs a query. Feeds carry no per-resource metadata, so only failures are logged.
    #[tracing::instrument(skip_all)]
    pub async fn query_documents(
        &self,
        collection_link: &str,
        query: SqlQuerySpec,
    ) -> Result<FeedResponse<Document>, DocumentClientError> {
        let client = self.get_client().await?;
        self.execute_and_log(
            tags::QUERY_DOCUMENTS,
            Caller::from_static("query_documents"),
            || client.query_documents(collection_link, query),
        )
        .await
    }
}
