//! # Mock Framework
//!
//! Test doubles for every capability the adapter consumes, so adapter behavior can be
//! exercised without a real document store.
//!
//! - [`InMemoryDocumentClient`]: a [`DocumentClient`] over in-memory maps, with
//!   realistic status codes, request charges and content locations. Failures can be
//!   queued with [`InMemoryDocumentClient::fail_next`].
//! - [`MockClientFactory`]: counts construction calls, optionally delays or fails.
//! - [`RecordingSink`]: captures every telemetry record, optionally failing on demand.
//!
//! # Example
//! ```
//! use docdb_adapter::mock::{MockClientFactory, RecordingSink};
//! use docdb_adapter::DocumentDbAdapter;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let factory = Arc::new(MockClientFactory::new());
//! let sink = Arc::new(RecordingSink::new());
//! let adapter = DocumentDbAdapter::builder()
//!     .factory(factory.clone())
//!     .sink(sink.clone())
//!     .build()
//!     .unwrap();
//!
//! adapter.get_client().await.unwrap();
//! assert_eq!(factory.calls(), 1);
//! assert!(sink.events().is_empty());
//! # }
//! ```

use crate::client::{
    Database, Document, DocumentClient, DocumentClientFactory, DocumentCollection, FeedResponse,
    Resource, ResourceResponse, SharedDocumentClient, SqlQuerySpec,
};
use crate::config::DocumentDbSettings;
use crate::error::DocumentClientError;
use crate::telemetry::{
    ExceptionRecord, SinkError, TelemetryEvent, TelemetrySink, TraceRecord,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

// Request charges, loosely modeled on a 1 KB item.
const READ_CHARGE: f64 = 1.0;
const WRITE_CHARGE: f64 = 5.71;
const QUERY_CHARGE: f64 = 2.79;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// IN-MEMORY CLIENT
// =============================================================================

#[derive(Default)]
struct Store {
    databases: BTreeMap<String, Database>,
    collections: BTreeMap<String, DocumentCollection>,
    documents: BTreeMap<String, Document>,
}

/// A [`DocumentClient`] backed by in-memory maps keyed by resource link.
///
/// Queries return every document in the collection; the query text is not evaluated.
#[derive(Default)]
pub struct InMemoryDocumentClient {
    store: tokio::sync::Mutex<Store>,
    failures: Mutex<VecDeque<DocumentClientError>>,
    next_activity: AtomicU64,
    requests: AtomicUsize,
}

impl InMemoryDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next request fail with `error`. Failures queue in order.
    pub fn fail_next(&self, error: DocumentClientError) {
        lock(&self.failures).push_back(error);
    }

    /// Number of requests served, including failed ones.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<String, DocumentClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let activity_id = format!("act-{}", self.next_activity.fetch_add(1, Ordering::SeqCst) + 1);
        match lock(&self.failures).pop_front() {
            Some(error) => Err(error.with_activity_id(activity_id)),
            None => Ok(activity_id),
        }
    }

    fn respond<R>(
        resource: Option<R>,
        status_code: u16,
        activity_id: String,
        charge: f64,
        link: &str,
    ) -> ResourceResponse<R> {
        ResourceResponse::new(resource, status_code)
            .with_activity_id(activity_id)
            .with_request_charge(charge)
            .with_content_location(link)
    }

    fn missing(link: &str, activity_id: String) -> DocumentClientError {
        DocumentClientError::not_found(format!("Resource Not Found: {link}"))
            .with_activity_id(activity_id)
            .with_request_charge(READ_CHARGE)
    }

    fn exists(link: &str, activity_id: String) -> DocumentClientError {
        DocumentClientError::conflict(format!("Resource with specified id or name already exists: {link}"))
            .with_activity_id(activity_id)
            .with_request_charge(READ_CHARGE)
    }

    fn child_link(parent: &str, kind: &str, resource: &impl Resource) -> String {
        format!("{parent}/{kind}/{}", resource.id())
    }

    fn parent_link(link: &str) -> &str {
        // "dbs/a/colls/b/docs/c" -> "dbs/a/colls/b"
        link.rsplitn(3, '/').nth(2).unwrap_or("")
    }
}

#[async_trait]
impl DocumentClient for InMemoryDocumentClient {
    async fn create_database(
        &self,
        database: Database,
    ) -> Result<ResourceResponse<Database>, DocumentClientError> {
        let activity_id = self.begin()?;
        let link = crate::client::links::database(database.id());
        let mut store = self.store.lock().await;
        if store.databases.contains_key(&link) {
            return Err(Self::exists(&link, activity_id));
        }
        store.databases.insert(link.clone(), database.clone());
        Ok(Self::respond(Some(database), 201, activity_id, WRITE_CHARGE, &link))
    }

    async fn read_database(
        &self,
        database_link: &str,
    ) -> Result<ResourceResponse<Database>, DocumentClientError> {
        let activity_id = self.begin()?;
        let store = self.store.lock().await;
        match store.databases.get(database_link) {
            Some(db) => Ok(Self::respond(Some(db.clone()), 200, activity_id, READ_CHARGE, database_link)),
            None => Err(Self::missing(database_link, activity_id)),
        }
    }

    async fn delete_database(
        &self,
        database_link: &str,
    ) -> Result<ResourceResponse<Database>, DocumentClientError> {
        let activity_id = self.begin()?;
        let mut store = self.store.lock().await;
        if store.databases.remove(database_link).is_none() {
            return Err(Self::missing(database_link, activity_id));
        }
        let prefix = format!("{database_link}/");
        store.collections.retain(|link, _| !link.starts_with(&prefix));
        store.documents.retain(|link, _| !link.starts_with(&prefix));
        Ok(Self::respond(None, 204, activity_id, WRITE_CHARGE, database_link))
    }

    async fn create_collection(
        &self,
        database_link: &str,
        collection: DocumentCollection,
    ) -> Result<ResourceResponse<DocumentCollection>, DocumentClientError> {
        let activity_id = self.begin()?;
        let mut store = self.store.lock().await;
        if !store.databases.contains_key(database_link) {
            return Err(Self::missing(database_link, activity_id));
        }
        let link = Self::child_link(database_link, "colls", &collection);
        if store.collections.contains_key(&link) {
            return Err(Self::exists(&link, activity_id));
        }
        store.collections.insert(link.clone(), collection.clone());
        Ok(Self::respond(Some(collection), 201, activity_id, WRITE_CHARGE, &link))
    }

    async fn read_collection(
        &self,
        collection_link: &str,
    ) -> Result<ResourceResponse<DocumentCollection>, DocumentClientError> {
        let activity_id = self.begin()?;
        let store = self.store.lock().await;
        match store.collections.get(collection_link) {
            Some(coll) => Ok(Self::respond(Some(coll.clone()), 200, activity_id, READ_CHARGE, collection_link)),
            None => Err(Self::missing(collection_link, activity_id)),
        }
    }

    async fn delete_collection(
        &self,
        collection_link: &str,
    ) -> Result<ResourceResponse<DocumentCollection>, DocumentClientError> {
        let activity_id = self.begin()?;
        let mut store = self.store.lock().await;
        if store.collections.remove(collection_link).is_none() {
            return Err(Self::missing(collection_link, activity_id));
        }
        let prefix = format!("{collection_link}/");
        store.documents.retain(|link, _| !link.starts_with(&prefix));
        Ok(Self::respond(None, 204, activity_id, WRITE_CHARGE, collection_link))
    }

    async fn create_document(
        &self,
        collection_link: &str,
        document: Document,
    ) -> Result<ResourceResponse<Document>, DocumentClientError> {
        let activity_id = self.begin()?;
        let mut store = self.store.lock().await;
        if !store.collections.contains_key(collection_link) {
            return Err(Self::missing(collection_link, activity_id));
        }
        let link = Self::child_link(collection_link, "docs", &document);
        if store.documents.contains_key(&link) {
            return Err(Self::exists(&link, activity_id));
        }
        store.documents.insert(link.clone(), document.clone());
        Ok(Self::respond(Some(document), 201, activity_id, WRITE_CHARGE, &link))
    }

    async fn read_document(
        &self,
        document_link: &str,
    ) -> Result<ResourceResponse<Document>, DocumentClientError> {
        let activity_id = self.begin()?;
        let store = self.store.lock().await;
        match store.documents.get(document_link) {
            Some(doc) => Ok(Self::respond(Some(doc.clone()), 200, activity_id, READ_CHARGE, document_link)),
            None => Err(Self::missing(document_link, activity_id)),
        }
    }

    async fn replace_document(
        &self,
        document_link: &str,
        document: Document,
    ) -> Result<ResourceResponse<Document>, DocumentClientError> {
        let activity_id = self.begin()?;
        let mut store = self.store.lock().await;
        match store.documents.get_mut(document_link) {
            Some(existing) => {
                *existing = document.clone();
                Ok(Self::respond(Some(document), 200, activity_id, WRITE_CHARGE, document_link))
            }
            None => Err(Self::missing(document_link, activity_id)),
        }
    }

    async fn upsert_document(
        &self,
        collection_link: &str,
        document: Document,
    ) -> Result<ResourceResponse<Document>, DocumentClientError> {
        let activity_id = self.begin()?;
        let mut store = self.store.lock().await;
        if !store.collections.contains_key(collection_link) {
            return Err(Self::missing(collection_link, activity_id));
        }
        let link = Self::child_link(collection_link, "docs", &document);
        let status = match store.documents.insert(link.clone(), document.clone()) {
            Some(_) => 200,
            None => 201,
        };
        Ok(Self::respond(Some(document), status, activity_id, WRITE_CHARGE, &link))
    }

    async fn delete_document(
        &self,
        document_link: &str,
    ) -> Result<ResourceResponse<Document>, DocumentClientError> {
        let activity_id = self.begin()?;
        let mut store = self.store.lock().await;
        match store.documents.remove(document_link) {
            Some(_) => Ok(Self::respond(None, 204, activity_id, WRITE_CHARGE, document_link)),
            None => Err(Self::missing(document_link, activity_id)),
        }
    }

    async fn query_documents(
        &self,
        collection_link: &str,
        _query: SqlQuerySpec,
    ) -> Result<FeedResponse<Document>, DocumentClientError> {
        let activity_id = self.begin()?;
        let store = self.store.lock().await;
        if !store.collections.contains_key(collection_link) {
            return Err(Self::missing(collection_link, activity_id));
        }
        let items = store
            .documents
            .iter()
            .filter(|(link, _)| Self::parent_link(link) == collection_link)
            .map(|(_, doc)| doc.clone())
            .collect();
        Ok(FeedResponse {
            items,
            activity_id,
            request_charge: QUERY_CHARGE,
            continuation: None,
        })
    }
}

// =============================================================================
// FACTORY
// =============================================================================

/// A [`DocumentClientFactory`] that records how it was called.
pub struct MockClientFactory {
    client: SharedDocumentClient,
    delay: Option<Duration>,
    failure: Option<DocumentClientError>,
    calls: AtomicUsize,
    last_settings: Mutex<Option<DocumentDbSettings>>,
}

impl Default for MockClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClientFactory {
    /// Hands out a fresh [`InMemoryDocumentClient`].
    pub fn new() -> Self {
        Self::with_client(Arc::new(InMemoryDocumentClient::new()))
    }

    pub fn with_client(client: SharedDocumentClient) -> Self {
        Self {
            client,
            delay: None,
            failure: None,
            calls: AtomicUsize::new(0),
            last_settings: Mutex::new(None),
        }
    }

    /// Sleeps before answering, to widen the window for concurrent first callers.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every construction fails with `error`.
    pub fn failing_with(mut self, error: DocumentClientError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_settings(&self) -> Option<DocumentDbSettings> {
        lock(&self.last_settings).clone()
    }
}

#[async_trait]
impl DocumentClientFactory for MockClientFactory {
    async fn get_document_client(
        &self,
        settings: Option<&DocumentDbSettings>,
    ) -> Result<SharedDocumentClient, DocumentClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_settings) = settings.cloned();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(Arc::clone(&self.client)),
        }
    }
}

// =============================================================================
// SINK
// =============================================================================

/// A [`TelemetrySink`] that keeps every record it accepts.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
    fail_traces: bool,
    fail_exceptions: bool,
    trace_attempts: AtomicUsize,
    exception_attempts: AtomicUsize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every trace record with [`SinkError::Custom`].
    pub fn fail_traces(mut self) -> Self {
        self.fail_traces = true;
        self
    }

    /// Rejects every exception record with [`SinkError::Custom`].
    pub fn fail_exceptions(mut self) -> Self {
        self.fail_exceptions = true;
        self
    }

    /// Accepted records, in arrival order.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        lock(&self.events).clone()
    }

    pub fn traces(&self) -> Vec<TraceRecord> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                TelemetryEvent::Trace(r) => Some(r.clone()),
                TelemetryEvent::Exception(_) => None,
            })
            .collect()
    }

    pub fn exceptions(&self) -> Vec<ExceptionRecord> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                TelemetryEvent::Exception(r) => Some(r.clone()),
                TelemetryEvent::Trace(_) => None,
            })
            .collect()
    }

    /// Trace records offered, accepted or not.
    pub fn trace_attempts(&self) -> usize {
        self.trace_attempts.load(Ordering::SeqCst)
    }

    /// Exception records offered, accepted or not.
    pub fn exception_attempts(&self) -> usize {
        self.exception_attempts.load(Ordering::SeqCst)
    }
}

impl TelemetrySink for RecordingSink {
    fn log_trace(&self, record: &TraceRecord) -> Result<(), SinkError> {
        self.trace_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_traces {
            return Err(SinkError::Custom("trace rejected".into()));
        }
        lock(&self.events).push(TelemetryEvent::Trace(record.clone()));
        Ok(())
    }

    fn report_exception(&self, record: &ExceptionRecord) -> Result<(), SinkError> {
        self.exception_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_exceptions {
            return Err(SinkError::Custom("exception rejected".into()));
        }
        lock(&self.events).push(TelemetryEvent::Exception(record.clone()));
        Ok(())
    }
}
