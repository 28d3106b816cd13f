use docdb_adapter::adapter::tags;
use docdb_adapter::client::{links, Database, Document, DocumentCollection, SqlQuerySpec};
use docdb_adapter::mock::{InMemoryDocumentClient, MockClientFactory, RecordingSink};
use docdb_adapter::telemetry::{FailureKind, TelemetryEvent};
use docdb_adapter::{AdapterError, Caller, DocumentClientError, DocumentDbAdapter, Tag};
use serde_json::json;
use std::sync::Arc;

struct Harness {
    adapter: DocumentDbAdapter,
    client: Arc<InMemoryDocumentClient>,
    sink: Arc<RecordingSink>,
}

fn harness() -> Harness {
    harness_with_sink(RecordingSink::new())
}

fn harness_with_sink(sink: RecordingSink) -> Harness {
    let client = Arc::new(InMemoryDocumentClient::new());
    let sink = Arc::new(sink);
    let adapter = DocumentDbAdapter::builder()
        .factory(Arc::new(MockClientFactory::with_client(client.clone())))
        .sink(sink.clone())
        .build()
        .expect("valid adapter");
    Harness {
        adapter,
        client,
        sink,
    }
}

async fn provision(adapter: &DocumentDbAdapter) {
    adapter.create_database(Database::new("shop")).await.unwrap();
    adapter
        .create_collection(&links::database("shop"), DocumentCollection::new("orders"))
        .await
        .unwrap();
}

/// Each resource operation logs one trace under its own name and tag.
#[tokio::test]
async fn resource_operations_log_one_trace_each() {
    let h = harness();
    provision(&h.adapter).await;

    let orders = links::collection("shop", "orders");
    let created = h
        .adapter
        .create_document(&orders, Document::new("o-1", json!({ "total": 12 })))
        .await
        .unwrap();
    let read = h
        .adapter
        .read_document(&links::document("shop", "orders", "o-1"))
        .await
        .unwrap();

    // Responses come back exactly as the client produced them.
    assert_eq!(created.status_code(), 201);
    assert_eq!(read.resource().map(|d| d.body.clone()), Some(json!({ "total": 12 })));

    let traces = h.sink.traces();
    let callers: Vec<&str> = traces.iter().map(|t| t.caller.as_str()).collect();
    assert_eq!(
        callers,
        ["create_database", "create_collection", "create_document", "read_document"]
    );
    let tags_seen: Vec<Tag> = traces.iter().map(|t| t.tag).collect();
    assert_eq!(
        tags_seen,
        [
            tags::CREATE_DATABASE,
            tags::CREATE_COLLECTION,
            tags::CREATE_DOCUMENT,
            tags::READ_DOCUMENT
        ]
    );

    let read_trace = &traces[3];
    assert_eq!(read_trace.status_code, 200);
    assert_eq!(read_trace.activity_id, read.activity_id());
    assert_eq!(read_trace.request_charge, read.request_charge());
    assert_eq!(
        read_trace.content_location.as_deref(),
        Some("dbs/shop/colls/orders/docs/o-1")
    );
    assert!(h.sink.exceptions().is_empty());
}

/// A remote failure comes back as the same error and is logged exactly once.
#[tokio::test]
async fn remote_failure_passes_through_and_logs_once() {
    let h = harness();
    provision(&h.adapter).await;
    let before = h.sink.events().len();

    let err = h
        .adapter
        .read_document(&links::document("shop", "orders", "missing"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.message(), "Resource Not Found: dbs/shop/colls/orders/docs/missing");

    let events = h.sink.events();
    assert_eq!(events.len(), before + 1);
    match &events[before] {
        TelemetryEvent::Exception(record) => {
            assert_eq!(record.tag, tags::READ_DOCUMENT);
            assert_eq!(record.caller.as_str(), "read_document");
            assert_eq!(record.kind, FailureKind::DocumentClient);
            assert!(record.message.starts_with("Operation: read_document StatusCode: 404"));
        }
        other => panic!("expected an exception record, got {other:?}"),
    }
}

/// Injected service errors surface verbatim, metadata included.
#[tokio::test]
async fn throttling_error_is_not_retried() {
    let h = harness();
    provision(&h.adapter).await;
    let requests_before = h.client.requests();

    h.client.fail_next(
        DocumentClientError::new(429, "Request rate is large")
            .with_retry_after(std::time::Duration::from_millis(100)),
    );
    let err = h
        .adapter
        .upsert_document(&links::collection("shop", "orders"), Document::new("o-9", json!({})))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(429));
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_millis(100)));
    assert_eq!(h.client.requests(), requests_before + 1);
    assert_eq!(h.sink.exceptions().len(), 1);
}

/// Queries use the generic shape: silent on success, logged on failure.
#[tokio::test]
async fn query_logs_only_failures() {
    let h = harness();
    provision(&h.adapter).await;
    let orders = links::collection("shop", "orders");
    h.adapter
        .create_document(&orders, Document::new("o-1", json!({})))
        .await
        .unwrap();
    let before = h.sink.events().len();

    let feed = h
        .adapter
        .query_documents(&orders, SqlQuerySpec::new("SELECT * FROM c"))
        .await
        .unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(h.sink.events().len(), before);

    let err = h
        .adapter
        .query_documents(&links::collection("shop", "carts"), SqlQuerySpec::new("SELECT * FROM c"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    let exceptions = h.sink.exceptions();
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].tag, tags::QUERY_DOCUMENTS);
}

/// A sink that rejects success records never turns a success into a failure.
#[tokio::test]
async fn rejecting_sink_does_not_fail_operations() {
    let h = harness_with_sink(RecordingSink::new().fail_traces());

    let created = h.adapter.create_database(Database::new("shop")).await.unwrap();
    let deleted = h.adapter.delete_database(&links::database("shop")).await.unwrap();

    assert_eq!(created.status_code(), 201);
    assert_eq!(deleted.status_code(), 204);
    assert_eq!(h.sink.trace_attempts(), 2);
    assert!(h.sink.events().is_empty());
}

/// User-supplied operations with their own error types keep those types.
#[tokio::test]
async fn custom_operations_keep_their_error_type() {
    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("could not deserialize order {0}")]
    struct DecodeError(String);

    let h = harness();
    provision(&h.adapter).await;
    let caller = Caller::new("load_order_summary").unwrap();
    let tag = Tag(0x1234_5678);

    let result: Result<u32, DecodeError> = h
        .adapter
        .execute_and_log(tag, caller, || async { Err(DecodeError("o-7".into())) })
        .await;

    assert_eq!(result, Err(DecodeError("o-7".into())));
    let exceptions = h.sink.exceptions();
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].kind, FailureKind::Other);
    assert_eq!(
        exceptions[0].message,
        "Exception detected. Caller: load_order_summary Error: could not deserialize order o-7."
    );
}

/// Validation failures happen before any telemetry or remote interaction.
#[tokio::test]
async fn validation_precedes_any_interaction() {
    let sink = Arc::new(RecordingSink::new());
    let factory = Arc::new(MockClientFactory::new());

    let missing = DocumentDbAdapter::builder().sink(sink.clone()).build();
    assert!(matches!(missing, Err(AdapterError::MissingArgument(_))));

    let both = DocumentDbAdapter::builder()
        .factory(factory.clone())
        .client(Arc::new(InMemoryDocumentClient::new()))
        .sink(sink.clone())
        .build();
    assert!(matches!(both, Err(AdapterError::ConflictingArguments(_))));

    assert!(matches!(Caller::new(""), Err(AdapterError::InvalidCaller(_))));

    assert_eq!(factory.calls(), 0);
    assert_eq!(sink.trace_attempts() + sink.exception_attempts(), 0);
}

/// Direct mode wraps the client without a factory.
#[tokio::test]
async fn direct_mode_operations_are_instrumented() {
    let client = Arc::new(InMemoryDocumentClient::new());
    let sink = Arc::new(RecordingSink::new());
    let adapter = DocumentDbAdapter::builder()
        .client(client.clone())
        .sink(sink.clone())
        .build()
        .unwrap();

    provision(&adapter).await;
    adapter
        .delete_collection(&links::collection("shop", "orders"))
        .await
        .unwrap();
    let err = adapter
        .read_collection(&links::collection("shop", "orders"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(client.requests(), 4);
    assert_eq!(sink.traces().len(), 3);
    assert_eq!(sink.exceptions().len(), 1);
    assert_eq!(sink.exceptions()[0].tag, tags::READ_COLLECTION);
}
