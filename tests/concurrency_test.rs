use docdb_adapter::adapter::tags;
use docdb_adapter::mock::{MockClientFactory, RecordingSink};
use docdb_adapter::{DocumentClientError, DocumentDbAdapter, SharedDocumentClient};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

const CALLERS: usize = 32;

fn address(client: &SharedDocumentClient) -> *const () {
    Arc::as_ptr(client) as *const ()
}

/// Many tasks racing on first access share one construction and one handle.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_access_creates_one_client() {
    let factory = Arc::new(MockClientFactory::new().with_delay(Duration::from_millis(50)));
    let adapter = DocumentDbAdapter::new(factory.clone(), None);

    let handles = (0..CALLERS).map(|_| {
        let adapter = adapter.clone();
        tokio::spawn(async move { adapter.get_client().await })
    });

    let clients: Vec<SharedDocumentClient> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("client creation failed"))
        .collect();

    assert_eq!(factory.calls(), 1);
    assert_eq!(clients.len(), CALLERS);
    let first = address(&clients[0]);
    assert!(clients.iter().all(|c| address(c) == first));
}

/// A failed construction is observed by every waiter and never retried.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_access_shares_one_failure() {
    let failure = DocumentClientError::new(401, "The input authorization token can't serve the request");
    let factory = Arc::new(
        MockClientFactory::new()
            .with_delay(Duration::from_millis(50))
            .failing_with(failure.clone()),
    );
    let sink = Arc::new(RecordingSink::new());
    let adapter = DocumentDbAdapter::builder()
        .factory(factory.clone())
        .sink(sink.clone())
        .build()
        .unwrap();

    let handles = (0..CALLERS).map(|_| {
        let adapter = adapter.clone();
        tokio::spawn(async move { adapter.get_client().await })
    });

    for joined in join_all(handles).await {
        let result = joined.expect("task panicked");
        assert_eq!(result.err(), Some(failure.clone()));
    }

    // Later callers see the same memoized failure.
    assert_eq!(adapter.get_client().await.err(), Some(failure));
    assert_eq!(factory.calls(), 1);

    // One error record per call that observed the failure.
    let exceptions = sink.exceptions();
    assert_eq!(exceptions.len(), CALLERS + 1);
    assert!(exceptions.iter().all(|r| r.tag == tags::GET_CLIENT));
    assert!(exceptions.iter().all(|r| r.caller.as_str() == "get_client"));
}

/// Dropping the task that drives initialization does not wedge other callers.
#[tokio::test]
async fn cancelled_initializer_hands_over_to_next_caller() {
    let factory = Arc::new(MockClientFactory::new().with_delay(Duration::from_millis(200)));
    let adapter = DocumentDbAdapter::new(factory.clone(), None);

    let first = {
        let adapter = adapter.clone();
        tokio::spawn(async move { adapter.get_client().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    first.abort();
    let _ = first.await;

    let client = tokio::time::timeout(Duration::from_secs(5), adapter.get_client())
        .await
        .expect("initialization deadlocked");

    assert!(client.is_ok());
    assert!(adapter.is_initialized());
    // The aborted attempt never published, so the factory ran again.
    assert_eq!(factory.calls(), 2);
}
