//! # Document DB Adapter
//!
//! [`DocumentDbAdapter`] owns one lazily created [`DocumentClient`](crate::client::DocumentClient) and runs every call
//! against it through the [`execute`] wrappers.
//!
//! ## Construction
//!
//! - **Factory mode** ([`DocumentDbAdapter::new`]): the client is built by a
//!   [`DocumentClientFactory`] on first use, with the settings given here.
//! - **Direct mode** ([`DocumentDbAdapter::with_client`]): an existing client is wrapped.
//!
//! [`DocumentDbAdapter::builder`] takes the same inputs piecewise and rejects a
//! missing or doubly supplied client source before anything else happens.
//!
//! ## Initialization
//!
//! The client slot is a [`tokio::sync::OnceCell`] holding the factory's `Result`.
//! Storing the result (not just the client) means a failed construction is also
//! published once: every caller sees the same error and the factory is never re-entered.
//! If the task driving initialization is cancelled, the next waiter takes over.

pub mod execute;
mod operations;
pub mod tags;

pub use execute::{execute_and_log, execute_and_log_resource};

use crate::client::{DocumentClientFactory, ResourceResponse, SharedDocumentClient};
use crate::config::DocumentDbSettings;
use crate::error::{AdapterError, DocumentClientError};
use crate::telemetry::{Caller, Tag, TelemetrySink, TracingSink};
use std::error::Error;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

enum ClientSource {
    Factory {
        factory: Arc<dyn DocumentClientFactory>,
        settings: Option<DocumentDbSettings>,
    },
    Direct(SharedDocumentClient),
}

impl ClientSource {
    async fn create(&self) -> Result<SharedDocumentClient, DocumentClientError> {
        match self {
            ClientSource::Factory { factory, settings } => {
                debug!(has_settings = settings.is_some(), "Creating document client");
                factory.get_document_client(settings.as_ref()).await
            }
            ClientSource::Direct(client) => Ok(Arc::clone(client)),
        }
    }
}

struct Inner {
    source: ClientSource,
    client: OnceCell<Result<SharedDocumentClient, DocumentClientError>>,
    sink: Arc<dyn TelemetrySink>,
}

/// Lazily initialized, instrumented access to a document store client.
///
/// Cloning is cheap and clones share the same client slot.
#[derive(Clone)]
pub struct DocumentDbAdapter {
    inner: Arc<Inner>,
}

impl DocumentDbAdapter {
    /// Factory mode: the client is created on first [`get_client`](Self::get_client).
    pub fn new(
        factory: Arc<dyn DocumentClientFactory>,
        settings: Option<DocumentDbSettings>,
    ) -> Self {
        Self::from_source(ClientSource::Factory { factory, settings }, Arc::new(TracingSink))
    }

    /// Direct mode: wraps an already constructed client.
    pub fn with_client(client: SharedDocumentClient) -> Self {
        Self::from_source(ClientSource::Direct(client), Arc::new(TracingSink))
    }

    pub fn builder() -> DocumentDbAdapterBuilder {
        DocumentDbAdapterBuilder::default()
    }

    fn from_source(source: ClientSource, sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                client: OnceCell::new(),
                sink,
            }),
        }
    }

    pub fn sink(&self) -> &dyn TelemetrySink {
        self.inner.sink.as_ref()
    }

    /// Whether the client slot has been filled (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.inner.client.initialized()
    }

    /// Returns the shared client, creating it on first call.
    ///
    /// Concurrent first callers all wait on the same construction. A construction
    /// failure is logged on every call that observes it and is never retried.
    pub async fn get_client(&self) -> Result<SharedDocumentClient, DocumentClientError> {
        self.execute_and_log(tags::GET_CLIENT, Caller::from_static("get_client"), || async {
            self.inner
                .client
                .get_or_init(|| self.inner.source.create())
                .await
                .clone()
        })
        .await
    }

    /// Generic shape of [`execute::execute_and_log`], logging to this adapter's sink.
    pub async fn execute_and_log<T, E, F, Fut>(
        &self,
        tag: Tag,
        caller: Caller,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        execute::execute_and_log(self.sink(), tag, caller, operation).await
    }

    /// Resource shape of [`execute::execute_and_log_resource`], logging to this adapter's sink.
    pub async fn execute_and_log_resource<R, E, F, Fut>(
        &self,
        tag: Tag,
        caller: Caller,
        operation: F,
    ) -> Result<ResourceResponse<R>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResourceResponse<R>, E>>,
        E: Error + 'static,
    {
        execute::execute_and_log_resource(self.sink(), tag, caller, operation).await
    }
}

/// Fallible construction: exactly one of [`factory`](Self::factory) or
/// [`client`](Self::client) must be supplied.
#[derive(Default)]
pub struct DocumentDbAdapterBuilder {
    factory: Option<Arc<dyn DocumentClientFactory>>,
    client: Option<SharedDocumentClient>,
    settings: Option<DocumentDbSettings>,
    sink: Option<Arc<dyn TelemetrySink>>,
}

impl DocumentDbAdapterBuilder {
    pub fn factory(mut self, factory: Arc<dyn DocumentClientFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn client(mut self, client: SharedDocumentClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn settings(mut self, settings: DocumentDbSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Defaults to [`TracingSink`].
    pub fn sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<DocumentDbAdapter, AdapterError> {
        let source = match (self.factory, self.client) {
            (Some(factory), None) => ClientSource::Factory {
                factory,
                settings: self.settings,
            },
            (None, Some(client)) => {
                if self.settings.is_some() {
                    return Err(AdapterError::ConflictingArguments(
                        "settings are only used in factory mode",
                    ));
                }
                ClientSource::Direct(client)
            }
            (Some(_), Some(_)) => {
                return Err(AdapterError::ConflictingArguments(
                    "client_factory and document_client are mutually exclusive",
                ));
            }
            (None, None) if self.settings.is_some() => {
                return Err(AdapterError::MissingArgument("client_factory"));
            }
            (None, None) => {
                return Err(AdapterError::MissingArgument(
                    "client_factory or document_client",
                ));
            }
        };

        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        Ok(DocumentDbAdapter::from_source(source, sink))
    }
}
