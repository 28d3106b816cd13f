//! # docdb-adapter
//!
//! > **A lazily initialized, instrumented accessor for a document-database client.**
//!
//! This crate wraps a remote document store client and adds exactly two things:
//!
//! 1. **One shared client**, created on first use no matter how many tasks ask for it at once.
//! 2. **Uniform telemetry** around every call: cost, status code, content location and
//!    activity id on success; a tagged error record on failure.
//!
//! Everything else passes straight through. Results and errors reach the caller exactly as
//! the client produced them. There is no retry, no caching and no error translation; that
//! policy belongs to the client library or the caller.
//!
//! ## 🏗️ Design
//!
//! ### Decorator, not framework
//! [`DocumentDbAdapter`] does not implement the store. It consumes a [`DocumentClient`]
//! (directly, or through a [`DocumentClientFactory`]) and decorates calls to it. The same
//! wrappers are public ([`execute_and_log`], [`execute_and_log_resource`]) so code that
//! talks to the client itself gets identical logging.
//!
//! ### Execute once, publish once
//! The client slot is a `tokio::sync::OnceCell` holding the factory's `Result`. Concurrent
//! first callers wait on one construction; a failed construction is shared, not retried.
//!
//! ### Telemetry never changes outcomes
//! Records go to a [`TelemetrySink`]. A sink that fails while recording a success is
//! ignored; the caller still gets the response.
//!
//! ## 🗺️ Module Tour
//!
//! - [`adapter`]: the adapter, its builder, the execute-and-log wrappers and the
//!   instrumented resource operations.
//! - [`client`]: the consumed [`DocumentClient`] / [`DocumentClientFactory`] traits and
//!   the resource/response types.
//! - [`telemetry`]: tags, caller labels, records and sinks ([`TracingSink`], [`ChannelSink`]).
//! - [`config`]: [`DocumentDbSettings`], passed through to the factory.
//! - [`error`]: [`AdapterError`] and [`DocumentClientError`].
//! - [`mock`]: in-memory client, counting factory and recording sink for tests.
//!
//! ## 🚀 Quick Start
//!
//! ```
//! use docdb_adapter::client::{links, Database};
//! use docdb_adapter::mock::MockClientFactory;
//! use docdb_adapter::DocumentDbAdapter;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), docdb_adapter::DocumentClientError> {
//! let adapter = DocumentDbAdapter::new(Arc::new(MockClientFactory::new()), None);
//!
//! let created = adapter.create_database(Database::new("shop")).await?;
//! assert_eq!(created.status_code(), 201);
//!
//! let read = adapter.read_database(&links::database("shop")).await?;
//! assert_eq!(read.resource().map(|db| db.id.as_str()), Some("shop"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod telemetry;

pub use adapter::{execute_and_log, execute_and_log_resource, DocumentDbAdapter, DocumentDbAdapterBuilder};
pub use client::{DocumentClient, DocumentClientFactory, ResourceResponse, SharedDocumentClient};
pub use config::DocumentDbSettings;
pub use error::{AdapterError, DocumentClientError, RemoteError};
pub use telemetry::{Caller, ChannelSink, Tag, TelemetrySink, TracingSink};
