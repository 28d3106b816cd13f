//! # Subscriber Setup
//!
//! Installs the process-wide `tracing` subscriber that [`TracingSink`](super::TracingSink)
//! writes to.
//!
//! Levels come from `RUST_LOG`:
//!
//! ```bash
//! # Success records (cost, status, activity id) and failures
//! RUST_LOG=info cargo run
//!
//! # Failures only
//! RUST_LOG=error cargo run
//!
//! # Adapter spans and the demo's own debug output
//! RUST_LOG=docdb_adapter=debug cargo run
//! ```
//!
//! A success record looks like:
//!
//! ```text
//! INFO create_document: Operation: create_document Cost: 6.2 ContentLocation: dbs/shop/colls/orders/docs/o-1 StatusCode: 201 ActivityId: act-5 tag=0x2f410a08 category=DocumentDb ...
//! ```

/// Initializes compact, env-filtered logging. Call once at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // tag + category identify the source
        .compact()
        .init();
}
