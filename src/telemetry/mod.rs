//! # Telemetry
//!
//! Every call the adapter wraps ends in at most one record handed to a [`TelemetrySink`]:
//!
//! - [`TraceRecord`]: an info-level record describing a successful resource call
//!   (caller, cost, status code, content location, activity id).
//! - [`ExceptionRecord`]: an error-level record describing a failed call.
//!
//! Records are tagged with a [`Tag`] (a stable, greppable id per call site) and a
//! [`Category`]. The default sink, [`TracingSink`], turns them into `tracing` events
//! with structured fields. [`ChannelSink`] forwards them to a background consumer.
//!
//! ## Sink failures
//!
//! A sink may fail (a full or closed channel, for instance). The adapter discards
//! those failures: telemetry never changes the outcome a caller observes.

pub mod channel;
pub mod subscriber;

pub use channel::ChannelSink;
pub use subscriber::setup_tracing;

use crate::client::ResourceResponse;
use crate::error::{as_remote, AdapterError};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use tracing::Level;

/// Machine-searchable identifier of a log call site, rendered as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub u32);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    DocumentDb,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::DocumentDb => f.write_str("DocumentDb"),
        }
    }
}

/// Label naming the public operation a record is attributed to.
///
/// Use [`caller!`](crate::caller) to capture the enclosing function name, or
/// [`Caller::new`] for an explicit label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller(Cow<'static, str>);

impl Caller {
    /// Validates an explicit label. Blank labels are rejected.
    pub fn new(label: impl Into<Cow<'static, str>>) -> Result<Self, AdapterError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(AdapterError::InvalidCaller(label.into_owned()));
        }
        Ok(Self(label))
    }

    /// Label known at compile time. Used by the adapter's own operations and [`caller!`](crate::caller).
    pub const fn from_static(label: &'static str) -> Self {
        Self(Cow::Borrowed(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Captures the name of the enclosing function as a [`Caller`](crate::telemetry::Caller).
///
/// ```
/// use docdb_adapter::caller;
///
/// fn load_profile() -> docdb_adapter::telemetry::Caller {
///     caller!()
/// }
///
/// assert_eq!(load_profile().as_str(), "load_profile");
/// ```
#[macro_export]
macro_rules! caller {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let path = __type_name_of(__here);
        let path = path.strip_suffix("::__here").unwrap_or(path);
        let path = path.trim_end_matches("::{{closure}}");
        $crate::telemetry::Caller::from_static(path.rsplit("::").next().unwrap_or(path))
    }};
}

/// Info record for a successful resource call.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    pub tag: Tag,
    pub category: Category,
    pub level: Level,
    pub caller: Caller,
    pub activity_id: String,
    pub request_charge: f64,
    pub status_code: u16,
    pub content_location: Option<String>,
}

impl TraceRecord {
    pub fn from_response<R>(tag: Tag, caller: Caller, response: &ResourceResponse<R>) -> Self {
        Self {
            tag,
            category: Category::DocumentDb,
            level: Level::INFO,
            caller,
            activity_id: response.activity_id().to_string(),
            request_charge: response.request_charge(),
            status_code: response.status_code(),
            content_location: response.content_location().map(str::to_string),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Operation: {} Cost: {} ContentLocation: {} StatusCode: {} ActivityId: {}",
            self.caller,
            self.request_charge,
            self.content_location.as_deref().unwrap_or(""),
            self.status_code,
            self.activity_id,
        )
    }
}

/// Whether a failure came from the remote store or from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    DocumentClient,
    Other,
}

/// Error record for a failed call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionRecord {
    pub tag: Tag,
    pub category: Category,
    pub caller: Caller,
    pub kind: FailureKind,
    /// Rust type name of the error that was returned to the caller.
    pub error_type: &'static str,
    pub error: String,
    pub message: String,
}

impl ExceptionRecord {
    pub fn from_error<E>(tag: Tag, caller: Caller, error: &E) -> Self
    where
        E: Error + 'static,
    {
        let dyn_error: &(dyn Error + 'static) = error;
        let (kind, message) = match as_remote(dyn_error) {
            Some(remote) => (
                FailureKind::DocumentClient,
                format!("Operation: {} {}", caller, remote.to_error_message()),
            ),
            None => (
                FailureKind::Other,
                format!("Exception detected. Caller: {caller} Error: {error}."),
            ),
        };

        Self {
            tag,
            category: Category::DocumentDb,
            caller,
            kind,
            error_type: std::any::type_name::<E>(),
            error: error.to_string(),
            message,
        }
    }
}

/// A record as delivered to sinks that buffer or forward.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    Trace(TraceRecord),
    Exception(ExceptionRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("Telemetry sink closed")]
    Closed,
    #[error("Telemetry sink full")]
    Full,
    #[error("Telemetry sink error: {0}")]
    Custom(String),
}

/// Destination for adapter telemetry.
pub trait TelemetrySink: Send + Sync {
    fn log_trace(&self, record: &TraceRecord) -> Result<(), SinkError>;

    fn report_exception(&self, record: &ExceptionRecord) -> Result<(), SinkError>;
}

/// Emits records as `tracing` events with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn log_trace(&self, record: &TraceRecord) -> Result<(), SinkError> {
        macro_rules! emit {
            ($level:expr) => {
                tracing::event!(
                    $level,
                    tag = %record.tag,
                    category = %record.category,
                    caller = %record.caller,
                    cost = record.request_charge,
                    status_code = record.status_code,
                    content_location = record.content_location.as_deref().unwrap_or(""),
                    activity_id = %record.activity_id,
                    "{}",
                    record.message()
                )
            };
        }

        match record.level {
            Level::ERROR => emit!(Level::ERROR),
            Level::WARN => emit!(Level::WARN),
            Level::INFO => emit!(Level::INFO),
            Level::DEBUG => emit!(Level::DEBUG),
            _ => emit!(Level::TRACE),
        }
        Ok(())
    }

    fn report_exception(&self, record: &ExceptionRecord) -> Result<(), SinkError> {
        tracing::error!(
            tag = %record.tag,
            category = %record.category,
            caller = %record.caller,
            kind = ?record.kind,
            error_type = record.error_type,
            error = %record.error,
            "{}",
            record.message
        );
        Ok(())
    }
}
