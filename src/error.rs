//! # Adapter Errors
//!
//! Two families of errors live here:
//!
//! - [`AdapterError`]: raised by the adapter itself (argument validation, configuration).
//!   These never reach the telemetry sink.
//! - [`DocumentClientError`]: the distinguished error type raised by a remote
//!   [`DocumentClient`](crate::client::DocumentClient). The adapter logs it with
//!   remote-specific detail and hands it back to the caller untouched.
//!
//! Telemetry failures have their own type, [`SinkError`](crate::telemetry::SinkError).

use std::fmt::Write as _;
use std::time::Duration;

/// Errors produced by the adapter before any remote interaction happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdapterError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("Conflicting arguments: {0}")]
    ConflictingArguments(&'static str),
    #[error("Invalid caller label: {0:?}")]
    InvalidCaller(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<::config::ConfigError> for AdapterError {
    fn from(e: ::config::ConfigError) -> Self {
        AdapterError::Configuration(e.to_string())
    }
}

/// Error raised by the remote document store.
///
/// Carries the response metadata the service attached to the failure so that
/// the failure log line is as useful as a success line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct DocumentClientError {
    status_code: Option<u16>,
    sub_status: Option<u32>,
    activity_id: Option<String>,
    request_charge: f64,
    retry_after: Option<Duration>,
    message: String,
}

impl DocumentClientError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            sub_status: None,
            activity_id: None,
            request_charge: 0.0,
            retry_after: None,
            message: message.into(),
        }
    }

    /// A failure with no HTTP status, e.g. the client could not be constructed.
    pub fn without_status(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            ..Self::new(0, message)
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(409, message)
    }

    pub fn with_sub_status(mut self, sub_status: u32) -> Self {
        self.sub_status = Some(sub_status);
        self
    }

    pub fn with_activity_id(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = Some(activity_id.into());
        self
    }

    pub fn with_request_charge(mut self, request_charge: f64) -> Self {
        self.request_charge = request_charge;
        self
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn sub_status(&self) -> Option<u32> {
        self.sub_status
    }

    pub fn activity_id(&self) -> Option<&str> {
        self.activity_id.as_deref()
    }

    pub fn request_charge(&self) -> f64 {
        self.request_charge
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders the error with all of its response metadata on one line.
    ///
    /// Absent fields are skipped, so a client-construction failure renders as
    /// just `Message: ...`.
    pub fn to_error_message(&self) -> String {
        let mut out = String::new();
        if let Some(status) = self.status_code {
            let _ = write!(out, "StatusCode: {status} ");
        }
        if let Some(sub_status) = self.sub_status {
            let _ = write!(out, "SubStatus: {sub_status} ");
        }
        if let Some(activity_id) = &self.activity_id {
            let _ = write!(out, "ActivityId: {activity_id} ");
        }
        if self.request_charge > 0.0 {
            let _ = write!(out, "RequestCharge: {} ", self.request_charge);
        }
        if let Some(retry_after) = self.retry_after {
            let _ = write!(out, "RetryAfter: {}ms ", retry_after.as_millis());
        }
        let _ = write!(out, "Message: {}", self.message);
        out
    }
}

/// Errors that originate in the remote store and carry response metadata.
///
/// The adapter's wrappers are generic over the error type; [`as_remote`] picks
/// out the ones that implement this trait so they get the detailed log line.
pub trait RemoteError: std::error::Error {
    fn to_error_message(&self) -> String;
}

impl RemoteError for DocumentClientError {
    fn to_error_message(&self) -> String {
        DocumentClientError::to_error_message(self)
    }
}

/// Views `error` as a [`RemoteError`] when it is one the adapter knows about.
pub fn as_remote<'a>(error: &'a (dyn std::error::Error + 'static)) -> Option<&'a dyn RemoteError> {
    error
        .downcast_ref::<DocumentClientError>()
        .map(|remote| remote as &dyn RemoteError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_includes_response_metadata() {
        let err = DocumentClientError::new(429, "Request rate is large")
            .with_sub_status(3200)
            .with_activity_id("act-1")
            .with_request_charge(2.5)
            .with_retry_after(Duration::from_millis(150));

        assert_eq!(
            err.to_error_message(),
            "StatusCode: 429 SubStatus: 3200 ActivityId: act-1 RequestCharge: 2.5 RetryAfter: 150ms Message: Request rate is large"
        );
        // Display stays the bare message.
        assert_eq!(err.to_string(), "Request rate is large");
    }

    #[test]
    fn error_message_skips_missing_fields() {
        let err = DocumentClientError::without_status("endpoint unreachable");
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_error_message(), "Message: endpoint unreachable");
    }

    #[test]
    fn only_client_errors_are_remote() {
        let remote = DocumentClientError::not_found("gone");
        let local = AdapterError::MissingArgument("client_factory");
        let found = as_remote(&remote).map(|e| e.to_error_message());
        assert_eq!(found, Some(remote.to_error_message()));
        assert!(as_remote(&local).is_none());
    }

    #[test]
    fn config_errors_become_configuration_errors() {
        let err: AdapterError = ::config::ConfigError::NotFound("endpoint".into()).into();
        assert!(matches!(err, AdapterError::Configuration(msg) if msg.contains("endpoint")));
    }
}
