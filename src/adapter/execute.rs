//! # Execute and Log
//!
//! The two wrapper shapes every remote call goes through.
//!
//! | Shape | On success | On failure |
//! |---|---|---|
//! | [`execute_and_log_resource`] | one [`TraceRecord`] | one [`ExceptionRecord`] |
//! | [`execute_and_log`] | nothing | one [`ExceptionRecord`] |
//!
//! In both shapes the value or error the wrapped future produced is returned as is.
//! There is no retry, no translation and no fallback.

use crate::client::ResourceResponse;
use crate::telemetry::{Caller, ExceptionRecord, Tag, TelemetrySink, TraceRecord};
use std::error::Error;
use std::future::Future;

/// Runs `operation` and logs its failure.
///
/// [`DocumentClientError`](crate::error::DocumentClientError)s are logged with their
/// response metadata; any other error is logged with its message. Either way the
/// error comes back unchanged.
pub async fn execute_and_log<T, E, F, Fut>(
    sink: &dyn TelemetrySink,
    tag: Tag,
    caller: Caller,
    operation: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    match operation().await {
        Ok(value) => Ok(value),
        Err(error) => {
            let record = ExceptionRecord::from_error(tag, caller, &error);
            // A failing sink must not replace the caller's error.
            let _ = sink.report_exception(&record);
            Err(error)
        }
    }
}

/// Runs a resource operation, logging its cost and status on success and its
/// failure otherwise.
///
/// Sink errors while recording the success are discarded.
pub async fn execute_and_log_resource<R, E, F, Fut>(
    sink: &dyn TelemetrySink,
    tag: Tag,
    caller: Caller,
    operation: F,
) -> Result<ResourceResponse<R>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<ResourceResponse<R>, E>>,
    E: Error + 'static,
{
    let trace_caller = caller.clone();
    execute_and_log(sink, tag, caller, || async move {
        let response = operation().await?;
        let _ = sink.log_trace(&TraceRecord::from_response(tag, trace_caller, &response));
        Ok::<_, E>(response)
    })
    .await
}
