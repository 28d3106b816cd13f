//! # Channel Sink
//!
//! Forwards telemetry over a bounded Tokio channel to whatever task owns the
//! receiver (a shipper, an aggregator, a test). Sending never blocks the caller:
//! a full or closed channel surfaces as a [`SinkError`], which the adapter discards.

use super::{ExceptionRecord, SinkError, TelemetryEvent, TelemetrySink, TraceRecord};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<TelemetryEvent>,
}

impl ChannelSink {
    /// Creates the sink and the receiving end of its channel.
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<TelemetryEvent>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }

    fn forward(&self, event: TelemetryEvent) -> Result<(), SinkError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

impl TelemetrySink for ChannelSink {
    fn log_trace(&self, record: &TraceRecord) -> Result<(), SinkError> {
        self.forward(TelemetryEvent::Trace(record.clone()))
    }

    fn report_exception(&self, record: &ExceptionRecord) -> Result<(), SinkError> {
        self.forward(TelemetryEvent::Exception(record.clone()))
    }
}
