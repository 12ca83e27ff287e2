use crate::domain::event::PayrollEvent;
use crate::domain::ports::EventSink;
use async_trait::async_trait;
use tracing::info;

/// Forwards every event to `tracing` under the `payroll::events` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn publish(&self, event: PayrollEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(target: "payroll::events", %payload, "payroll event"),
            Err(_) => info!(target: "payroll::events", ?event, "payroll event"),
        }
    }
}
