//! Preparation journal.
//!
//! Machines can carry an [`AuditSink`] that receives one event per
//! preparation milestone (start, complete, reject, fail).

use std::collections::VecDeque;

use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Order the event belongs to.
    pub order_id: String,
    /// Requested beverage.
    pub beverage: String,
    /// Milestone reached (start, complete, reject, fail).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Failure reason, if any.
    pub reason: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// Bounded in-memory sink; drops the oldest event when full.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards every event to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "coffee_machine::audit",
            order_id = %event.order_id,
            beverage = %event.beverage,
            action = %event.action,
            reason = event.reason.as_deref().unwrap_or(""),
            "order event"
        );
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    order_id: impl Into<String>,
    beverage: impl Into<String>,
    action: impl Into<String>,
    reason: Option<String>,
) -> AuditEvent {
    AuditEvent {
        order_id: order_id.into(),
        beverage: beverage.into(),
        action: action.into(),
        created_at_ms: now_ms(),
        reason,
    }
}
