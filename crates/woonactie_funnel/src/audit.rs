#![forbid(unsafe_code)]

use woonactie_contracts::MonotonicTimeMs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditEventType {
    GatePass,
    GateFail,
    StateTransition,
    SubmissionStored,
    SubmissionStoreFailed,
    WebhookDelivered,
    WebhookFailed,
    ReportFetchFailed,
    ReportExported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditSeverity {
    Info,
    Warn,
    Error,
}

/// Append-only session trail. Webhook failures land here as Warn and store
/// failures as Error; nothing downstream reads the trail to make decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub seq: u64,
    pub at: MonotonicTimeMs,
    pub event_type: AuditEventType,
    pub severity: AuditSeverity,
    pub detail: String,
}

pub trait AuditSink {
    fn emit(
        &mut self,
        at: MonotonicTimeMs,
        event_type: AuditEventType,
        severity: AuditSeverity,
        detail: String,
    );
}

#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    events: Vec<AuditEvent>,
    next_seq: u64,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn count_of(&self, event_type: AuditEventType) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }
}

impl AuditSink for MemoryAuditLog {
    fn emit(
        &mut self,
        at: MonotonicTimeMs,
        event_type: AuditEventType,
        severity: AuditSeverity,
        detail: String,
    ) {
        let seq = if self.next_seq == 0 { 1 } else { self.next_seq };
        self.events.push(AuditEvent {
            seq,
            at,
            event_type,
            severity,
            detail,
        });
        self.next_seq = seq.saturating_add(1);
    }
}
