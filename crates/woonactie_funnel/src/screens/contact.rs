#![forbid(unsafe_code)]

use woonactie_contracts::gates::{contact_gate, GateReport};
use woonactie_contracts::{FormField, FunnelStep, LeadFormUpdate, MonotonicTimeMs, SubmissionInput};
use woonactie_engines::WebhookNotifierRuntime;
use woonactie_storage::{StoreError, SubmissionRecord, SubmissionStore};

use crate::audit::{AuditEventType, AuditSeverity, AuditSink};
use crate::machine::FunnelMachine;

/// Shown when the required insert fails. The visitor keeps their input and may
/// simply press submit again.
pub const SUBMIT_FAILED_MESSAGE: &str =
    "Er is een fout opgetreden bij het opslaan van uw gegevens. Probeer het opnieuw.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Contact gate rejected the form; field errors were recorded.
    Rejected,
    /// A submit is already running; this press was dropped.
    AlreadyInFlight,
    /// Insert succeeded. Webhook delivery may still have failed, which is
    /// recorded in the audit trail but never surfaces here.
    Stored(SubmissionRecord),
    /// Insert failed; the form is untouched and the step did not change.
    Failed,
}

/// Contact capture and the dual-write submit. The insert is required, the
/// webhook is best effort; only the insert outcome decides whether the
/// visitor moves to confirmation.
#[derive(Debug, Default)]
pub struct ContactScreen {
    errors: GateReport,
    submitting: bool,
    last_error: Option<&'static str>,
}

impl ContactScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &GateReport {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&'static str> {
        self.last_error
    }

    pub fn set_full_name(&mut self, machine: &mut FunnelMachine, value: impl Into<String>) {
        machine.apply(LeadFormUpdate {
            full_name: Some(value.into()),
            ..LeadFormUpdate::default()
        });
        self.errors.clear(FormField::FullName);
    }

    pub fn set_email(&mut self, machine: &mut FunnelMachine, value: impl Into<String>) {
        machine.apply(LeadFormUpdate {
            email: Some(value.into()),
            ..LeadFormUpdate::default()
        });
        self.errors.clear(FormField::Email);
    }

    pub fn set_phone(&mut self, machine: &mut FunnelMachine, value: impl Into<String>) {
        machine.apply(LeadFormUpdate {
            phone: Some(value.into()),
            ..LeadFormUpdate::default()
        });
        self.errors.clear(FormField::Phone);
    }

    /// Gate, guard, insert, notify, advance. The webhook runs only after a
    /// successful insert and its failure never blocks the confirmation step.
    pub fn submit<S: SubmissionStore>(
        &mut self,
        machine: &mut FunnelMachine,
        store: &mut S,
        notifier: &WebhookNotifierRuntime,
        audit: &mut impl AuditSink,
        now: MonotonicTimeMs,
    ) -> SubmitOutcome {
        let report = contact_gate(machine.form());
        if !report.passed() {
            audit.emit(
                now,
                AuditEventType::GateFail,
                AuditSeverity::Info,
                format!("contact gate rejected {} field(s)", report.len()),
            );
            self.errors = report;
            return SubmitOutcome::Rejected;
        }
        audit.emit(
            now,
            AuditEventType::GatePass,
            AuditSeverity::Info,
            "contact gate passed".to_string(),
        );
        if self.submitting {
            return SubmitOutcome::AlreadyInFlight;
        }
        self.submitting = true;
        self.errors = GateReport::default();

        let stored = SubmissionInput::v1(machine.form())
            .map_err(StoreError::from)
            .and_then(|input| store.insert(&input));
        let record = match stored {
            Ok(record) => record,
            Err(err) => {
                audit.emit(
                    now,
                    AuditEventType::SubmissionStoreFailed,
                    AuditSeverity::Error,
                    format!("submission insert failed: {err:?}"),
                );
                self.submitting = false;
                self.last_error = Some(SUBMIT_FAILED_MESSAGE);
                return SubmitOutcome::Failed;
            }
        };
        audit.emit(
            now,
            AuditEventType::SubmissionStored,
            AuditSeverity::Info,
            format!("submission persisted as {}", record.id.as_str()),
        );

        match notifier.notify(machine.form()) {
            Ok(ack) => audit.emit(
                now,
                AuditEventType::WebhookDelivered,
                AuditSeverity::Info,
                format!(
                    "webhook delivered ({})",
                    ack.remote_ack_ref
                        .unwrap_or_else(|| "no ack ref".to_string())
                ),
            ),
            Err(err) => audit.emit(
                now,
                AuditEventType::WebhookFailed,
                AuditSeverity::Warn,
                format!("webhook delivery failed: {}", err.summary()),
            ),
        }

        let from = machine.transition(FunnelStep::Confirmation);
        audit.emit(
            now,
            AuditEventType::StateTransition,
            AuditSeverity::Info,
            format!("{} -> {}", from.as_str(), FunnelStep::Confirmation.as_str()),
        );
        self.submitting = false;
        self.last_error = None;
        SubmitOutcome::Stored(record)
    }

    pub fn reset(&mut self) {
        self.errors = GateReport::default();
        self.submitting = false;
        self.last_error = None;
    }
}
