#![forbid(unsafe_code)]

use woonactie_contracts::gates::{category_gate, SOLUTION_REQUIRED};
use woonactie_contracts::{FunnelStep, LeadFormUpdate, MonotonicTimeMs, SolutionCategory};

use crate::audit::{AuditEventType, AuditSeverity, AuditSink};
use crate::machine::FunnelMachine;

/// Interest category picker. One single-choice error message, cleared as soon
/// as any option is chosen.
#[derive(Debug, Default)]
pub struct SelectionScreen {
    error: Option<&'static str>,
}

impl SelectionScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options() -> &'static [SolutionCategory] {
        &SolutionCategory::ALL
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn choose(&mut self, machine: &mut FunnelMachine, category: SolutionCategory) {
        machine.apply(LeadFormUpdate {
            solution: Some(category.slug().to_string()),
            ..LeadFormUpdate::default()
        });
        self.error = None;
    }

    pub fn advance(
        &mut self,
        machine: &mut FunnelMachine,
        audit: &mut impl AuditSink,
        now: MonotonicTimeMs,
    ) -> bool {
        let report = category_gate(machine.form());
        if !report.passed() {
            audit.emit(
                now,
                AuditEventType::GateFail,
                AuditSeverity::Info,
                "category gate rejected selection".to_string(),
            );
            self.error = Some(SOLUTION_REQUIRED);
            return false;
        }
        audit.emit(
            now,
            AuditEventType::GatePass,
            AuditSeverity::Info,
            "category gate passed".to_string(),
        );
        let from = machine.transition(FunnelStep::ContactCapture);
        audit.emit(
            now,
            AuditEventType::StateTransition,
            AuditSeverity::Info,
            format!(
                "{} -> {}",
                from.as_str(),
                FunnelStep::ContactCapture.as_str()
            ),
        );
        self.error = None;
        true
    }

    pub fn reset(&mut self) {
        self.error = None;
    }
}
