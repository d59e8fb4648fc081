#![forbid(unsafe_code)]

use woonactie_contracts::gates::{address_gate, GateReport};
use woonactie_contracts::{FormField, FunnelStep, LeadFormUpdate, MonotonicTimeMs};

use crate::audit::{AuditEventType, AuditSeverity, AuditSink};
use crate::machine::FunnelMachine;

/// Address entry screen. Holds the last gate report so the shell can render
/// field errors; editing a field clears that field's error immediately, the
/// rest stay until the next gate run.
#[derive(Debug, Default)]
pub struct LandingScreen {
    errors: GateReport,
}

impl LandingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &GateReport {
        &self.errors
    }

    pub fn set_postcode(&mut self, machine: &mut FunnelMachine, value: impl Into<String>) {
        machine.apply(LeadFormUpdate {
            postcode: Some(value.into()),
            ..LeadFormUpdate::default()
        });
        self.errors.clear(FormField::Postcode);
    }

    pub fn set_house_number(&mut self, machine: &mut FunnelMachine, value: impl Into<String>) {
        machine.apply(LeadFormUpdate {
            house_number: Some(value.into()),
            ..LeadFormUpdate::default()
        });
        self.errors.clear(FormField::HouseNumber);
    }

    pub fn set_house_number_suffix(
        &mut self,
        machine: &mut FunnelMachine,
        value: impl Into<String>,
    ) {
        machine.apply(LeadFormUpdate {
            house_number_suffix: Some(value.into()),
            ..LeadFormUpdate::default()
        });
        self.errors.clear(FormField::HouseNumberSuffix);
    }

    /// Run the address gate. On pass the machine moves to the checking step
    /// and the caller is expected to start an eligibility check.
    pub fn check_postcode(
        &mut self,
        machine: &mut FunnelMachine,
        audit: &mut impl AuditSink,
        now: MonotonicTimeMs,
    ) -> bool {
        let report = address_gate(machine.form());
        if !report.passed() {
            audit.emit(
                now,
                AuditEventType::GateFail,
                AuditSeverity::Info,
                format!("address gate rejected {} field(s)", report.len()),
            );
            self.errors = report;
            return false;
        }
        audit.emit(
            now,
            AuditEventType::GatePass,
            AuditSeverity::Info,
            "address gate passed".to_string(),
        );
        let from = machine.transition(FunnelStep::Checking);
        audit.emit(
            now,
            AuditEventType::StateTransition,
            AuditSeverity::Info,
            format!("{} -> {}", from.as_str(), FunnelStep::Checking.as_str()),
        );
        self.errors = GateReport::default();
        true
    }

    pub fn reset(&mut self) {
        self.errors = GateReport::default();
    }
}
