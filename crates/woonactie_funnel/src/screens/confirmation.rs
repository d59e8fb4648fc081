#![forbid(unsafe_code)]

use woonactie_contracts::{FunnelStep, LeadForm, MonotonicTimeMs, SolutionCategory};

use crate::audit::{AuditEventType, AuditSeverity, AuditSink};
use crate::machine::FunnelMachine;

/// Read-only recap rendered after a stored submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationSummary {
    pub address: String,
    pub solution_label: String,
    pub email: String,
    pub phone: String,
}

impl ConfirmationSummary {
    pub fn from_form(form: &LeadForm) -> Self {
        Self {
            address: form.address_line(),
            solution_label: solution_label(&form.solution),
            email: form.email.clone(),
            phone: form.phone.clone(),
        }
    }
}

/// Known slugs render their campaign label; anything else falls back to the
/// slug with hyphens spaced out and the first letter raised.
fn solution_label(slug: &str) -> String {
    if let Some(category) = SolutionCategory::parse(slug) {
        return category.label().to_string();
    }
    let spaced = slug.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

/// Confirmation step. Stateless besides the machine; its only action is the
/// restart back to a blank landing screen.
#[derive(Debug, Default)]
pub struct ConfirmationScreen;

impl ConfirmationScreen {
    pub fn new() -> Self {
        Self
    }

    pub fn summary(&self, machine: &FunnelMachine) -> ConfirmationSummary {
        ConfirmationSummary::from_form(machine.form())
    }

    /// Clear the whole form and return to the landing step for a fresh run.
    pub fn restart(
        &self,
        machine: &mut FunnelMachine,
        audit: &mut impl AuditSink,
        now: MonotonicTimeMs,
    ) {
        machine.reset_form();
        let from = machine.transition(FunnelStep::Landing);
        audit.emit(
            now,
            AuditEventType::StateTransition,
            AuditSeverity::Info,
            format!("{} -> {} (restart)", from.as_str(), FunnelStep::Landing.as_str()),
        );
    }
}
