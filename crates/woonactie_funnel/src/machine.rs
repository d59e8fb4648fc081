#![forbid(unsafe_code)]

use woonactie_contracts::{FunnelStep, LeadForm, LeadFormUpdate};

/// Step pointer plus the shared form, and nothing else. Deliberately
/// permissive: any transition target is accepted and field writes are never
/// validated here. Gates run in the screens at transition time, and only the
/// confirmation screen resets the form when a new session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelMachine {
    step: FunnelStep,
    form: LeadForm,
}

impl FunnelMachine {
    pub fn new() -> Self {
        Self {
            step: FunnelStep::Landing,
            form: LeadForm::default(),
        }
    }

    pub fn step(&self) -> FunnelStep {
        self.step
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    /// Unconditional jump. Returns the step that was active before, so the
    /// caller can audit the edge.
    pub fn transition(&mut self, target: FunnelStep) -> FunnelStep {
        let from = self.step;
        self.step = target;
        from
    }

    pub fn apply(&mut self, update: LeadFormUpdate) {
        self.form.merge(update);
    }

    pub fn reset_form(&mut self) {
        self.form = LeadForm::default();
    }
}

impl Default for FunnelMachine {
    fn default() -> Self {
        Self::new()
    }
}
