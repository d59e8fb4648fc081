#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use woonactie_contracts::gates::GateReport;
use woonactie_contracts::{FunnelStep, LeadForm, MonotonicTimeMs, SolutionCategory};
use woonactie_engines::WebhookNotifierRuntime;
use woonactie_storage::SubmissionStore;

use crate::audit::{AuditEventType, AuditSeverity, AuditSink, MemoryAuditLog};
use crate::checking::{CheckConfig, CheckTick, EligibilityCheck};
use crate::machine::FunnelMachine;
use crate::reporting::ReportingScreen;
use crate::screens::{
    ConfirmationScreen, ConfirmationSummary, ContactScreen, LandingScreen, SelectionScreen,
    SubmitOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunnelConfig {
    pub check: CheckConfig,
}

impl FunnelConfig {
    pub fn mvp_v1() -> Self {
        Self {
            check: CheckConfig::mvp_v1(),
        }
    }
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self::mvp_v1()
    }
}

/// One visitor's funnel run plus the operator report, wired over a machine,
/// the step screens, and an in-memory audit trail. The embedding shell owns
/// the store, the notifier, and both clocks; every entry point takes the
/// instants it needs.
#[derive(Debug)]
pub struct FunnelSession {
    config: FunnelConfig,
    machine: FunnelMachine,
    landing: LandingScreen,
    checking: Option<EligibilityCheck>,
    selection: SelectionScreen,
    contact: ContactScreen,
    confirmation: ConfirmationScreen,
    reporting: ReportingScreen,
    audit: MemoryAuditLog,
}

impl FunnelSession {
    pub fn new(config: FunnelConfig) -> Self {
        Self {
            config,
            machine: FunnelMachine::new(),
            landing: LandingScreen::new(),
            checking: None,
            selection: SelectionScreen::new(),
            contact: ContactScreen::new(),
            confirmation: ConfirmationScreen::new(),
            reporting: ReportingScreen::new(),
            audit: MemoryAuditLog::new(),
        }
    }

    pub fn step(&self) -> FunnelStep {
        self.machine.step()
    }

    pub fn form(&self) -> &LeadForm {
        self.machine.form()
    }

    pub fn audit(&self) -> &MemoryAuditLog {
        &self.audit
    }

    // Landing step.

    pub fn set_postcode(&mut self, value: impl Into<String>) {
        self.landing.set_postcode(&mut self.machine, value);
    }

    pub fn set_house_number(&mut self, value: impl Into<String>) {
        self.landing.set_house_number(&mut self.machine, value);
    }

    pub fn set_house_number_suffix(&mut self, value: impl Into<String>) {
        self.landing.set_house_number_suffix(&mut self.machine, value);
    }

    pub fn landing_errors(&self) -> &GateReport {
        self.landing.errors()
    }

    /// Address gate plus, on pass, the start of the simulated check. The
    /// check's tickers are anchored to `now`.
    pub fn check_postcode(&mut self, now: MonotonicTimeMs) -> bool {
        if !self
            .landing
            .check_postcode(&mut self.machine, &mut self.audit, now)
        {
            return false;
        }
        self.checking = Some(EligibilityCheck::begin(self.config.check, now));
        true
    }

    // Checking step.

    pub fn checking(&self) -> Option<&EligibilityCheck> {
        self.checking.as_ref()
    }

    /// Drive the check. Returns `None` once the step no longer runs, which
    /// also tears the check state down so a stale timer callback after the
    /// step exits is a no-op.
    pub fn on_tick(&mut self, now: MonotonicTimeMs) -> Option<CheckTick> {
        if self.machine.step() != FunnelStep::Checking {
            self.checking = None;
            return None;
        }
        let check = self.checking.as_mut()?;
        let tick = check.on_tick(now);
        if tick.transition_due {
            self.checking = None;
            let from = self.machine.transition(FunnelStep::Selection);
            self.audit.emit(
                now,
                AuditEventType::StateTransition,
                AuditSeverity::Info,
                format!("{} -> {}", from.as_str(), FunnelStep::Selection.as_str()),
            );
        }
        Some(tick)
    }

    /// When the shell should tick next. `None` whenever no check is running.
    pub fn next_wake_at(&self, now: MonotonicTimeMs) -> Option<MonotonicTimeMs> {
        if self.machine.step() != FunnelStep::Checking {
            return None;
        }
        self.checking.as_ref().map(|c| c.next_wake_at(now))
    }

    // Selection step.

    pub fn selection_error(&self) -> Option<&'static str> {
        self.selection.error()
    }

    pub fn choose_solution(&mut self, category: SolutionCategory) {
        self.selection.choose(&mut self.machine, category);
    }

    pub fn advance_to_contact(&mut self, now: MonotonicTimeMs) -> bool {
        self.selection
            .advance(&mut self.machine, &mut self.audit, now)
    }

    // Contact step.

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        self.contact.set_full_name(&mut self.machine, value);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.contact.set_email(&mut self.machine, value);
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.contact.set_phone(&mut self.machine, value);
    }

    pub fn contact_errors(&self) -> &GateReport {
        self.contact.errors()
    }

    pub fn is_submitting(&self) -> bool {
        self.contact.is_submitting()
    }

    pub fn last_submit_error(&self) -> Option<&'static str> {
        self.contact.last_error()
    }

    pub fn submit<S: SubmissionStore>(
        &mut self,
        store: &mut S,
        notifier: &WebhookNotifierRuntime,
        now: MonotonicTimeMs,
    ) -> SubmitOutcome {
        self.contact
            .submit(&mut self.machine, store, notifier, &mut self.audit, now)
    }

    // Confirmation step.

    pub fn confirmation_summary(&self) -> ConfirmationSummary {
        self.confirmation.summary(&self.machine)
    }

    /// Back to a blank landing screen. Screen-local error state is dropped
    /// along with the form.
    pub fn restart(&mut self, now: MonotonicTimeMs) {
        self.confirmation
            .restart(&mut self.machine, &mut self.audit, now);
        self.landing.reset();
        self.selection.reset();
        self.contact.reset();
        self.checking = None;
    }

    // Reporting.

    pub fn reporting(&self) -> &ReportingScreen {
        &self.reporting
    }

    pub fn open_reporting(&mut self, now: MonotonicTimeMs) {
        let from = self.machine.transition(FunnelStep::Reporting);
        self.audit.emit(
            now,
            AuditEventType::StateTransition,
            AuditSeverity::Info,
            format!("{} -> {}", from.as_str(), FunnelStep::Reporting.as_str()),
        );
    }

    pub fn load_report<S: SubmissionStore, Tz: TimeZone>(
        &mut self,
        store: &S,
        now: &DateTime<Tz>,
        at: MonotonicTimeMs,
    ) -> bool {
        self.reporting.load(store, now, &mut self.audit, at)
    }

    pub fn export_report<Tz: TimeZone>(
        &mut self,
        dir: &Path,
        now: &DateTime<Tz>,
        at: MonotonicTimeMs,
    ) -> std::io::Result<Option<PathBuf>> {
        self.reporting
            .write_csv_export(dir, now, &mut self.audit, at)
    }
}

impl Default for FunnelSession {
    fn default() -> Self {
        Self::new(FunnelConfig::default())
    }
}
