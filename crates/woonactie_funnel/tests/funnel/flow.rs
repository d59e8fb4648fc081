#![forbid(unsafe_code)]

use chrono::{TimeZone, Utc};
use woonactie_contracts::{
    FunnelStep, LeadForm, MonotonicTimeMs, SolutionCategory, SubmissionInput,
};
use woonactie_engines::WebhookNotifierRuntime;
use woonactie_funnel::{AuditEventType, FunnelSession, SubmitOutcome};
use woonactie_storage::{MemorySubmissionStore, StoreError, SubmissionRecord, SubmissionStore};

struct FailingStore;

impl SubmissionStore for FailingStore {
    fn insert(&mut self, _input: &SubmissionInput) -> Result<SubmissionRecord, StoreError> {
        Err(StoreError::Http {
            status: 503,
            detail: "service unavailable".to_string(),
        })
    }

    fn list_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        Err(StoreError::Http {
            status: 503,
            detail: "service unavailable".to_string(),
        })
    }
}

fn session_on_checking() -> FunnelSession {
    let mut session = FunnelSession::default();
    session.set_postcode("1234AB");
    session.set_house_number("12");
    assert!(session.check_postcode(MonotonicTimeMs(0)));
    session
}

/// Emulate the shell's timer loop: sleep until each suggested wake instant
/// and tick, until the machine leaves the checking step.
fn drive_check_to_selection(session: &mut FunnelSession) -> MonotonicTimeMs {
    let mut now = MonotonicTimeMs(0);
    for _ in 0..200 {
        if session.step() != FunnelStep::Checking {
            return now;
        }
        let Some(wake) = session.next_wake_at(now) else {
            return now;
        };
        now = wake;
        session.on_tick(now);
    }
    panic!("eligibility check never settled");
}

fn session_on_contact() -> (FunnelSession, MonotonicTimeMs) {
    let mut session = session_on_checking();
    let now = drive_check_to_selection(&mut session);
    session.choose_solution(SolutionCategory::Zonnepanelen);
    assert!(session.advance_to_contact(now));
    session.set_full_name("Jan Jansen");
    session.set_email("jan@example.nl");
    session.set_phone("0612345678");
    (session, now)
}

#[test]
fn happy_path_walks_every_step_and_stores_one_record() {
    let (mut session, now) = session_on_contact();
    let mut store = MemorySubmissionStore::new_in_memory();
    let notifier = WebhookNotifierRuntime::LoopbackAck;

    let outcome = session.submit(&mut store, &notifier, now.saturating_add(50));
    let record = match outcome {
        SubmitOutcome::Stored(record) => record,
        other => panic!("expected Stored, got {other:?}"),
    };

    assert_eq!(session.step(), FunnelStep::Confirmation);
    assert_eq!(store.submission_count(), 1);
    assert_eq!(record.solution, "zonnepanelen");
    assert_eq!(record.address_line(), "1234AB 12");

    let summary = session.confirmation_summary();
    assert_eq!(summary.address, "1234AB 12");
    assert_eq!(summary.solution_label, "Zonnepanelen");
    assert_eq!(summary.email, "jan@example.nl");

    let kinds: Vec<AuditEventType> = session
        .audit()
        .events()
        .iter()
        .map(|e| e.event_type)
        .collect();
    assert_eq!(
        kinds,
        vec![
            AuditEventType::GatePass,
            AuditEventType::StateTransition,
            AuditEventType::StateTransition,
            AuditEventType::GatePass,
            AuditEventType::StateTransition,
            AuditEventType::GatePass,
            AuditEventType::SubmissionStored,
            AuditEventType::WebhookDelivered,
            AuditEventType::StateTransition,
        ]
    );
}

#[test]
fn check_progress_is_monotonic_across_the_whole_run() {
    let mut session = session_on_checking();
    let mut last = 0u8;
    let mut now = MonotonicTimeMs(0);
    while session.step() == FunnelStep::Checking {
        let Some(wake) = session.next_wake_at(now) else {
            break;
        };
        now = wake;
        if let Some(tick) = session.on_tick(now) {
            assert!(tick.progress_pct >= last);
            assert!(tick.progress_pct <= 100);
            assert!(tick.carousel_index < 3);
            last = tick.progress_pct;
        }
    }
    assert_eq!(last, 100);
    assert_eq!(session.step(), FunnelStep::Selection);
}

#[test]
fn insert_failure_keeps_visitor_on_contact_with_intact_form() {
    let (mut session, now) = session_on_contact();
    let form_before = session.form().clone();
    let notifier = WebhookNotifierRuntime::LoopbackAck;

    let outcome = session.submit(&mut FailingStore, &notifier, now.saturating_add(50));

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.step(), FunnelStep::ContactCapture);
    assert_eq!(session.form(), &form_before);
    assert!(session.last_submit_error().is_some());
    assert!(!session.is_submitting());
    assert_eq!(
        session.audit().count_of(AuditEventType::SubmissionStoreFailed),
        1
    );

    // The visitor presses submit again once the backend is back.
    let mut store = MemorySubmissionStore::new_in_memory();
    let retry = session.submit(&mut store, &notifier, now.saturating_add(900));
    assert!(matches!(retry, SubmitOutcome::Stored(_)));
    assert_eq!(session.step(), FunnelStep::Confirmation);
    assert!(session.last_submit_error().is_none());
    assert_eq!(store.submission_count(), 1);
}

#[test]
fn webhook_outage_never_blocks_confirmation() {
    let (mut session, now) = session_on_contact();
    let mut store = MemorySubmissionStore::new_in_memory();
    let notifier = WebhookNotifierRuntime::AlwaysFail {
        message: "endpoint down".to_string(),
    };

    let outcome = session.submit(&mut store, &notifier, now.saturating_add(50));

    assert!(matches!(outcome, SubmitOutcome::Stored(_)));
    assert_eq!(session.step(), FunnelStep::Confirmation);
    assert_eq!(store.submission_count(), 1);
    assert_eq!(session.audit().count_of(AuditEventType::WebhookFailed), 1);
    assert_eq!(session.audit().count_of(AuditEventType::WebhookDelivered), 0);
}

#[test]
fn gate_rejection_never_touches_the_store() {
    let mut session = session_on_checking();
    let now = drive_check_to_selection(&mut session);
    session.choose_solution(SolutionCategory::Warmtepomp);
    assert!(session.advance_to_contact(now));

    // No contact details entered at all.
    let mut store = MemorySubmissionStore::new_in_memory();
    let notifier = WebhookNotifierRuntime::LoopbackAck;
    let outcome = session.submit(&mut store, &notifier, now.saturating_add(10));

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(store.submission_count(), 0);
    assert_eq!(session.step(), FunnelStep::ContactCapture);
    assert_eq!(session.contact_errors().len(), 3);
}

#[test]
fn restart_supports_a_second_full_run() {
    let (mut session, now) = session_on_contact();
    let mut store = MemorySubmissionStore::new_in_memory();
    let notifier = WebhookNotifierRuntime::LoopbackAck;
    session.submit(&mut store, &notifier, now.saturating_add(50));
    session.restart(now.saturating_add(100));

    assert_eq!(session.step(), FunnelStep::Landing);
    assert_eq!(session.form(), &LeadForm::default());

    // Second visitor on the same session object.
    session.set_postcode("5678 CD");
    session.set_house_number("7");
    session.set_house_number_suffix("B");
    assert!(session.check_postcode(now.saturating_add(200)));
    assert_eq!(session.step(), FunnelStep::Checking);
    assert!(session.checking().is_some());
    assert_eq!(store.submission_count(), 1);
}

#[test]
fn stale_timer_callback_after_restart_is_dropped() {
    let mut session = session_on_checking();
    session.on_tick(MonotonicTimeMs(300));
    // Operator abandons mid-check via restart; a queued tick then fires.
    session.restart(MonotonicTimeMs(400));
    assert_eq!(session.on_tick(MonotonicTimeMs(500)), None);
    assert_eq!(session.next_wake_at(MonotonicTimeMs(500)), None);
    assert_eq!(session.step(), FunnelStep::Landing);
}

#[test]
fn reporting_covers_rows_stored_through_the_funnel() {
    let mut store = MemorySubmissionStore::new_in_memory();
    let notifier = WebhookNotifierRuntime::LoopbackAck;

    let (mut first, now) = session_on_contact();
    first.submit(&mut store, &notifier, now.saturating_add(50));

    let mut second = FunnelSession::default();
    second.set_postcode("9876 ZX");
    second.set_house_number("3");
    assert!(second.check_postcode(MonotonicTimeMs(0)));
    let settled = drive_check_to_selection(&mut second);
    second.choose_solution(SolutionCategory::Zonnepanelen);
    assert!(second.advance_to_contact(settled));
    second.set_full_name("Piet Pietersen");
    second.set_email("piet@example.nl");
    second.set_phone("+31612345678");
    let outcome = second.submit(&mut store, &notifier, settled.saturating_add(50));
    assert!(matches!(outcome, SubmitOutcome::Stored(_)));

    let mut operator = FunnelSession::default();
    operator.open_reporting(MonotonicTimeMs(0));
    assert_eq!(operator.step(), FunnelStep::Reporting);

    let report_now = Utc.with_ymd_and_hms(2026, 8, 22, 12, 0, 0).unwrap();
    assert!(operator.load_report(&store, &report_now, MonotonicTimeMs(1)));

    let screen = operator.reporting();
    assert_eq!(screen.rows().len(), 2);
    let stats = screen.stats().unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.top_solution.as_deref(), Some("zonnepanelen"));
    assert_eq!(stats.distinct_postcodes, 2);

    let csv = screen.export_csv(&Utc).unwrap();
    assert_eq!(csv.split('\n').count(), 3);
    assert!(csv.contains("Piet Pietersen"));

    // A backend outage afterwards keeps the loaded rows on screen.
    assert!(!operator.load_report(&FailingStore, &report_now, MonotonicTimeMs(2)));
    assert_eq!(operator.reporting().rows().len(), 2);
    assert!(operator.reporting().last_error().is_some());
}
