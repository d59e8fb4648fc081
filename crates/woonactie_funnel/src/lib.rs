#![forbid(unsafe_code)]

pub mod audit;
pub mod checking;
pub mod machine;
pub mod reporting;
pub mod screens;
pub mod session;

pub use audit::{AuditEvent, AuditEventType, AuditSeverity, AuditSink, MemoryAuditLog};
pub use checking::{CheckConfig, CheckTick, EligibilityCheck};
pub use machine::FunnelMachine;
pub use reporting::{LeadStats, ReportingScreen};
pub use screens::{
    ConfirmationScreen, ConfirmationSummary, ContactScreen, LandingScreen, SelectionScreen,
    SubmitOutcome,
};
pub use session::{FunnelConfig, FunnelSession};
