#![forbid(unsafe_code)]

pub mod common;
pub mod gates;
pub mod lead;
pub mod submission;

pub use common::{ContractViolation, MonotonicTimeMs, SchemaVersion, Validate};
pub use lead::{FormField, FunnelStep, LeadForm, LeadFormUpdate, SolutionCategory};
pub use submission::{SubmissionId, SubmissionInput};
