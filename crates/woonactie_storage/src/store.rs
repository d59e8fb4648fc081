#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use woonactie_contracts::{ContractViolation, SubmissionId, SubmissionInput, Validate};

pub const FORM_SUBMISSIONS_TABLE: &str = "form_submissions";

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Transport { detail: String },
    Http { status: u16, detail: String },
    Decode { detail: String },
    Config { field: &'static str, reason: &'static str },
    DuplicateKey { table: &'static str, key: String },
    ContractViolation(ContractViolation),
}

impl From<ContractViolation> for StoreError {
    fn from(v: ContractViolation) -> Self {
        StoreError::ContractViolation(v)
    }
}

/// One persisted lead. Immutable after creation: this system only ever
/// inserts and reads back, never updates or deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub postcode: String,
    pub house_number: String,
    pub house_number_suffix: String,
    pub solution: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn v1(
        id: SubmissionId,
        input: &SubmissionInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<SubmissionRecord, ContractViolation> {
        input.validate()?;
        Ok(SubmissionRecord {
            id,
            postcode: input.postcode.clone(),
            house_number: input.house_number.clone(),
            house_number_suffix: input.house_number_suffix.clone(),
            solution: input.solution.clone(),
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            created_at,
            updated_at,
        })
    }

    /// `postcode huisnummer[ toevoeging]`, as shown in reporting rows.
    pub fn address_line(&self) -> String {
        let mut out = format!("{} {}", self.postcode, self.house_number);
        if !self.house_number_suffix.is_empty() {
            out.push(' ');
            out.push_str(&self.house_number_suffix);
        }
        out
    }
}

/// The funnel's only persistence seam. `insert` is the required half of the
/// dual write; `list_all` feeds the reporting view and returns newest first.
pub trait SubmissionStore {
    fn insert(&mut self, input: &SubmissionInput) -> Result<SubmissionRecord, StoreError>;
    fn list_all(&self) -> Result<Vec<SubmissionRecord>, StoreError>;
}
