#![forbid(unsafe_code)]

use crate::lead::{LeadForm, SolutionCategory};
use crate::{ContractViolation, SchemaVersion, Validate};

pub const SUBMISSION_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Server-assigned record id. Opaque to the funnel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmissionId(String);

impl SubmissionId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        let v = Self(id);
        v.validate()?;
        Ok(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for SubmissionId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "submission_id",
                reason: "must not be empty",
            });
        }
        if self.0.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "submission_id",
                reason: "must be <= 64 chars",
            });
        }
        if !self.0.is_ascii() {
            return Err(ContractViolation::InvalidValue {
                field: "submission_id",
                reason: "must be ASCII",
            });
        }
        Ok(())
    }
}

/// Client-side record handed to the store: the form snapshot at submit time,
/// nothing session-scoped, no id or timestamps (the server assigns those).
/// Field values are stored exactly as entered; only validation trims.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubmissionInput {
    pub postcode: String,
    #[serde(rename = "huisnummer")]
    pub house_number: String,
    #[serde(rename = "toevoeging")]
    pub house_number_suffix: String,
    #[serde(rename = "oplossing")]
    pub solution: String,
    #[serde(rename = "naam")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "telefoon")]
    pub phone: String,
}

impl SubmissionInput {
    /// Snapshot the merged form. Callers run the gates first; this enforces
    /// only structural requirements (field bounds, required presence, known
    /// slug), not user-facing formats.
    pub fn v1(form: &LeadForm) -> Result<SubmissionInput, ContractViolation> {
        form.validate()?;
        let input = SubmissionInput {
            postcode: form.postcode.clone(),
            house_number: form.house_number.clone(),
            house_number_suffix: form.house_number_suffix.clone(),
            solution: form.solution.clone(),
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
        };
        input.validate()?;
        Ok(input)
    }
}

impl Validate for SubmissionInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        for (field, value) in [
            ("submission_input.postcode", &self.postcode),
            ("submission_input.huisnummer", &self.house_number),
            ("submission_input.naam", &self.full_name),
            ("submission_input.email", &self.email),
            ("submission_input.telefoon", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(ContractViolation::InvalidValue {
                    field,
                    reason: "must not be empty",
                });
            }
        }
        if SolutionCategory::parse(self.solution.trim()).is_none() {
            return Err(ContractViolation::InvalidValue {
                field: "submission_input.oplossing",
                reason: "must be a known solution slug",
            });
        }
        Ok(())
    }
}
