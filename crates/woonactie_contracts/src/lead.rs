#![forbid(unsafe_code)]

use crate::{ContractViolation, SchemaVersion, Validate};

pub const LEAD_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

// Field length bounds (mirror the capture form input limits).
pub const MAX_POSTCODE_LEN: usize = 7;
pub const MAX_HOUSE_NUMBER_LEN: usize = 8;
pub const MAX_SUFFIX_LEN: usize = 5;
pub const MAX_TEXT_FIELD_LEN: usize = 128;

/// One screen of the funnel. Exactly one step is active per session; order is
/// enforced by which targets each screen requests, never by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunnelStep {
    Landing,
    Checking,
    Selection,
    ContactCapture,
    Confirmation,
    Reporting,
}

impl FunnelStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStep::Landing => "landing",
            FunnelStep::Checking => "checking",
            FunnelStep::Selection => "selection",
            FunnelStep::ContactCapture => "contact_capture",
            FunnelStep::Confirmation => "confirmation",
            FunnelStep::Reporting => "reporting",
        }
    }
}

/// Form field identifiers. `as_str` yields the Dutch wire/table name, which is
/// also the key the capture screens use for per-field error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Postcode,
    HouseNumber,
    HouseNumberSuffix,
    Solution,
    FullName,
    Email,
    Phone,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Postcode => "postcode",
            FormField::HouseNumber => "huisnummer",
            FormField::HouseNumberSuffix => "toevoeging",
            FormField::Solution => "oplossing",
            FormField::FullName => "naam",
            FormField::Email => "email",
            FormField::Phone => "telefoon",
        }
    }
}

/// Closed interest-category vocabulary. Slugs are persisted and sent on the
/// wire; labels are the display strings the selection screen offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SolutionCategory {
    Zonnepanelen,
    Warmtepomp,
    Kozijnen,
    Thuisbatterij,
    Alarmsysteem,
    IsolatieWerkzaamheden,
    Dakwerk,
    Traprenovatie,
}

impl SolutionCategory {
    pub const ALL: [SolutionCategory; 8] = [
        SolutionCategory::Zonnepanelen,
        SolutionCategory::Warmtepomp,
        SolutionCategory::Kozijnen,
        SolutionCategory::Thuisbatterij,
        SolutionCategory::Alarmsysteem,
        SolutionCategory::IsolatieWerkzaamheden,
        SolutionCategory::Dakwerk,
        SolutionCategory::Traprenovatie,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            SolutionCategory::Zonnepanelen => "zonnepanelen",
            SolutionCategory::Warmtepomp => "warmtepomp",
            SolutionCategory::Kozijnen => "kozijnen",
            SolutionCategory::Thuisbatterij => "thuisbatterij",
            SolutionCategory::Alarmsysteem => "alarmsysteem",
            SolutionCategory::IsolatieWerkzaamheden => "isolatie-werkzaamheden",
            SolutionCategory::Dakwerk => "dakwerk",
            SolutionCategory::Traprenovatie => "traprenovatie",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SolutionCategory::Zonnepanelen => "Zonnepanelen",
            SolutionCategory::Warmtepomp => "Warmtepomp",
            SolutionCategory::Kozijnen => "Kozijnen",
            SolutionCategory::Thuisbatterij => "Thuisbatterij",
            SolutionCategory::Alarmsysteem => "Alarmsysteem",
            SolutionCategory::IsolatieWerkzaamheden => "Isolatie werkzaamheden",
            SolutionCategory::Dakwerk => "Dakwerk",
            SolutionCategory::Traprenovatie => "Traprenovatie",
        }
    }

    pub fn parse(slug: &str) -> Option<SolutionCategory> {
        SolutionCategory::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == slug)
    }
}

/// Shared form state for one funnel run. Fields are written by the step that
/// collects them and validated only at that step's gate; everything else may
/// stay empty. Serializes with the Dutch wire keys because the webhook payload
/// and table columns predate this implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LeadForm {
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

impl LeadForm {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Postcode => &self.postcode,
            FormField::HouseNumber => &self.house_number,
            FormField::HouseNumberSuffix => &self.house_number_suffix,
            FormField::Solution => &self.solution,
            FormField::FullName => &self.full_name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
        }
    }

    /// Shallow merge: present fields overwrite, absent fields are preserved.
    /// No validation happens on write; gates run at transition time.
    pub fn merge(&mut self, update: LeadFormUpdate) {
        if let Some(v) = update.postcode {
            self.postcode = v;
        }
        if let Some(v) = update.house_number {
            self.house_number = v;
        }
        if let Some(v) = update.house_number_suffix {
            self.house_number_suffix = v;
        }
        if let Some(v) = update.solution {
            self.solution = v;
        }
        if let Some(v) = update.full_name {
            self.full_name = v;
        }
        if let Some(v) = update.email {
            self.email = v;
        }
        if let Some(v) = update.phone {
            self.phone = v;
        }
    }

    /// Combined address line used by the confirmation recap and reporting
    /// rows: `postcode huisnummer[ toevoeging]`.
    pub fn address_line(&self) -> String {
        let mut out = format!("{} {}", self.postcode, self.house_number);
        if !self.house_number_suffix.is_empty() {
            out.push(' ');
            out.push_str(&self.house_number_suffix);
        }
        out
    }
}

impl Validate for LeadForm {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.postcode.len() > MAX_POSTCODE_LEN {
            return Err(ContractViolation::InvalidValue {
                field: "lead_form.postcode",
                reason: "must be <= 7 chars",
            });
        }
        if self.house_number.len() > MAX_HOUSE_NUMBER_LEN {
            return Err(ContractViolation::InvalidValue {
                field: "lead_form.huisnummer",
                reason: "must be <= 8 chars",
            });
        }
        if self.house_number_suffix.len() > MAX_SUFFIX_LEN {
            return Err(ContractViolation::InvalidValue {
                field: "lead_form.toevoeging",
                reason: "must be <= 5 chars",
            });
        }
        for (field, reason, value) in [
            ("lead_form.oplossing", "must be <= 128 chars", &self.solution),
            ("lead_form.naam", "must be <= 128 chars", &self.full_name),
            ("lead_form.email", "must be <= 128 chars", &self.email),
            ("lead_form.telefoon", "must be <= 128 chars", &self.phone),
        ] {
            if value.len() > MAX_TEXT_FIELD_LEN {
                return Err(ContractViolation::InvalidValue { field, reason });
            }
        }
        Ok(())
    }
}

/// Partial form write. Only the step's own fields are set by a screen; the
/// machine applies whatever is present without judgement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFormUpdate {
    pub postcode: Option<String>,
    pub house_number: Option<String>,
    pub house_number_suffix: Option<String>,
    pub solution: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
