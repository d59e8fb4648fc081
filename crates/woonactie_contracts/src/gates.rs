#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::lead::{FormField, LeadForm, SolutionCategory};

// User-facing messages, keyed per field. Copy is fixed campaign text.
pub const POSTCODE_REQUIRED: &str = "Postcode is verplicht";
pub const POSTCODE_INVALID: &str = "Voer een geldige postcode in (1234AB)";
pub const HOUSE_NUMBER_REQUIRED: &str = "Huisnummer is verplicht";
pub const HOUSE_NUMBER_INVALID: &str = "Voer een geldig huisnummer in";
pub const SOLUTION_REQUIRED: &str = "Selecteer een duurzaamheidsoplossing";
pub const FULL_NAME_REQUIRED: &str = "Naam is verplicht";
pub const EMAIL_REQUIRED: &str = "E-mail is verplicht";
pub const EMAIL_INVALID: &str = "Voer een geldig e-mailadres in";
pub const PHONE_REQUIRED: &str = "Telefoonnummer is verplicht";
pub const PHONE_INVALID: &str = "Voer een geldig Nederlands telefoonnummer in";

/// Outcome of one gate run: per-field messages in stable field order. Empty
/// means the transition may proceed. A report is screen state, never an error
/// value; it does not cross the screen that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateReport {
    errors: BTreeMap<FormField, &'static str>,
}

impl GateReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn message(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors.iter().map(|(field, msg)| (*field, *msg))
    }

    /// Screens clear a field's message the moment that field is edited,
    /// without re-running the rest of the gate.
    pub fn clear(&mut self, field: FormField) {
        self.errors.remove(&field);
    }

    fn flag(&mut self, field: FormField, message: &'static str) {
        self.errors.insert(field, message);
    }
}

/// Step-1 gate: postcode and house number. The suffix is optional and has no
/// format constraint. Values are checked trimmed; the form keeps raw input.
pub fn address_gate(form: &LeadForm) -> GateReport {
    let mut report = GateReport::default();

    let postcode = form.postcode.trim();
    if postcode.is_empty() {
        report.flag(FormField::Postcode, POSTCODE_REQUIRED);
    } else if !is_valid_postcode(postcode) {
        report.flag(FormField::Postcode, POSTCODE_INVALID);
    }

    let house_number = form.house_number.trim();
    if house_number.is_empty() {
        report.flag(FormField::HouseNumber, HOUSE_NUMBER_REQUIRED);
    } else if !house_number.chars().all(|c| c.is_ascii_digit()) {
        report.flag(FormField::HouseNumber, HOUSE_NUMBER_INVALID);
    }

    report
}

/// Step-3 gate: a solution must be chosen and must be one of the fixed slugs.
pub fn category_gate(form: &LeadForm) -> GateReport {
    let mut report = GateReport::default();
    let solution = form.solution.trim();
    if solution.is_empty() || SolutionCategory::parse(solution).is_none() {
        report.flag(FormField::Solution, SOLUTION_REQUIRED);
    }
    report
}

/// Step-4 gate: name, email, phone. Runs in full on every submit attempt.
pub fn contact_gate(form: &LeadForm) -> GateReport {
    let mut report = GateReport::default();

    if form.full_name.trim().is_empty() {
        report.flag(FormField::FullName, FULL_NAME_REQUIRED);
    }

    let email = form.email.trim();
    if email.is_empty() {
        report.flag(FormField::Email, EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        report.flag(FormField::Email, EMAIL_INVALID);
    }

    let phone = form.phone.trim();
    if phone.is_empty() {
        report.flag(FormField::Phone, PHONE_REQUIRED);
    } else if !is_valid_dutch_phone(phone) {
        report.flag(FormField::Phone, PHONE_INVALID);
    }

    report
}

/// Dutch postcode: 4 digits, at most one space, 2 letters.
fn is_valid_postcode(s: &str) -> bool {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 6 || chars.len() > 7 {
        return false;
    }
    if !chars[..4].iter().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let letters = if chars.len() == 7 {
        if chars[4] != ' ' {
            return false;
        }
        &chars[5..]
    } else {
        &chars[4..]
    };
    letters.iter().all(|c| c.is_ascii_alphabetic())
}

/// Dutch phone: `+31` or `0` prefix, then a non-zero digit and 8 more digits.
/// Spaces and hyphens are stripped before checking.
fn is_valid_dutch_phone(s: &str) -> bool {
    let stripped: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let rest = match stripped.strip_prefix("+31") {
        Some(rest) => rest,
        None => match stripped.strip_prefix('0') {
            Some(rest) => rest,
            None => return false,
        },
    };
    let digits: Vec<char> = rest.chars().collect();
    digits.len() == 9 && digits[0] != '0' && digits.iter().all(|c| c.is_ascii_digit())
}

/// Basic mailbox shape: one `@`, no whitespace, and a dot inside the domain
/// with at least one character on each side.
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let (local, domain) = match s.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let chars: Vec<char> = domain.chars().collect();
    chars
        .iter()
        .enumerate()
        .any(|(i, c)| *c == '.' && i > 0 && i + 1 < chars.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::LeadFormUpdate;

    fn form_with(update: LeadFormUpdate) -> LeadForm {
        let mut form = LeadForm::default();
        form.merge(update);
        form
    }

    #[test]
    fn address_gate_accepts_compact_and_spaced_postcode() {
        for postcode in ["1234AB", "1234 AB", "1234ab", " 1234AB "] {
            let form = form_with(LeadFormUpdate {
                postcode: Some(postcode.to_string()),
                house_number: Some("12".to_string()),
                ..LeadFormUpdate::default()
            });
            let report = address_gate(&form);
            assert!(report.passed(), "expected pass for {postcode:?}");
        }
    }

    #[test]
    fn address_gate_rejects_malformed_postcodes() {
        for postcode in ["12345", "AB1234", "1234  AB", "123 4AB", "1234A", "1234ABC"] {
            let form = form_with(LeadFormUpdate {
                postcode: Some(postcode.to_string()),
                house_number: Some("12".to_string()),
                ..LeadFormUpdate::default()
            });
            let report = address_gate(&form);
            assert_eq!(
                report.message(FormField::Postcode),
                Some(POSTCODE_INVALID),
                "expected reject for {postcode:?}"
            );
        }
    }

    #[test]
    fn address_gate_requires_both_address_fields() {
        let report = address_gate(&LeadForm::default());
        assert_eq!(report.len(), 2);
        assert_eq!(report.message(FormField::Postcode), Some(POSTCODE_REQUIRED));
        assert_eq!(
            report.message(FormField::HouseNumber),
            Some(HOUSE_NUMBER_REQUIRED)
        );
    }

    #[test]
    fn address_gate_rejects_non_numeric_house_number() {
        let form = form_with(LeadFormUpdate {
            postcode: Some("1234AB".to_string()),
            house_number: Some("12a".to_string()),
            ..LeadFormUpdate::default()
        });
        let report = address_gate(&form);
        assert_eq!(
            report.message(FormField::HouseNumber),
            Some(HOUSE_NUMBER_INVALID)
        );
    }

    #[test]
    fn address_gate_ignores_suffix_content() {
        let form = form_with(LeadFormUpdate {
            postcode: Some("1234AB".to_string()),
            house_number: Some("12".to_string()),
            house_number_suffix: Some("bis".to_string()),
            ..LeadFormUpdate::default()
        });
        assert!(address_gate(&form).passed());
    }

    #[test]
    fn category_gate_requires_known_slug() {
        assert_eq!(
            category_gate(&LeadForm::default()).message(FormField::Solution),
            Some(SOLUTION_REQUIRED)
        );
        let unknown = form_with(LeadFormUpdate {
            solution: Some("zonneboiler".to_string()),
            ..LeadFormUpdate::default()
        });
        assert!(!category_gate(&unknown).passed());
        let known = form_with(LeadFormUpdate {
            solution: Some("isolatie-werkzaamheden".to_string()),
            ..LeadFormUpdate::default()
        });
        assert!(category_gate(&known).passed());
    }

    #[test]
    fn contact_gate_flags_all_missing_fields_in_field_order() {
        let report = contact_gate(&LeadForm::default());
        assert_eq!(report.len(), 3);
        let fields: Vec<FormField> = report.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec![FormField::FullName, FormField::Email, FormField::Phone]
        );
    }

    #[test]
    fn contact_gate_accepts_valid_contact_details() {
        let form = form_with(LeadFormUpdate {
            full_name: Some("Jan de Vries".to_string()),
            email: Some("jan@example.nl".to_string()),
            phone: Some("06-12345678".to_string()),
            ..LeadFormUpdate::default()
        });
        assert!(contact_gate(&form).passed());
    }

    #[test]
    fn phone_check_accepts_national_and_international_prefixes() {
        for phone in ["0612345678", "06-12345678", "06 12 34 56 78", "+31612345678", "+31 6 12345678", "0201234567"] {
            let form = form_with(LeadFormUpdate {
                full_name: Some("Jan".to_string()),
                email: Some("jan@example.nl".to_string()),
                phone: Some(phone.to_string()),
                ..LeadFormUpdate::default()
            });
            assert!(contact_gate(&form).passed(), "expected pass for {phone:?}");
        }
    }

    #[test]
    fn phone_check_rejects_zero_trunk_and_wrong_lengths() {
        for phone in ["0012345678", "061234567", "06123456789", "3161234567", "abcdefghij"] {
            let form = form_with(LeadFormUpdate {
                full_name: Some("Jan".to_string()),
                email: Some("jan@example.nl".to_string()),
                phone: Some(phone.to_string()),
                ..LeadFormUpdate::default()
            });
            assert_eq!(
                contact_gate(&form).message(FormField::Phone),
                Some(PHONE_INVALID),
                "expected reject for {phone:?}"
            );
        }
    }

    #[test]
    fn email_check_requires_dotted_domain_and_single_at() {
        for email in ["jan@example.nl", "a@b.c", "jan.jansen@sub.example.nl"] {
            let form = form_with(LeadFormUpdate {
                full_name: Some("Jan".to_string()),
                email: Some(email.to_string()),
                phone: Some("0612345678".to_string()),
                ..LeadFormUpdate::default()
            });
            assert!(contact_gate(&form).passed(), "expected pass for {email:?}");
        }
        for email in ["jan@example", "jan@@example.nl", "jan @example.nl", "@example.nl", "jan@", "jan@.nl"] {
            let form = form_with(LeadFormUpdate {
                full_name: Some("Jan".to_string()),
                email: Some(email.to_string()),
                phone: Some("0612345678".to_string()),
                ..LeadFormUpdate::default()
            });
            assert_eq!(
                contact_gate(&form).message(FormField::Email),
                Some(EMAIL_INVALID),
                "expected reject for {email:?}"
            );
        }
    }

    #[test]
    fn gates_validate_trimmed_values_without_mutating_form() {
        let form = form_with(LeadFormUpdate {
            full_name: Some("  Jan  ".to_string()),
            email: Some(" jan@example.nl ".to_string()),
            phone: Some(" 0612345678 ".to_string()),
            ..LeadFormUpdate::default()
        });
        assert!(contact_gate(&form).passed());
        assert_eq!(form.full_name, "  Jan  ");
    }
}
