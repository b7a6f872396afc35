//! Step validator.
//!
//! `validate_step_at` is pure: same step, FormState and reference date give the
//! same result. `validate_step` supplies today's date.
//! Optional fields that are left empty never fail; `Required` and
//! `AtLeastOneEntry` are the only rules that look at blank values.

use super::definition::{FieldSpec, StepSpec};
use super::form_state::{entry_is_blank, entry_path, FieldValue, FormState};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("valid phone pattern")
});

/// Rule attached to a single field
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    /// Number strictly greater than zero
    Positive,
    NonNegative,
    /// Whole number
    Integer,
    Range { min: f64, max: f64 },
    MinLength(usize),
    Email,
    Phone,
    /// Date not after the reference date
    NotInFuture,
    /// Date not before the reference date
    NotInPast,
    /// Not more than one attached file. Combine with `Required` for "exactly one".
    SingleFile,
    /// List must contain an entry whose `text` column is filled and whose
    /// `positive` column is greater than zero. Applies to empty lists too.
    AtLeastOneEntry {
        text: &'static str,
        positive: &'static str,
        message: &'static str,
    },
    /// Every non-blank entry must have all `columns` filled in.
    CompleteEntries { columns: &'static [&'static str] },
}

impl Rule {
    fn applies_to_blank(&self) -> bool {
        matches!(self, Rule::Required | Rule::AtLeastOneEntry { .. })
    }

    /// Check `value`. List rules may report several entry-level errors.
    fn check(&self, field: &FieldSpec, value: &FieldValue, today: NaiveDate) -> Vec<(String, String)> {
        let label = field.label;
        let own = |message: String| vec![(field.name.to_string(), message)];

        if value.is_blank() && !self.applies_to_blank() {
            return Vec::new();
        }

        match self {
            Rule::Required => {
                if value.is_blank() {
                    let message = match value {
                        FieldValue::Files(_) => format!("Attach {}", label.to_lowercase()),
                        FieldValue::Flag(_) => format!("{} must be confirmed", label),
                        _ => format!("{} is required", label),
                    };
                    return own(message);
                }
            }
            Rule::Positive => {
                if value.as_number().map_or(false, |n| n <= 0.0) {
                    return own(format!("{} must be greater than zero", label));
                }
            }
            Rule::NonNegative => {
                if value.as_number().map_or(false, |n| n < 0.0) {
                    return own(format!("{} cannot be negative", label));
                }
            }
            Rule::Integer => {
                if value.as_number().map_or(false, |n| n.fract() != 0.0) {
                    return own(format!("{} must be a whole number", label));
                }
            }
            Rule::Range { min, max } => {
                if value.as_number().map_or(false, |n| n < *min || n > *max) {
                    return own(format!("{} must be between {} and {}", label, min, max));
                }
            }
            Rule::MinLength(min) => {
                if value.as_text().map_or(false, |s| s.trim().chars().count() < *min) {
                    return own(format!("{} must be at least {} characters", label, min));
                }
            }
            Rule::Email => {
                if value.as_text().map_or(false, |s| !EMAIL_RE.is_match(s.trim())) {
                    return own("Enter a valid email address".to_string());
                }
            }
            Rule::Phone => {
                if value.as_text().map_or(false, |s| !PHONE_RE.is_match(s.trim())) {
                    return own("Enter a valid phone number".to_string());
                }
            }
            Rule::NotInFuture => {
                if value.as_date().map_or(false, |d| d > today) {
                    return own(format!("{} cannot be in the future", label));
                }
            }
            Rule::NotInPast => {
                if value.as_date().map_or(false, |d| d < today) {
                    return own(format!("{} cannot be in the past", label));
                }
            }
            Rule::SingleFile => {
                if value.as_files().len() > 1 {
                    return own(format!("Attach exactly one file for {}", label.to_lowercase()));
                }
            }
            Rule::AtLeastOneEntry { text, positive, message } => {
                let found = value.as_list().iter().any(|entry| {
                    let has_text = entry
                        .get(*text)
                        .and_then(FieldValue::as_text)
                        .map_or(false, |s| !s.trim().is_empty());
                    let has_positive = entry
                        .get(*positive)
                        .and_then(FieldValue::as_number)
                        .map_or(false, |n| n > 0.0);
                    has_text && has_positive
                });
                if !found {
                    return own(message.to_string());
                }
            }
            Rule::CompleteEntries { columns } => {
                let mut errors = Vec::new();
                for (index, entry) in value.as_list().iter().enumerate() {
                    if entry_is_blank(entry) {
                        continue;
                    }
                    for column in columns.iter() {
                        let filled = entry.get(*column).map_or(false, |v| match v {
                            FieldValue::Number(Some(n)) => *n > 0.0,
                            other => !other.is_blank(),
                        });
                        if !filled {
                            let col_label = field
                                .columns()
                                .iter()
                                .find(|c| c.name == *column)
                                .map(|c| c.label)
                                .unwrap_or(*column);
                            errors.push((
                                entry_path(field.name, index, column),
                                format!("{} is required", col_label),
                            ));
                        }
                    }
                }
                return errors;
            }
        }
        Vec::new()
    }
}

/// Rule spanning several fields of a step, e.g. "bank account required for transfers".
#[derive(Clone, Copy)]
pub struct CrossRule {
    pub name: &'static str,
    pub check: fn(&FormState) -> Vec<(String, String)>,
}

impl CrossRule {
    pub const fn new(name: &'static str, check: fn(&FormState) -> Vec<(String, String)>) -> Self {
        Self { name, check }
    }
}

impl fmt::Debug for CrossRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossRule").field("name", &self.name).finish()
    }
}

/// Field name (or `list[i].column`) to message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Keep the first message reported for a field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Drop the error of `field` and of any of its list cells.
    pub fn clear_field(&mut self, field: &str) -> bool {
        let prefix = format!("{}[", field);
        let before = self.errors.len();
        self.errors
            .retain(|key, _| key != field && !key.starts_with(&prefix));
        before != self.errors.len()
    }

    /// Drop exactly one key.
    pub fn remove(&mut self, key: &str) -> bool {
        self.errors.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub errors: ValidationErrors,
}

/// Validate the fields of one step against the current form.
pub fn validate_step(step: &StepSpec, form: &FormState) -> Validation {
    validate_step_at(step, form, chrono::Local::now().date_naive())
}

pub fn validate_step_at(step: &StepSpec, form: &FormState, today: NaiveDate) -> Validation {
    let mut errors = ValidationErrors::new();
    let missing = FieldValue::Text(String::new());

    for field in &step.fields {
        let value = form.get(field.name).unwrap_or(&missing);
        for rule in &field.rules {
            let found = rule.check(field, value, today);
            if !found.is_empty() {
                for (key, message) in found {
                    errors.insert(key, message);
                }
                break;
            }
        }
    }

    for rule in &step.cross_rules {
        for (key, message) in (rule.check)(form) {
            errors.insert(key, message);
        }
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::wizard::definition::{ColumnSpec, InputKind};
    use crate::shared::wizard::form_state::FileRef;

    fn tax_step() -> StepSpec {
        StepSpec::new("Taxes").field(
            FieldSpec::new(
                "taxes",
                "Taxes",
                InputKind::List {
                    columns: vec![ColumnSpec::text("type", "Type"), ColumnSpec::number("rate", "Rate %")],
                    add_label: "Add tax",
                },
            )
            .rule(Rule::AtLeastOneEntry {
                text: "type",
                positive: "rate",
                message: "Add at least one tax with a type and a rate above zero",
            })
            .rule(Rule::CompleteEntries { columns: &["type", "rate"] }),
        )
    }

    fn file(name: &str) -> FileRef {
        FileRef {
            name: name.to_string(),
            content_type: "image/jpeg".to_string(),
            size_bytes: 1024,
        }
    }

    #[test]
    fn test_optional_empty_fields_pass() {
        let step = StepSpec::new("Contact")
            .field(FieldSpec::new("email", "Email", InputKind::Email).rule(Rule::Email))
            .field(FieldSpec::new("weight", "Weight", InputKind::Number).rule(Rule::Positive));
        let form = FormState::new([
            ("email", FieldValue::text("  ")),
            ("weight", FieldValue::Number(None)),
        ]);
        assert!(validate_step(&step, &form).valid);
    }

    #[test]
    fn test_required_number_rejects_empty_and_positive_rejects_zero() {
        let step = StepSpec::new("Load").field(
            FieldSpec::new("tonnage", "Tonnage", InputKind::Number)
                .required()
                .rule(Rule::Positive),
        );

        let empty = FormState::new([("tonnage", FieldValue::Number(None))]);
        let result = validate_step(&step, &empty);
        assert_eq!(result.errors.get("tonnage"), Some("Tonnage is required"));

        let zero = FormState::new([("tonnage", FieldValue::number(0.0))]);
        let result = validate_step(&step, &zero);
        assert_eq!(result.errors.get("tonnage"), Some("Tonnage must be greater than zero"));

        let ok = FormState::new([("tonnage", FieldValue::number(3.5))]);
        assert!(validate_step(&step, &ok).valid);
    }

    #[test]
    fn test_email_pattern() {
        let step = StepSpec::new("Contact")
            .field(FieldSpec::new("email", "Email", InputKind::Email).required().rule(Rule::Email));
        let bad = FormState::new([("email", FieldValue::text("ops@mine"))]);
        assert_eq!(
            validate_step(&step, &bad).errors.get("email"),
            Some("Enter a valid email address")
        );
        let good = FormState::new([("email", FieldValue::text("ops@globe-mining.co.zw"))]);
        assert!(validate_step(&step, &good).valid);
    }

    #[test]
    fn test_exactly_one_photo() {
        let step = StepSpec::new("Findings").field(
            FieldSpec::new("photo", "Photo", InputKind::File { accept: "image/*", multiple: true })
                .required()
                .rule(Rule::SingleFile),
        );
        let none = FormState::new([("photo", FieldValue::Files(vec![]))]);
        assert_eq!(validate_step(&step, &none).errors.get("photo"), Some("Attach photo"));

        let two = FormState::new([("photo", FieldValue::Files(vec![file("a.jpg"), file("b.jpg")]))]);
        assert!(!validate_step(&step, &two).valid);

        let one = FormState::new([("photo", FieldValue::Files(vec![file("a.jpg")]))]);
        assert!(validate_step(&step, &one).valid);
    }

    #[test]
    fn test_tax_list_scenario() {
        let step = tax_step();
        let blank_row = crate::shared::wizard::definition::blank_entry(step.fields[0].columns());
        let mut form = FormState::new([("taxes", FieldValue::List(vec![blank_row.clone()]))]);

        let result = validate_step(&step, &form);
        assert!(!result.valid);
        assert_eq!(
            result.errors.get("taxes"),
            Some("Add at least one tax with a type and a rate above zero")
        );

        form.append_entry("taxes", blank_row).unwrap();
        form.set_entry_field("taxes", 1, "type", FieldValue::text("VAT")).unwrap();
        form.set_entry_field("taxes", 1, "rate", FieldValue::number(15.0)).unwrap();
        assert!(validate_step(&step, &form).valid);
    }

    #[test]
    fn test_empty_tax_list_fails() {
        let form = FormState::new([("taxes", FieldValue::List(vec![]))]);
        assert!(!validate_step(&tax_step(), &form).valid);
    }

    #[test]
    fn test_incomplete_entry_reports_cell() {
        let step = tax_step();
        let columns = step.fields[0].columns();
        let mut good = crate::shared::wizard::definition::blank_entry(columns);
        good.insert("type".into(), FieldValue::text("Royalty"));
        good.insert("rate".into(), FieldValue::number(5.0));
        let mut partial = crate::shared::wizard::definition::blank_entry(columns);
        partial.insert("type".into(), FieldValue::text("VAT"));

        let form = FormState::new([("taxes", FieldValue::List(vec![good, partial]))]);
        let result = validate_step(&step, &form);
        assert_eq!(result.errors.get("taxes[1].rate"), Some("Rate % is required"));
        assert!(!result.errors.contains("taxes"));
    }

    #[test]
    fn test_cross_rule_and_first_error_wins() {
        fn account_for_transfers(form: &FormState) -> Vec<(String, String)> {
            if form.text("method") == "bank_transfer" && form.text("account").trim().is_empty() {
                vec![("account".into(), "Account number is required for transfers".into())]
            } else {
                Vec::new()
            }
        }
        let step = StepSpec::new("Payment")
            .field(FieldSpec::new("method", "Method", InputKind::Text).required())
            .field(FieldSpec::new("account", "Account", InputKind::Text).rule(Rule::MinLength(6)))
            .cross_rule(CrossRule::new("account_for_transfers", account_for_transfers));

        let form = FormState::new([
            ("method", FieldValue::text("bank_transfer")),
            ("account", FieldValue::text("")),
        ]);
        let result = validate_step(&step, &form);
        assert_eq!(
            result.errors.get("account"),
            Some("Account number is required for transfers")
        );

        let form = FormState::new([
            ("method", FieldValue::text("cash")),
            ("account", FieldValue::text("")),
        ]);
        assert!(validate_step(&step, &form).valid);
    }

    #[test]
    fn test_not_in_future_uses_reference_date() {
        let step = StepSpec::new("Source").field(
            FieldSpec::new("intake_date", "Intake date", InputKind::Date)
                .required()
                .rule(Rule::NotInFuture),
        );
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let on = |d: NaiveDate| FormState::new([("intake_date", FieldValue::date(d))]);

        assert!(validate_step_at(&step, &on(today), today).valid);
        let result = validate_step_at(&step, &on(today.succ_opt().unwrap()), today);
        assert_eq!(
            result.errors.get("intake_date"),
            Some("Intake date cannot be in the future")
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let step = tax_step();
        let form = FormState::new([("taxes", FieldValue::List(vec![]))]);
        assert_eq!(validate_step(&step, &form), validate_step(&step, &form));
    }

    #[test]
    fn test_clear_field_drops_cells() {
        let mut errors = ValidationErrors::new();
        errors.insert("taxes", "x");
        errors.insert("taxes[0].rate", "y");
        errors.insert("tax_number", "z");
        assert!(errors.clear_field("taxes"));
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("tax_number"));
        assert!(!errors.clear_field("taxes"));
    }
}
