use crate::shared::wizard::definition::{
    ColumnSpec, FieldSpec, InputKind, OptionSource, StepSpec, WizardDefinition,
};
use crate::shared::wizard::form_state::{entry_path, FormState};
use crate::shared::wizard::gateway::MappingError;
use crate::shared::wizard::payload::{
    entry_text, filled_entries, required_count, required_date, required_text,
};
use crate::shared::wizard::validation::{CrossRule, Rule};
use contracts::domain::a005_security_company::{SecurityCompanyDto, RESOURCE};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;

/// At least one shaft, none listed twice.
fn assigned_shafts_rule(form: &FormState) -> Vec<(String, String)> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut any = false;
    for (index, entry) in form.list("assigned_shafts").iter().enumerate() {
        let shaft = entry_text(entry, "shaft_id");
        if shaft.is_empty() {
            continue;
        }
        any = true;
        if !seen.insert(shaft) {
            errors.push((
                entry_path("assigned_shafts", index, "shaft_id"),
                "Shaft is already assigned".to_string(),
            ));
        }
    }
    if !any {
        errors.push((
            "assigned_shafts".to_string(),
            "Assign the company to at least one shaft".to_string(),
        ));
    }
    errors
}

pub static SECURITY_COMPANY_WIZARD: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    key: "security_company",
    title: "Onboard security company",
    resource: RESOURCE,
    entry_steps: vec![
        StepSpec::new("Company")
            .field(FieldSpec::new("name", "Company name", InputKind::Text).required())
            .field(
                FieldSpec::new("license_number", "Licence number", InputKind::Text).required(),
            )
            .field(
                FieldSpec::new("license_expiry", "Licence expiry", InputKind::Date)
                    .required()
                    .rule(Rule::NotInPast),
            ),
        StepSpec::new("Contact")
            .field(
                FieldSpec::new("contact_person", "Contact person", InputKind::Text).required(),
            )
            .field(
                FieldSpec::new("email", "Email", InputKind::Email)
                    .required()
                    .rule(Rule::Email),
            )
            .field(
                FieldSpec::new("phone", "Phone", InputKind::Phone)
                    .required()
                    .rule(Rule::Phone),
            ),
        StepSpec::new("Deployment")
            .field(
                FieldSpec::new("guards_count", "Number of guards", InputKind::Number)
                    .required()
                    .rule(Rule::Positive)
                    .rule(Rule::Integer),
            )
            .field(FieldSpec::new(
                "assigned_shafts",
                "Assigned shafts",
                InputKind::List {
                    columns: vec![ColumnSpec::select(
                        "shaft_id",
                        "Shaft",
                        OptionSource::Remote("shafts"),
                    )],
                    add_label: "Add shaft",
                },
            ))
            .cross_rule(CrossRule::new("assigned_shafts", assigned_shafts_rule)),
    ],
    review: StepSpec::new("Review"),
    confirmation: "The security company has been onboarded.",
    mapper: map_security_company,
});

fn map_security_company(form: &FormState) -> Result<Value, MappingError> {
    let dto = SecurityCompanyDto {
        name: required_text(form, "name")?,
        license_number: required_text(form, "license_number")?,
        license_expiry: required_date(form, "license_expiry")?,
        contact_person: required_text(form, "contact_person")?,
        email: required_text(form, "email")?,
        phone: required_text(form, "phone")?,
        guards_count: required_count(form, "guards_count")?,
        assigned_shafts: filled_entries(form, "assigned_shafts")
            .map(|entry| entry_text(entry, "shaft_id"))
            .collect(),
    };
    Ok(serde_json::to_value(dto)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::wizard::form_state::FieldValue;
    use crate::shared::wizard::validation::validate_step_at;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn deployment(guards: f64, shafts: &[&str]) -> FormState {
        let mut form = SECURITY_COMPANY_WIZARD.initial_state();
        form.set_field("guards_count", FieldValue::number(guards)).unwrap();
        for (i, shaft) in shafts.iter().enumerate() {
            if i > 0 {
                let row = SECURITY_COMPANY_WIZARD.blank_entry("assigned_shafts").unwrap();
                form.append_entry("assigned_shafts", row).unwrap();
            }
            form.set_entry_field("assigned_shafts", i, "shaft_id", FieldValue::text(*shaft))
                .unwrap();
        }
        form
    }

    #[test]
    fn test_expired_license_is_rejected() {
        let mut form = SECURITY_COMPANY_WIZARD.initial_state();
        form.set_field("name", FieldValue::text("Safeguard")).unwrap();
        form.set_field("license_number", FieldValue::text("PSL-221")).unwrap();
        form.set_field(
            "license_expiry",
            FieldValue::date(NaiveDate::from_ymd_opt(2024, 8, 31).unwrap()),
        )
        .unwrap();
        let result = validate_step_at(&SECURITY_COMPANY_WIZARD.entry_steps[0], &form, today());
        assert_eq!(
            result.errors.get("license_expiry"),
            Some("Licence expiry cannot be in the past")
        );
    }

    #[test]
    fn test_guards_must_be_whole() {
        let step = &SECURITY_COMPANY_WIZARD.entry_steps[2];
        let result = validate_step_at(step, &deployment(12.5, &["sh-1"]), today());
        assert_eq!(
            result.errors.get("guards_count"),
            Some("Number of guards must be a whole number")
        );
    }

    #[test]
    fn test_shafts_required_and_unique() {
        let step = &SECURITY_COMPANY_WIZARD.entry_steps[2];
        let result = validate_step_at(step, &deployment(4.0, &[]), today());
        assert!(result.errors.contains("assigned_shafts"));

        let result = validate_step_at(step, &deployment(4.0, &["sh-1", "sh-1"]), today());
        assert_eq!(
            result.errors.get("assigned_shafts[1].shaft_id"),
            Some("Shaft is already assigned")
        );

        assert!(validate_step_at(step, &deployment(4.0, &["sh-1", "sh-2"]), today()).valid);
    }

    #[test]
    fn test_mapper_collects_shaft_ids() {
        let mut form = deployment(6.0, &["sh-1", "sh-3"]);
        for (name, value) in [
            ("name", "Safeguard"),
            ("license_number", "PSL-221"),
            ("contact_person", "M. Sibanda"),
            ("email", "ops@safeguard.co.zw"),
            ("phone", "+263 71 555 0101"),
        ] {
            form.set_field(name, FieldValue::text(value)).unwrap();
        }
        form.set_field("license_expiry", FieldValue::date(today())).unwrap();

        let payload = map_security_company(&form).unwrap();
        assert_eq!(payload["guardsCount"], 6);
        assert_eq!(payload["assignedShafts"], serde_json::json!(["sh-1", "sh-3"]));
    }
}
