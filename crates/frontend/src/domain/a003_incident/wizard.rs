//! Incident report: what happened, who was involved, penalty.

use crate::shared::wizard::definition::{
    ColumnSpec, FieldSpec, InputKind, OptionSource, StepSpec, WizardDefinition,
};
use crate::shared::wizard::form_state::FormState;
use crate::shared::wizard::gateway::MappingError;
use crate::shared::wizard::payload::{
    entry_text, filled_entries, optional_number, optional_text, required_choice, required_date,
    required_text,
};
use crate::shared::wizard::validation::{CrossRule, Rule};
use contracts::domain::a003_incident::{IncidentDto, IncidentType, PersonInvolvedDto, RESOURCE};
use once_cell::sync::Lazy;
use serde_json::Value;

const INCIDENT_TYPES: &[(&str, &str)] = &[
    ("accident", "Accident"),
    ("contravention", "Contravention"),
    ("theft", "Theft"),
    ("environmental_breach", "Environmental breach"),
];

const PERSON_ROLES: &[(&str, &str)] = &[
    ("employee", "Employee"),
    ("contractor", "Contractor"),
    ("visitor", "Visitor"),
    ("suspect", "Suspect"),
    ("witness", "Witness"),
];

/// Contraventions and environmental breaches carry a code and a penalty.
fn penalty_rule(form: &FormState) -> Vec<(String, String)> {
    let penalisable = IncidentType::from_code(form.text("incident_type"))
        .map_or(false, |t| t.is_penalisable());
    if !penalisable {
        return Vec::new();
    }
    let mut errors = Vec::new();
    if form.text("contravention_code").trim().is_empty() {
        errors.push((
            "contravention_code".to_string(),
            "Contravention code is required for this incident type".to_string(),
        ));
    }
    if form.number("penalty_amount").map_or(true, |n| n <= 0.0) {
        errors.push((
            "penalty_amount".to_string(),
            "Enter the penalty imposed".to_string(),
        ));
    }
    errors
}

pub static INCIDENT_WIZARD: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    key: "incident",
    title: "Report incident",
    resource: RESOURCE,
    entry_steps: vec![
        StepSpec::new("Incident")
            .field(
                FieldSpec::new(
                    "incident_type",
                    "Incident type",
                    InputKind::Select(OptionSource::Static(INCIDENT_TYPES)),
                )
                .required(),
            )
            .field(
                FieldSpec::new("incident_date", "Date of incident", InputKind::Date)
                    .required()
                    .rule(Rule::NotInFuture),
            )
            .field(FieldSpec::new(
                "shaft_id",
                "Shaft",
                InputKind::Select(OptionSource::Remote("shafts")),
            ))
            .field(FieldSpec::new(
                "section_id",
                "Section",
                InputKind::Select(OptionSource::Remote("sections")),
            ))
            .field(
                FieldSpec::new("description", "Description", InputKind::TextArea)
                    .required()
                    .rule(Rule::MinLength(10))
                    .placeholder("What happened, where and when"),
            ),
        StepSpec::new("Persons involved")
            .describe("Leave the list empty if nobody was involved")
            .field(
                FieldSpec::new(
                    "persons",
                    "Persons",
                    InputKind::List {
                        columns: vec![
                            ColumnSpec::text("full_name", "Full name"),
                            ColumnSpec::select("role", "Role", OptionSource::Static(PERSON_ROLES)),
                            ColumnSpec::text("id_number", "ID number"),
                        ],
                        add_label: "Add person",
                    },
                )
                .rule(Rule::CompleteEntries { columns: &["full_name", "role"] }),
            ),
        StepSpec::new("Penalty")
            .field(FieldSpec::new("contravention_code", "Contravention code", InputKind::Text))
            .field(
                FieldSpec::new("penalty_amount", "Penalty amount", InputKind::Number)
                    .rule(Rule::NonNegative),
            )
            .cross_rule(CrossRule::new("penalty", penalty_rule)),
    ],
    review: StepSpec::new("Review"),
    confirmation: "The incident has been logged.",
    mapper: map_incident,
});

fn map_incident(form: &FormState) -> Result<Value, MappingError> {
    let incident_type = required_choice(form, "incident_type", IncidentType::from_code)?;
    let persons = filled_entries(form, "persons")
        .map(|entry| {
            let id_number = entry_text(entry, "id_number");
            PersonInvolvedDto {
                full_name: entry_text(entry, "full_name"),
                role: entry_text(entry, "role"),
                id_number: (!id_number.is_empty()).then_some(id_number),
            }
        })
        .collect();
    let (contravention_code, penalty_amount) = if incident_type.is_penalisable() {
        (
            optional_text(form, "contravention_code"),
            optional_number(form, "penalty_amount"),
        )
    } else {
        (None, None)
    };
    let dto = IncidentDto {
        incident_type,
        incident_date: required_date(form, "incident_date")?,
        shaft_id: optional_text(form, "shaft_id"),
        section_id: optional_text(form, "section_id"),
        description: required_text(form, "description")?,
        persons,
        contravention_code,
        penalty_amount,
    };
    Ok(serde_json::to_value(dto)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::wizard::form_state::FieldValue;
    use crate::shared::wizard::validation::validate_step_at;
    use chrono::NaiveDate;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 20).unwrap()
    }

    fn base(kind: &str) -> FormState {
        let mut form = INCIDENT_WIZARD.initial_state();
        form.set_field("incident_type", FieldValue::text(kind)).unwrap();
        form.set_field("incident_date", FieldValue::date(today())).unwrap();
        form.set_field("description", FieldValue::text("Rock fall at level 3 stope")).unwrap();
        form
    }

    #[test]
    fn test_persons_list_may_stay_blank() {
        let form = base("accident");
        let result = validate_step_at(&INCIDENT_WIZARD.entry_steps[1], &form, today());
        assert!(result.valid);
    }

    #[test]
    fn test_partial_person_row_is_flagged() {
        let mut form = base("accident");
        form.set_entry_field("persons", 0, "full_name", FieldValue::text("J. Dube")).unwrap();
        let result = validate_step_at(&INCIDENT_WIZARD.entry_steps[1], &form, today());
        assert_eq!(result.errors.get("persons[0].role"), Some("Role is required"));
    }

    #[test]
    fn test_contravention_needs_penalty() {
        let form = base("contravention");
        let result = validate_step_at(&INCIDENT_WIZARD.entry_steps[2], &form, today());
        assert!(result.errors.contains("contravention_code"));
        assert!(result.errors.contains("penalty_amount"));

        let result = validate_step_at(&INCIDENT_WIZARD.entry_steps[2], &base("theft"), today());
        assert!(result.valid);
    }

    #[test]
    fn test_mapper_skips_blank_persons_and_penalty_for_accidents() {
        let mut form = base("accident");
        form.set_entry_field("persons", 0, "full_name", FieldValue::text("J. Dube")).unwrap();
        form.set_entry_field("persons", 0, "role", FieldValue::text("employee")).unwrap();
        form.append_entry("persons", INCIDENT_WIZARD.blank_entry("persons").unwrap()).unwrap();
        form.set_field("penalty_amount", FieldValue::number(100.0)).unwrap();

        let payload = map_incident(&form).unwrap();
        assert_eq!(payload["persons"], json!([{"fullName": "J. Dube", "role": "employee"}]));
        assert!(payload.get("penaltyAmount").is_none());
        assert_eq!(payload["incidentType"], "accident");
    }
}
