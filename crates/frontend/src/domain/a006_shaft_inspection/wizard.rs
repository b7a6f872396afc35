//! Shaft inspection: which shaft, what was found, recommended status.

use crate::shared::wizard::definition::{FieldSpec, InputKind, OptionSource, StepSpec, WizardDefinition};
use crate::shared::wizard::form_state::FormState;
use crate::shared::wizard::gateway::MappingError;
use crate::shared::wizard::payload::{
    file_meta, optional_text, required_choice, required_date, required_text,
};
use crate::shared::wizard::validation::{CrossRule, Rule};
use contracts::domain::a006_shaft_inspection::{
    ShaftCondition, ShaftInspectionDto, ShaftStatus, RESOURCE,
};
use once_cell::sync::Lazy;
use serde_json::Value;

const CONDITIONS: &[(&str, &str)] = &[
    ("good", "Good"),
    ("fair", "Fair"),
    ("poor", "Poor"),
    ("critical", "Critical"),
];

const STATUSES: &[(&str, &str)] = &[
    ("active", "Active"),
    ("suspended", "Suspended"),
    ("closed", "Closed"),
];

/// Suspending or closing a shaft needs a reason.
fn status_reason_rule(form: &FormState) -> Vec<(String, String)> {
    let status = ShaftStatus::from_code(form.text("recommended_status"));
    let needs_reason = matches!(status, Some(ShaftStatus::Suspended | ShaftStatus::Closed));
    if needs_reason && form.text("status_reason").trim().is_empty() {
        return vec![(
            "status_reason".to_string(),
            "Give a reason for suspending or closing the shaft".to_string(),
        )];
    }
    Vec::new()
}

pub static SHAFT_INSPECTION_WIZARD: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    key: "shaft_inspection",
    title: "New shaft inspection",
    resource: RESOURCE,
    entry_steps: vec![
        StepSpec::new("Shaft")
            .field(
                FieldSpec::new("shaft_id", "Shaft", InputKind::Select(OptionSource::Remote("shafts")))
                    .required(),
            )
            .field(
                FieldSpec::new("inspection_date", "Inspection date", InputKind::Date)
                    .required()
                    .rule(Rule::NotInFuture),
            )
            .field(
                FieldSpec::new("inspector_name", "Inspector", InputKind::Text).required(),
            ),
        StepSpec::new("Findings")
            .field(
                FieldSpec::new(
                    "condition",
                    "Condition",
                    InputKind::Select(OptionSource::Static(CONDITIONS)),
                )
                .required(),
            )
            .field(FieldSpec::new("findings", "Findings", InputKind::TextArea))
            .field(
                FieldSpec::new(
                    "photo",
                    "Photo",
                    InputKind::File {
                        accept: "image/*",
                        multiple: false,
                    },
                )
                .required()
                .rule(Rule::SingleFile),
            ),
        StepSpec::new("Outcome")
            .describe("The back office decides the final shaft status")
            .field(
                FieldSpec::new(
                    "recommended_status",
                    "Recommended status",
                    InputKind::Select(OptionSource::Static(STATUSES)),
                )
                .required(),
            )
            .field(FieldSpec::new("status_reason", "Reason", InputKind::TextArea))
            .cross_rule(CrossRule::new("status_reason", status_reason_rule)),
    ],
    review: StepSpec::new("Review"),
    confirmation: "The inspection report has been filed.",
    mapper: map_inspection,
});

fn map_inspection(form: &FormState) -> Result<Value, MappingError> {
    let recommended_status = required_choice(form, "recommended_status", ShaftStatus::from_code)?;
    let status_reason = match recommended_status {
        ShaftStatus::Active => None,
        _ => optional_text(form, "status_reason"),
    };
    let dto = ShaftInspectionDto {
        shaft_id: required_text(form, "shaft_id")?,
        inspection_date: required_date(form, "inspection_date")?,
        inspector_name: required_text(form, "inspector_name")?,
        condition: required_choice(form, "condition", ShaftCondition::from_code)?,
        findings: optional_text(form, "findings"),
        photo: file_meta(form, "photo")?,
        recommended_status,
        status_reason,
    };
    Ok(serde_json::to_value(dto)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::wizard::form_state::{FieldValue, FileRef};
    use crate::shared::wizard::validation::validate_step;
    use chrono::NaiveDate;

    fn outcome(status: &str, reason: &str) -> FormState {
        let mut form = SHAFT_INSPECTION_WIZARD.initial_state();
        form.set_field("recommended_status", FieldValue::text(status)).unwrap();
        form.set_field("status_reason", FieldValue::text(reason)).unwrap();
        form
    }

    #[test]
    fn test_suspension_requires_reason() {
        let step = &SHAFT_INSPECTION_WIZARD.entry_steps[2];
        assert!(validate_step(step, &outcome("suspended", "")).errors.contains("status_reason"));
        assert!(validate_step(step, &outcome("suspended", "Collar cracked")).valid);
        assert!(validate_step(step, &outcome("active", "")).valid);
    }

    #[test]
    fn test_mapper_drops_reason_for_active_shaft() {
        let mut form = outcome("active", "left over");
        form.set_field("shaft_id", FieldValue::text("sh-2")).unwrap();
        form.set_field(
            "inspection_date",
            FieldValue::date(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()),
        )
        .unwrap();
        form.set_field("inspector_name", FieldValue::text("P. Moyo")).unwrap();
        form.set_field("condition", FieldValue::text("fair")).unwrap();
        form.set_field(
            "photo",
            FieldValue::Files(vec![FileRef {
                name: "collar.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                size_bytes: 1_024,
            }]),
        )
        .unwrap();

        let payload = map_inspection(&form).unwrap();
        assert_eq!(payload["condition"], "fair");
        assert_eq!(payload["recommendedStatus"], "active");
        assert!(payload.get("statusReason").is_none());
        assert_eq!(payload["photo"]["contentType"], "image/jpeg");
    }
}
