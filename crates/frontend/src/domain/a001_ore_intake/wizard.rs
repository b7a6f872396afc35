//! Ore intake wizard: source, load, taxes, review.

use crate::shared::wizard::definition::{
    ColumnSpec, FieldSpec, InputKind, OptionSource, StepSpec, WizardDefinition,
};
use crate::shared::wizard::form_state::FormState;
use crate::shared::wizard::gateway::MappingError;
use crate::shared::wizard::payload::{
    optional_text, required_date, required_number, required_text, tax_entries,
};
use crate::shared::wizard::validation::Rule;
use contracts::domain::a001_ore_intake::{OreIntakeDto, RESOURCE};
use once_cell::sync::Lazy;
use serde_json::Value;

pub static ORE_INTAKE_WIZARD: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    key: "ore_intake",
    title: "New ore intake",
    resource: RESOURCE,
    entry_steps: vec![
        StepSpec::new("Source")
            .describe("Where the ore comes from")
            .field(
                FieldSpec::new(
                    "company_id",
                    "Company",
                    InputKind::Select(OptionSource::Remote("companies")),
                )
                .required(),
            )
            .field(
                FieldSpec::new("shaft_id", "Shaft", InputKind::Select(OptionSource::Remote("shafts")))
                    .required(),
            )
            .field(
                FieldSpec::new("intake_date", "Intake date", InputKind::Date)
                    .required()
                    .rule(Rule::NotInFuture),
            ),
        StepSpec::new("Load")
            .field(
                FieldSpec::new(
                    "ore_type",
                    "Ore type",
                    InputKind::Select(OptionSource::Remote("ore-types")),
                )
                .required(),
            )
            .field(
                FieldSpec::new("tonnage", "Tonnage (t)", InputKind::Number)
                    .required()
                    .rule(Rule::Positive),
            )
            .field(
                FieldSpec::new("vehicle_reg", "Vehicle registration", InputKind::Text)
                    .required()
                    .placeholder("e.g. ABC 1234"),
            )
            .field(FieldSpec::new("driver_name", "Driver", InputKind::Text)),
        StepSpec::new("Taxes")
            .describe("Levies applied to this load")
            .field(
                FieldSpec::new(
                    "taxes",
                    "Tax entries",
                    InputKind::List {
                        columns: vec![
                            ColumnSpec::select("type", "Tax type", OptionSource::Remote("tax-types")),
                            ColumnSpec::number("rate", "Rate (%)"),
                        ],
                        add_label: "Add tax",
                    },
                )
                .rule(Rule::AtLeastOneEntry {
                    text: "type",
                    positive: "rate",
                    message: "Add at least one tax entry with a type and a rate above zero",
                })
                .rule(Rule::CompleteEntries { columns: &["type", "rate"] }),
            ),
    ],
    review: StepSpec::new("Review")
        .field(FieldSpec::new("notes", "Notes", InputKind::TextArea))
        .field(
            FieldSpec::new(
                "declaration",
                "I confirm the load details are correct",
                InputKind::Checkbox,
            )
            .required(),
        ),
    confirmation: "The ore intake has been recorded. A sample will be taken for assay.",
    mapper: map_ore_intake,
});

fn map_ore_intake(form: &FormState) -> Result<Value, MappingError> {
    let dto = OreIntakeDto {
        company_id: required_text(form, "company_id")?,
        shaft_id: required_text(form, "shaft_id")?,
        intake_date: required_date(form, "intake_date")?,
        ore_type: required_text(form, "ore_type")?,
        tonnage: required_number(form, "tonnage")?,
        vehicle_reg: required_text(form, "vehicle_reg")?,
        driver_name: optional_text(form, "driver_name"),
        taxes: tax_entries(form, "taxes")?,
        notes: optional_text(form, "notes"),
    };
    Ok(serde_json::to_value(dto)?)
}
