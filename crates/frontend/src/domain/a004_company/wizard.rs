use crate::shared::wizard::definition::{FieldSpec, InputKind, OptionSource, StepSpec, WizardDefinition};
use crate::shared::wizard::form_state::FormState;
use crate::shared::wizard::gateway::MappingError;
use crate::shared::wizard::payload::{file_meta, optional_text, required_text};
use crate::shared::wizard::validation::Rule;
use contracts::domain::a004_company::{CompanyRegistrationDto, RESOURCE};
use once_cell::sync::Lazy;
use serde_json::Value;

const COMPANY_TYPES: &[(&str, &str)] = &[
    ("private_limited", "Private limited company"),
    ("partnership", "Partnership"),
    ("sole_trader", "Sole trader"),
    ("cooperative", "Co-operative"),
    ("syndicate", "Small-scale syndicate"),
];

pub static COMPANY_WIZARD: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    key: "company_registration",
    title: "Register company",
    resource: RESOURCE,
    entry_steps: vec![
        StepSpec::new("Company")
            .field(
                FieldSpec::new("name", "Company name", InputKind::Text)
                    .required()
                    .rule(Rule::MinLength(2)),
            )
            .field(
                FieldSpec::new("registration_number", "Registration number", InputKind::Text)
                    .required(),
            )
            .field(
                FieldSpec::new(
                    "company_type",
                    "Company type",
                    InputKind::Select(OptionSource::Static(COMPANY_TYPES)),
                )
                .required(),
            )
            .field(FieldSpec::new("tax_number", "Tax number", InputKind::Text)),
        StepSpec::new("Contact")
            .field(
                FieldSpec::new("email", "Email", InputKind::Email)
                    .required()
                    .rule(Rule::Email),
            )
            .field(
                FieldSpec::new("phone", "Phone", InputKind::Phone)
                    .required()
                    .rule(Rule::Phone)
                    .placeholder("+263 77 123 4567"),
            )
            .field(
                FieldSpec::new("physical_address", "Physical address", InputKind::TextArea)
                    .required(),
            ),
        StepSpec::new("Documents")
            .describe("Certificate of incorporation, PDF or image")
            .field(
                FieldSpec::new(
                    "certificate",
                    "Certificate",
                    InputKind::File {
                        accept: ".pdf,.png,.jpg,.jpeg",
                        multiple: false,
                    },
                )
                .required()
                .rule(Rule::SingleFile),
            ),
    ],
    review: StepSpec::new("Review").field(
        FieldSpec::new(
            "declaration",
            "The information given is true and complete",
            InputKind::Checkbox,
        )
        .required(),
    ),
    confirmation: "The registration has been submitted. The company will appear once approved.",
    mapper: map_company,
});

fn map_company(form: &FormState) -> Result<Value, MappingError> {
    let dto = CompanyRegistrationDto {
        name: required_text(form, "name")?,
        registration_number: required_text(form, "registration_number")?,
        company_type: required_text(form, "company_type")?,
        tax_number: optional_text(form, "tax_number"),
        email: required_text(form, "email")?,
        phone: required_text(form, "phone")?,
        physical_address: required_text(form, "physical_address")?,
        certificate: file_meta(form, "certificate")?,
    };
    Ok(serde_json::to_value(dto)?)
}
