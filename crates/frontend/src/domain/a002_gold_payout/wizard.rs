use crate::shared::wizard::definition::{
    ColumnSpec, FieldSpec, InputKind, OptionSource, StepSpec, WizardDefinition,
};
use crate::shared::wizard::form_state::FormState;
use crate::shared::wizard::gateway::MappingError;
use crate::shared::wizard::payload::{
    required_choice, required_date, required_number, required_text, tax_entries,
};
use crate::shared::wizard::validation::{CrossRule, Rule};
use contracts::domain::a002_gold_payout::{GoldPayoutDto, PaymentMethod, RESOURCE};
use once_cell::sync::Lazy;
use serde_json::Value;

const PAYMENT_METHODS: &[(&str, &str)] = &[
    ("cash", "Cash"),
    ("bank_transfer", "Bank transfer"),
    ("mobile_money", "Mobile money"),
];

/// Bank name and account number are required for bank transfers.
fn bank_details_rule(form: &FormState) -> Vec<(String, String)> {
    let needs_bank = PaymentMethod::from_code(form.text("payment_method"))
        .map_or(false, |m| m.needs_bank_details());
    if !needs_bank {
        return Vec::new();
    }
    let mut errors = Vec::new();
    if form.text("bank_name").trim().is_empty() {
        errors.push((
            "bank_name".to_string(),
            "Bank is required for bank transfers".to_string(),
        ));
    }
    if form.text("account_number").trim().is_empty() {
        errors.push((
            "account_number".to_string(),
            "Account number is required for bank transfers".to_string(),
        ));
    }
    errors
}

pub static GOLD_PAYOUT_WIZARD: Lazy<WizardDefinition> = Lazy::new(|| WizardDefinition {
    key: "gold_payout",
    title: "New gold payout",
    resource: RESOURCE,
    entry_steps: vec![
        StepSpec::new("Sale")
            .field(
                FieldSpec::new(
                    "company_id",
                    "Seller",
                    InputKind::Select(OptionSource::Remote("companies")),
                )
                .required(),
            )
            .field(
                FieldSpec::new("sale_date", "Sale date", InputKind::Date)
                    .required()
                    .rule(Rule::NotInFuture),
            )
            .field(
                FieldSpec::new("gold_weight_g", "Gold weight (g)", InputKind::Number)
                    .required()
                    .rule(Rule::Positive),
            )
            .field(
                FieldSpec::new("purity_percent", "Purity (%)", InputKind::Number)
                    .required()
                    .rule(Rule::Positive)
                    .rule(Rule::Range { min: 0.0, max: 100.0 }),
            )
            .field(
                FieldSpec::new("price_per_gram", "Price per gram", InputKind::Number)
                    .required()
                    .rule(Rule::Positive),
            ),
        StepSpec::new("Taxes")
            .describe("Royalties and levies withheld from the payout")
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
        StepSpec::new("Payment")
            .field(
                FieldSpec::new(
                    "payment_method",
                    "Payment method",
                    InputKind::Select(OptionSource::Static(PAYMENT_METHODS)),
                )
                .required(),
            )
            .field(
                FieldSpec::new("recipient_name", "Recipient", InputKind::Text)
                    .required()
                    .rule(Rule::MinLength(2)),
            )
            .field(FieldSpec::new("bank_name", "Bank", InputKind::Text))
            .field(FieldSpec::new("account_number", "Account number", InputKind::Text))
            .cross_rule(CrossRule::new("bank_details", bank_details_rule)),
    ],
    review: StepSpec::new("Review")
        .describe("Amounts are calculated by the back office after submission"),
    confirmation: "The payout has been submitted for processing.",
    mapper: map_gold_payout,
});

fn map_gold_payout(form: &FormState) -> Result<Value, MappingError> {
    let payment_method = required_choice(form, "payment_method", PaymentMethod::from_code)?;
    // Bank fields typed before switching away from a transfer are not sent.
    let (bank_name, account_number) = if payment_method.needs_bank_details() {
        (
            Some(required_text(form, "bank_name")?),
            Some(required_text(form, "account_number")?),
        )
    } else {
        (None, None)
    };
    let dto = GoldPayoutDto {
        company_id: required_text(form, "company_id")?,
        sale_date: required_date(form, "sale_date")?,
        gold_weight_g: required_number(form, "gold_weight_g")?,
        purity_percent: required_number(form, "purity_percent")?,
        price_per_gram: required_number(form, "price_per_gram")?,
        taxes: tax_entries(form, "taxes")?,
        payment_method,
        recipient_name: required_text(form, "recipient_name")?,
        bank_name,
        account_number,
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
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn filled(method: &str) -> FormState {
        let mut form = GOLD_PAYOUT_WIZARD.initial_state();
        form.set_field("company_id", FieldValue::text("c-9")).unwrap();
        form.set_field("sale_date", FieldValue::date(today())).unwrap();
        form.set_field("gold_weight_g", FieldValue::number(125.4)).unwrap();
        form.set_field("purity_percent", FieldValue::number(91.5)).unwrap();
        form.set_field("price_per_gram", FieldValue::number(58.0)).unwrap();
        form.set_entry_field("taxes", 0, "type", FieldValue::text("royalty")).unwrap();
        form.set_entry_field("taxes", 0, "rate", FieldValue::number(5.0)).unwrap();
        form.set_field("payment_method", FieldValue::text(method)).unwrap();
        form.set_field("recipient_name", FieldValue::text("R. Ncube")).unwrap();
        form
    }

    #[test]
    fn test_purity_above_hundred_is_rejected() {
        let mut form = filled("cash");
        form.set_field("purity_percent", FieldValue::number(101.0)).unwrap();
        let result = validate_step_at(&GOLD_PAYOUT_WIZARD.entry_steps[0], &form, today());
        assert_eq!(
            result.errors.get("purity_percent"),
            Some("Purity (%) must be between 0 and 100")
        );
    }

    #[test]
    fn test_bank_transfer_requires_bank_details() {
        let payment = &GOLD_PAYOUT_WIZARD.entry_steps[2];
        let result = validate_step_at(payment, &filled("bank_transfer"), today());
        assert!(result.errors.contains("bank_name"));
        assert!(result.errors.contains("account_number"));

        let result = validate_step_at(payment, &filled("mobile_money"), today());
        assert!(result.valid);
    }

    #[test]
    fn test_cash_payout_drops_bank_fields() {
        let mut form = filled("cash");
        form.set_field("bank_name", FieldValue::text("CBZ")).unwrap();
        let payload = map_gold_payout(&form).unwrap();
        assert_eq!(payload["paymentMethod"], "cash");
        assert!(payload.get("bankName").is_none());
        assert_eq!(payload["saleDate"], "2024-07-01");
    }

    #[test]
    fn test_unknown_payment_method_fails_mapping() {
        let err = map_gold_payout(&filled("cheque")).unwrap_err();
        assert!(matches!(err, MappingError::InvalidOption { .. }));
    }
}
