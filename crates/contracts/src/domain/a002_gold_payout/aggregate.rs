use crate::domain::common::TaxEntryDto;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    MobileMoney,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::MobileMoney => "mobile_money",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::BankTransfer => "Bank transfer",
            Self::MobileMoney => "Mobile money",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "cash" => Some(Self::Cash),
            "bank_transfer" => Some(Self::BankTransfer),
            "mobile_money" => Some(Self::MobileMoney),
            _ => None,
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Cash, Self::BankTransfer, Self::MobileMoney]
    }

    /// Bank details are collected only for transfers.
    pub fn needs_bank_details(&self) -> bool {
        matches!(self, Self::BankTransfer)
    }
}

/// Gold payout as listed by the API. Amounts are computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldPayout {
    pub id: String,
    pub reference: String,
    pub company_name: String,
    pub sale_date: String,
    pub gold_weight_g: f64,
    pub purity_percent: f64,
    #[serde(default)]
    pub gross_amount: Option<f64>,
    #[serde(default)]
    pub net_amount: Option<f64>,
    pub payment_method: PaymentMethod,
    pub status: String,
    pub created_at: String,
}

/// Payload of the payout wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldPayoutDto {
    pub company_id: String,
    pub sale_date: NaiveDate,
    pub gold_weight_g: f64,
    pub purity_percent: f64,
    pub price_per_gram: f64,
    pub taxes: Vec<TaxEntryDto>,
    pub payment_method: PaymentMethod,
    pub recipient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_codes_match_serde() {
        for method in PaymentMethod::all() {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, method.code());
            assert_eq!(PaymentMethod::from_code(method.code()), Some(method));
        }
        assert_eq!(PaymentMethod::from_code("cheque"), None);
    }
}
