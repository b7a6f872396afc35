use crate::domain::common::TaxEntryDto;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Record
// ============================================================================

/// Assay status of the sample taken from an intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SampleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// Ore intake as listed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OreIntake {
    pub id: String,
    pub reference: String,
    pub company_name: String,
    pub shaft_name: String,
    pub intake_date: String,
    pub ore_type: String,
    pub tonnage: f64,
    pub vehicle_reg: String,
    #[serde(default)]
    pub sample_status: SampleStatus,
    #[serde(default)]
    pub assay_grade_gpt: Option<f64>,
    #[serde(default)]
    pub mill_id: Option<String>,
    #[serde(default)]
    pub mill_name: Option<String>,
    #[serde(default)]
    pub taxes: Vec<TaxEntryDto>,
    pub created_at: String,
}

impl OreIntake {
    /// A mill can only be assigned once the sample is approved and no mill is set yet.
    pub fn can_assign_mill(&self) -> bool {
        self.sample_status == SampleStatus::Approved && self.mill_id.is_none()
    }

    pub fn can_decide_sample(&self) -> bool {
        self.sample_status == SampleStatus::Pending
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Payload of the ore intake wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OreIntakeDto {
    pub company_id: String,
    pub shaft_id: String,
    pub intake_date: NaiveDate,
    pub ore_type: String,
    pub tonnage: f64,
    pub vehicle_reg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    pub taxes: Vec<TaxEntryDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `POST /api/ore-intakes/{id}/sample`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDecisionDto {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assay_grade_gpt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// `POST /api/ore-intakes/{id}/mill`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MillAssignmentDto {
    pub mill_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(status: SampleStatus, mill: Option<&str>) -> OreIntake {
        OreIntake {
            id: "1".into(),
            reference: "OI-0001".into(),
            company_name: "Globe Mining".into(),
            shaft_name: "Shaft 3".into(),
            intake_date: "2024-03-01".into(),
            ore_type: "sulphide".into(),
            tonnage: 12.5,
            vehicle_reg: "ACD 1234".into(),
            sample_status: status,
            assay_grade_gpt: None,
            mill_id: mill.map(str::to_string),
            mill_name: None,
            taxes: vec![],
            created_at: "2024-03-01T08:00:00Z".into(),
        }
    }

    #[test]
    fn test_mill_assignment_requires_approved_sample() {
        assert!(!record(SampleStatus::Pending, None).can_assign_mill());
        assert!(record(SampleStatus::Approved, None).can_assign_mill());
        assert!(!record(SampleStatus::Approved, Some("m1")).can_assign_mill());
        assert!(record(SampleStatus::Pending, None).can_decide_sample());
    }

    #[test]
    fn test_record_tolerates_missing_optional_fields() {
        let value = json!({
            "id": "1",
            "reference": "OI-0001",
            "companyName": "Globe Mining",
            "shaftName": "Shaft 3",
            "intakeDate": "2024-03-01",
            "oreType": "oxide",
            "tonnage": 3.0,
            "vehicleReg": "ACD 1234",
            "createdAt": "2024-03-01T08:00:00Z"
        });
        let r: OreIntake = serde_json::from_value(value).unwrap();
        assert_eq!(r.sample_status, SampleStatus::Pending);
        assert!(r.taxes.is_empty());
    }

    #[test]
    fn test_payload_date_is_calendar_date() {
        let dto = OreIntakeDto {
            company_id: "c1".into(),
            shaft_id: "s1".into(),
            intake_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ore_type: "oxide".into(),
            tonnage: 4.0,
            vehicle_reg: "ABC".into(),
            driver_name: None,
            taxes: vec![TaxEntryDto { tax_type: "VAT".into(), rate: 15.0 }],
            notes: None,
        };
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["intakeDate"], "2024-03-01");
        assert_eq!(v["taxes"][0]["type"], "VAT");
        assert!(v.get("driverName").is_none());
    }
}
