use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of recorded incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Accident,
    Contravention,
    Theft,
    EnvironmentalBreach,
}

impl IncidentType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Accident => "accident",
            Self::Contravention => "contravention",
            Self::Theft => "theft",
            Self::EnvironmentalBreach => "environmental_breach",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Accident => "Accident",
            Self::Contravention => "Contravention",
            Self::Theft => "Theft",
            Self::EnvironmentalBreach => "Environmental breach",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.code() == code)
    }

    pub fn all() -> [Self; 4] {
        [
            Self::Accident,
            Self::Contravention,
            Self::Theft,
            Self::EnvironmentalBreach,
        ]
    }

    /// Contraventions carry a regulation code and usually a penalty.
    pub fn is_penalisable(&self) -> bool {
        matches!(self, Self::Contravention | Self::EnvironmentalBreach)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInvolvedDto {
    pub full_name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
}

/// Incident / penalty record as listed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub reference: String,
    pub incident_type: IncidentType,
    pub incident_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub persons: Vec<PersonInvolvedDto>,
    #[serde(default)]
    pub contravention_code: Option<String>,
    #[serde(default)]
    pub penalty_amount: Option<f64>,
    pub status: String,
    pub created_at: String,
}

/// Payload of the incident wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDto {
    pub incident_type: IncidentType,
    pub incident_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shaft_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    pub description: String,
    pub persons: Vec<PersonInvolvedDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contravention_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_type_codes() {
        for t in IncidentType::all() {
            assert_eq!(serde_json::to_value(t).unwrap(), t.code());
            assert_eq!(IncidentType::from_code(t.code()), Some(t));
        }
        assert!(IncidentType::Contravention.is_penalisable());
        assert!(!IncidentType::Accident.is_penalisable());
    }
}
