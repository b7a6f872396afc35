use crate::domain::common::FileMetaDto;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaftCondition {
    Good,
    Fair,
    Poor,
    Critical,
}

impl ShaftCondition {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Critical => "Critical",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.code() == code)
    }

    pub fn all() -> [Self; 4] {
        [Self::Good, Self::Fair, Self::Poor, Self::Critical]
    }
}

/// Operating status the inspector recommends. The backend decides the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaftStatus {
    Active,
    Suspended,
    Closed,
}

impl ShaftStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
            Self::Closed => "Closed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.code() == code)
    }

    pub fn all() -> [Self; 3] {
        [Self::Active, Self::Suspended, Self::Closed]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaftInspection {
    pub id: String,
    pub shaft_name: String,
    pub inspection_date: String,
    pub inspector_name: String,
    pub condition: ShaftCondition,
    pub recommended_status: ShaftStatus,
    #[serde(default)]
    pub status_reason: Option<String>,
    pub created_at: String,
}

/// Payload of the inspection wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaftInspectionDto {
    pub shaft_id: String,
    pub inspection_date: NaiveDate,
    pub inspector_name: String,
    pub condition: ShaftCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
    pub photo: FileMetaDto,
    pub recommended_status: ShaftStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
}
