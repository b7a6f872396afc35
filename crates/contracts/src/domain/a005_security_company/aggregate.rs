use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Security contractor guarding shafts and the gold room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCompany {
    pub id: String,
    pub name: String,
    pub license_number: String,
    pub license_expiry: String,
    pub contact_person: String,
    #[serde(default)]
    pub email: Option<String>,
    pub guards_count: u32,
    pub status: String,
    pub created_at: String,
}

/// Payload of the onboarding wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCompanyDto {
    pub name: String,
    pub license_number: String,
    pub license_expiry: NaiveDate,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub guards_count: u32,
    pub assigned_shafts: Vec<String>,
}
