use crate::domain::common::FileMetaDto;
use serde::{Deserialize, Serialize};

/// Registered mining company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub registration_number: String,
    pub company_type: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Payload of the company registration wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRegistrationDto {
    pub name: String,
    pub registration_number: String,
    pub company_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    pub email: String,
    pub phone: String,
    pub physical_address: String,
    pub certificate: FileMetaDto,
}
