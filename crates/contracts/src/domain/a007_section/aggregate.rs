use serde::{Deserialize, Serialize};

/// Mapped mining section (claim block)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub code: String,
    pub name: String,
    pub mine_name: String,
    #[serde(default)]
    pub shaft_count: u32,
    #[serde(default)]
    pub area_hectares: Option<f64>,
    /// `[lat, lng]` of the section centroid, if surveyed
    #[serde(default)]
    pub centroid: Option<[f64; 2]>,
    pub status: String,
}
