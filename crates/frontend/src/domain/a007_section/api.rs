use crate::shared::api::{fetch_records, ApiClient};
use contracts::domain::a007_section::{Section, RESOURCE};

pub async fn fetch_sections(client: &dyn ApiClient) -> Result<Vec<Section>, String> {
    fetch_records(client, RESOURCE).await
}
