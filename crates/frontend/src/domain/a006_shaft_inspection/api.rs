use crate::shared::api::{fetch_records, ApiClient};
use contracts::domain::a006_shaft_inspection::{ShaftInspection, RESOURCE};

pub async fn fetch_inspections(client: &dyn ApiClient) -> Result<Vec<ShaftInspection>, String> {
    fetch_records(client, RESOURCE).await
}
