use crate::shared::api::{fetch_records, ApiClient};
use contracts::domain::a003_incident::{Incident, RESOURCE};

pub async fn fetch_incidents(client: &dyn ApiClient) -> Result<Vec<Incident>, String> {
    fetch_records(client, RESOURCE).await
}
