use crate::shared::api::{fetch_records, ApiClient};
use contracts::domain::a004_company::{Company, RESOURCE};

pub async fn fetch_companies(client: &dyn ApiClient) -> Result<Vec<Company>, String> {
    fetch_records(client, RESOURCE).await
}
