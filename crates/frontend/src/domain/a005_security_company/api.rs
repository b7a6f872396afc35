use crate::shared::api::{fetch_records, ApiClient};
use contracts::domain::a005_security_company::{SecurityCompany, RESOURCE};

pub async fn fetch_security_companies(client: &dyn ApiClient) -> Result<Vec<SecurityCompany>, String> {
    fetch_records(client, RESOURCE).await
}
