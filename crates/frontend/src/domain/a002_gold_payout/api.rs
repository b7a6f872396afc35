use crate::shared::api::{fetch_records, ApiClient};
use contracts::domain::a002_gold_payout::{GoldPayout, RESOURCE};

pub async fn fetch_payouts(client: &dyn ApiClient) -> Result<Vec<GoldPayout>, String> {
    fetch_records(client, RESOURCE).await
}
