use crate::shared::api::{fetch_record, fetch_records, ApiClient};
use contracts::domain::a001_ore_intake::{
    MillAssignmentDto, OreIntake, SampleDecisionDto, RESOURCE,
};
use contracts::shared::SelectOption;

pub async fn fetch_intakes(client: &dyn ApiClient) -> Result<Vec<OreIntake>, String> {
    fetch_records(client, RESOURCE).await
}

pub async fn fetch_intake(client: &dyn ApiClient, id: &str) -> Result<OreIntake, String> {
    fetch_record(client, RESOURCE, id).await
}

pub async fn decide_sample(
    client: &dyn ApiClient,
    id: &str,
    decision: &SampleDecisionDto,
) -> Result<(), String> {
    let payload = serde_json::to_value(decision).map_err(|e| e.to_string())?;
    client
        .perform_action(RESOURCE, id, "sample", payload)
        .await
        .map(|_| ())
        .map_err(|e| format!("Sample decision failed: {}", e))
}

pub async fn assign_mill(
    client: &dyn ApiClient,
    id: &str,
    assignment: &MillAssignmentDto,
) -> Result<(), String> {
    let payload = serde_json::to_value(assignment).map_err(|e| e.to_string())?;
    client
        .perform_action(RESOURCE, id, "mill", payload)
        .await
        .map(|_| ())
        .map_err(|e| format!("Mill assignment failed: {}", e))
}

pub async fn fetch_mills(client: &dyn ApiClient) -> Result<Vec<SelectOption>, String> {
    client
        .fetch_options("mills")
        .await
        .map_err(|e| format!("Failed to load mills: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api::mock::MockApiClient;
    use contracts::shared::ApiEnvelope;
    use serde_json::json;

    #[tokio::test]
    async fn test_decide_sample_posts_to_action() {
        let client = MockApiClient::new();
        let decision = SampleDecisionDto {
            approved: true,
            assay_grade_gpt: Some(4.2),
            comment: None,
        };
        decide_sample(&client, "oi-7", &decision).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].path, "/api/ore-intakes/oi-7/sample");
        assert_eq!(
            calls[0].payload,
            Some(json!({"approved": true, "assayGradeGpt": 4.2}))
        );
    }

    #[tokio::test]
    async fn test_assign_mill_surfaces_rejection() {
        let client = MockApiClient::new().respond_with(ApiEnvelope::err("Sample not approved"));
        let err = assign_mill(&client, "oi-7", &MillAssignmentDto { mill_id: "m1".into() })
            .await
            .unwrap_err();
        assert!(err.contains("Sample not approved"));
        assert_eq!(client.calls()[0].path, "/api/ore-intakes/oi-7/mill");
    }
}
