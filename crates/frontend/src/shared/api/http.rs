//! `ApiClient` over `fetch`, via gloo-net.

use super::{ApiClient, ApiConfig};
use async_trait::async_trait;
use contracts::shared::{ApiEnvelope, ApiFailure, ApiResponse, SelectOption};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Sent with every POST so backend logs can be matched to a submission.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    config: ApiConfig,
}

impl HttpApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        let url = self.config.url(path);
        log::debug!("GET {}", url);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiFailure::network(e.to_string()))?;
        read_envelope(response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, payload: &Value) -> ApiResponse<T> {
        let url = self.config.url(path);
        let request_id = Uuid::new_v4().to_string();
        log::debug!("POST {} ({})", url, request_id);
        let response = Request::post(&url)
            .header(REQUEST_ID_HEADER, &request_id)
            .json(payload)
            .map_err(|e| ApiFailure::encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiFailure::network(e.to_string()))?;
        read_envelope(response).await
    }
}

/// Status first, then the `{success, data, error}` body.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> ApiResponse<T> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !response.ok() {
        log::warn!("API responded with status {}", status);
        return Err(ApiFailure::from_status(status, &body));
    }

    let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(|e| {
        ApiFailure::new(
            contracts::shared::FailureKind::Decode,
            format!("Unexpected response: {}", e),
        )
    })?;
    envelope.into_response()
}

#[async_trait(?Send)]
impl ApiClient for HttpApiClient {
    async fn create_record(&self, resource: &str, payload: Value) -> ApiResponse<Value> {
        self.post(resource, &payload).await
    }

    async fn fetch_list(&self, resource: &str) -> ApiResponse<Value> {
        self.get(resource).await
    }

    async fn fetch_detail(&self, resource: &str, id: &str) -> ApiResponse<Value> {
        self.get(&format!("{}/{}", resource, urlencoding::encode(id)))
            .await
    }

    async fn fetch_options(&self, category: &str) -> ApiResponse<Vec<SelectOption>> {
        self.get(&format!("options/{}", category)).await
    }

    async fn perform_action(
        &self,
        resource: &str,
        id: &str,
        action: &str,
        payload: Value,
    ) -> ApiResponse<Value> {
        self.post(
            &format!("{}/{}/{}", resource, urlencoding::encode(id), action),
            &payload,
        )
        .await
    }
}
