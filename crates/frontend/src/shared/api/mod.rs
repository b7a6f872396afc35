//! Client seam to the back-office API.
//!
//! Components never reach for a global client: the app root provides one
//! `SharedApiClient` through Leptos context and everything below asks for it
//! with [`use_api_client`]. Tests substitute their own implementation.

pub mod config;
pub mod http;

use async_trait::async_trait;
use contracts::shared::{ApiResponse, SelectOption};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub use config::ApiConfig;
pub use http::HttpApiClient;

#[async_trait(?Send)]
pub trait ApiClient: Send + Sync {
    /// `POST /api/{resource}`
    async fn create_record(&self, resource: &str, payload: Value) -> ApiResponse<Value>;

    /// `GET /api/{resource}`
    async fn fetch_list(&self, resource: &str) -> ApiResponse<Value>;

    /// `GET /api/{resource}/{id}`
    async fn fetch_detail(&self, resource: &str, id: &str) -> ApiResponse<Value>;

    /// `GET /api/options/{category}`
    async fn fetch_options(&self, category: &str) -> ApiResponse<Vec<SelectOption>>;

    /// `POST /api/{resource}/{id}/{action}`
    async fn perform_action(
        &self,
        resource: &str,
        id: &str,
        action: &str,
        payload: Value,
    ) -> ApiResponse<Value>;
}

pub type SharedApiClient = Arc<dyn ApiClient>;

#[derive(Clone)]
struct ApiClientContext(SharedApiClient);

pub fn provide_api_client(client: SharedApiClient) {
    provide_context(ApiClientContext(client));
}

pub fn use_api_client() -> SharedApiClient {
    use_context::<ApiClientContext>()
        .map(|ctx| ctx.0)
        .expect("ApiClient not provided in context (provide it in app root)")
}

/// Fetch a collection and decode it into records.
///
/// Errors are flattened to `String` for list pages, which only display them.
pub async fn fetch_records<T: DeserializeOwned>(
    client: &dyn ApiClient,
    resource: &str,
) -> Result<Vec<T>, String> {
    let data = client
        .fetch_list(resource)
        .await
        .map_err(|e| format!("Failed to load {}: {}", resource, e))?;
    serde_json::from_value(data).map_err(|e| format!("Failed to parse {}: {}", resource, e))
}

pub async fn fetch_record<T: DeserializeOwned>(
    client: &dyn ApiClient,
    resource: &str,
    id: &str,
) -> Result<T, String> {
    let data = client
        .fetch_detail(resource, id)
        .await
        .map_err(|e| format!("Failed to load record: {}", e))?;
    serde_json::from_value(data).map_err(|e| format!("Failed to parse record: {}", e))
}

#[cfg(test)]
pub mod mock {
    //! In-memory client double recording every call.

    use super::*;
    use contracts::shared::{ApiEnvelope, ApiFailure};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub method: &'static str,
        pub path: String,
        pub payload: Option<Value>,
    }

    /// Echoes created payloads back (with an id) unless a canned envelope is queued.
    #[derive(Default)]
    pub struct MockApiClient {
        calls: Mutex<Vec<Call>>,
        responses: Mutex<Vec<ApiEnvelope>>,
        lists: Mutex<HashMap<String, Value>>,
        options: Mutex<HashMap<String, Vec<SelectOption>>>,
    }

    impl MockApiClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Next `create_record`/`perform_action` answers with `envelope`.
        pub fn respond_with(self, envelope: ApiEnvelope) -> Self {
            self.responses.lock().unwrap().push(envelope);
            self
        }

        pub fn with_list(self, resource: &str, data: Value) -> Self {
            self.lists.lock().unwrap().insert(resource.to_string(), data);
            self
        }

        pub fn with_options(self, category: &str, options: Vec<SelectOption>) -> Self {
            self.options
                .lock()
                .unwrap()
                .insert(category.to_string(), options);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, path: String, payload: Option<Value>) {
            self.calls.lock().unwrap().push(Call { method, path, payload });
        }

        fn next_response(&self) -> Option<ApiEnvelope> {
            let mut queue = self.responses.lock().unwrap();
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        }
    }

    #[async_trait(?Send)]
    impl ApiClient for MockApiClient {
        async fn create_record(&self, resource: &str, payload: Value) -> ApiResponse<Value> {
            self.record("POST", format!("/api/{}", resource), Some(payload.clone()));
            match self.next_response() {
                Some(envelope) => envelope.into_response(),
                None => {
                    let mut echoed = payload;
                    if let Some(obj) = echoed.as_object_mut() {
                        obj.insert("id".to_string(), Value::from("rec-1"));
                    }
                    ApiEnvelope::ok(echoed).into_response()
                }
            }
        }

        async fn fetch_list(&self, resource: &str) -> ApiResponse<Value> {
            self.record("GET", format!("/api/{}", resource), None);
            self.lists
                .lock()
                .unwrap()
                .get(resource)
                .cloned()
                .ok_or_else(|| ApiFailure::from_status(404, ""))
        }

        async fn fetch_detail(&self, resource: &str, id: &str) -> ApiResponse<Value> {
            self.record("GET", format!("/api/{}/{}", resource, id), None);
            let lists = self.lists.lock().unwrap();
            lists
                .get(resource)
                .and_then(|v| v.as_array())
                .and_then(|items| items.iter().find(|item| item["id"] == id).cloned())
                .ok_or_else(|| ApiFailure::from_status(404, ""))
        }

        async fn fetch_options(&self, category: &str) -> ApiResponse<Vec<SelectOption>> {
            self.record("GET", format!("/api/options/{}", category), None);
            Ok(self
                .options
                .lock()
                .unwrap()
                .get(category)
                .cloned()
                .unwrap_or_default())
        }

        async fn perform_action(
            &self,
            resource: &str,
            id: &str,
            action: &str,
            payload: Value,
        ) -> ApiResponse<Value> {
            self.record(
                "POST",
                format!("/api/{}/{}/{}", resource, id, action),
                Some(payload),
            );
            match self.next_response() {
                Some(envelope) => envelope.into_response(),
                None => Ok(Value::Null),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockApiClient;
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    #[tokio::test]
    async fn test_fetch_records_decodes_list() {
        let client = MockApiClient::new().with_list("sections", json!([{"id": "s1"}, {"id": "s2"}]));
        let rows: Vec<Row> = fetch_records(&client, "sections").await.unwrap();
        assert_eq!(rows.len(), 2);

        let row: Row = fetch_record(&client, "sections", "s2").await.unwrap();
        assert_eq!(row, Row { id: "s2".into() });
    }

    #[tokio::test]
    async fn test_fetch_records_reports_missing_resource() {
        let client = MockApiClient::new();
        let err = fetch_records::<Row>(&client, "mills").await.unwrap_err();
        assert!(err.contains("Failed to load mills"));
    }

    #[tokio::test]
    async fn test_fetch_records_reports_shape_mismatch() {
        let client = MockApiClient::new().with_list("sections", json!({"rows": []}));
        let err = fetch_records::<Row>(&client, "sections").await.unwrap_err();
        assert!(err.starts_with("Failed to parse sections"));
    }
}
