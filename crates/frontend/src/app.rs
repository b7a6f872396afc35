use crate::app_shell::AppShell;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::api::{provide_api_client, ApiConfig, HttpApiClient};
use crate::shared::modal_stack::ModalStackService;
use leptos::prelude::*;
use std::sync::Arc;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppGlobalContext::new());
    provide_context(ModalStackService::new());

    let config = ApiConfig::from_browser();
    log::info!("API base: {}", config.base_url);
    provide_api_client(Arc::new(HttpApiClient::new(config)));

    view! { <AppShell /> }
}
