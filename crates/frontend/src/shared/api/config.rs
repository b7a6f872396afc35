//! Where the back-office API lives.
//!
//! The backend listens on port 3000 of the host serving the dashboard. A
//! different base can be pinned per browser through `localStorage`, which is
//! handy against staging servers.

pub const BACKEND_PORT: u16 = 3000;
pub const BASE_URL_STORAGE_KEY: &str = "mining_api_base";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve from the browser: stored override first, then window location.
    pub fn from_browser() -> Self {
        if let Some(stored) = stored_base_url() {
            log::info!("Using API base from localStorage: {}", stored);
            return Self::new(stored);
        }
        Self::new(location_base_url())
    }

    /// `/api/{path}` under the base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn stored_base_url() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage
        .get_item(BASE_URL_STORAGE_KEY)
        .ok()?
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn location_base_url() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_api_prefix() {
        let config = ApiConfig::new("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(
            config.url("ore-intakes"),
            "http://localhost:3000/api/ore-intakes"
        );
        assert_eq!(
            config.url("/options/mills"),
            "http://localhost:3000/api/options/mills"
        );
    }
}
