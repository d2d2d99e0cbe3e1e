//! Runtime configuration of the page.
//!
//! `window.__CHECKIN_ENV = { API_BASE_URL: "..." }` (from env.js) takes
//! precedence; otherwise the API is expected on port 3000 of the page's host.

use std::sync::OnceLock;

pub const DEFAULT_API_PORT: u16 = 3000;

static API_BASE_URL: OnceLock<String> = OnceLock::new();

/// Picks the API base URL from an explicit override or the page hostname.
pub fn resolve_base_url(env_override: Option<String>, hostname: Option<String>) -> String {
    if let Some(url) = env_override
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
    {
        return url;
    }
    let host = hostname
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    format!("http://{}:{}", host, DEFAULT_API_PORT)
}

#[cfg(target_arch = "wasm32")]
fn env_override() -> Option<String> {
    let window = web_sys::window()?;
    let env = js_sys::Reflect::get(&window, &"__CHECKIN_ENV".into()).ok()?;
    if env.is_undefined() || env.is_null() {
        return None;
    }
    js_sys::Reflect::get(&env, &"API_BASE_URL".into())
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .or_else(|| js_sys::Reflect::get(&env, &"api_base_url".into()).ok())
        .and_then(|v| v.as_string())
}

#[cfg(target_arch = "wasm32")]
fn page_hostname() -> Option<String> {
    web_sys::window()?.location().hostname().ok()
}

#[cfg(target_arch = "wasm32")]
pub fn api_base_url() -> String {
    API_BASE_URL
        .get_or_init(|| {
            let url = resolve_base_url(env_override(), page_hostname());
            log::info!("API base URL: {url}");
            url
        })
        .clone()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn api_base_url() -> String {
    API_BASE_URL
        .get_or_init(|| resolve_base_url(None, None))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_and_is_normalised() {
        assert_eq!(
            resolve_base_url(Some("https://api.example.test/".into()), Some("page.host".into())),
            "https://api.example.test"
        );
    }

    #[test]
    fn falls_back_to_page_host_on_port_3000() {
        assert_eq!(
            resolve_base_url(None, Some("192.168.1.20".into())),
            "http://192.168.1.20:3000"
        );
        assert_eq!(
            resolve_base_url(Some("  ".into()), None),
            "http://localhost:3000"
        );
    }
}
