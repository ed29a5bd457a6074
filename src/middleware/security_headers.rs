//! Security headers for every HTTP response.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::{AppConfig, SecurityConfig};

/// Adds the fixed hardening headers, optional HSTS/CSP from configuration,
/// and `no-store` caching for JSON bodies so clients never reuse stale
/// schedules.
pub async fn security_headers_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    apply(res.headers_mut(), cfg.security.as_ref());
    res
}

fn apply(headers: &mut HeaderMap, security: Option<&SecurityConfig>) {
    let fixed = [
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "DENY"),
        ("referrer-policy", "no-referrer"),
        ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
        ("cross-origin-opener-policy", "same-origin"),
        ("cross-origin-resource-policy", "same-origin"),
    ];
    for (name, value) in fixed {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    if let Some(sec) = security {
        if sec.enable_hsts.unwrap_or(false) {
            let max_age = sec.hsts_max_age.unwrap_or(31_536_000);
            let include_sub = if sec.hsts_include_subdomains.unwrap_or(false) { "; includeSubDomains" } else { "" };
            if let Ok(v) = HeaderValue::from_str(&format!("max-age={}{}", max_age, include_sub)) {
                headers.insert(HeaderName::from_static("strict-transport-security"), v);
            }
        }
        if let Some(csp) = sec.csp.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            match HeaderValue::from_str(csp) {
                Ok(v) => {
                    headers.insert(HeaderName::from_static("content-security-policy"), v);
                }
                Err(e) => tracing::warn!("Ignoring invalid CSP from config: {}", e),
            }
        }
    }

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|s| s.starts_with("application/json"));
    if is_json {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    }
}
