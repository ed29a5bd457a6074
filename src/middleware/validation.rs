use axum::{
    extract::{Request, State},
    http::{header::CONTENT_LENGTH, header::CONTENT_TYPE, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;

const MAX_QUERY_CHARS: usize = 500;

/// Early rejection of write requests the JSON handlers cannot take:
/// bodies above `api.max_body_bytes` (413) and non-JSON bodies on
/// POST/PUT under `/api` (415).
pub async fn validate_request_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    if matches!(req.method(), &Method::POST | &Method::PUT) {
        let declared = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(length) = declared {
            if length > cfg.api.max_body_bytes {
                return (
                    axum::http::StatusCode::PAYLOAD_TOO_LARGE,
                    axum::Json(serde_json::json!({
                        "error": {
                            "code": "PAYLOAD_TOO_LARGE",
                            "message": format!("Request body exceeds maximum size of {} bytes", cfg.api.max_body_bytes),
                        },
                        "status": 413,
                    })),
                )
                    .into_response();
            }
        }

        if req.uri().path().starts_with("/api/") && !is_json(&req) {
            return (
                axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE,
                axum::Json(serde_json::json!({
                    "error": {
                        "code": "UNSUPPORTED_MEDIA_TYPE",
                        "message": "Expected Content-Type: application/json",
                    },
                    "status": 415,
                })),
            )
                .into_response();
        }
    }

    next.run(req).await
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// Trims a search query and strips control characters. Empty and overlong
/// queries are rejected.
pub fn sanitize_search_term(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Search query cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::InvalidInput("Search query too long".to_string()));
    }
    let sanitized: String = trimmed.chars().filter(|ch| !ch.is_control() || ch.is_whitespace()).collect();
    if sanitized.trim().is_empty() {
        return Err(AppError::InvalidInput("Search query contains only control characters".to_string()));
    }
    Ok(sanitized)
}

/// Control characters removed, quotes escaped, at most 200 chars.
pub fn sanitize_for_logging(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .take(200)
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}
