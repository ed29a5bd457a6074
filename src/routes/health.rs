use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Liveness only, never touches the store
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness check: DB round trip, bounded by a timeout
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let query = sqlx::query("SELECT 1").fetch_one(&state.db);
    match tokio::time::timeout(std::time::Duration::from_secs(5), query).await {
        Ok(Ok(_)) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let counters = [
        ("shifts_created", "Shifts created", m.shifts_created),
        ("shifts_updated", "Shifts updated", m.shifts_updated),
        ("shifts_deleted", "Shifts deleted", m.shifts_deleted),
        ("licences_created", "Car licences created", m.licences_created),
        ("licences_deleted", "Car licences deleted", m.licences_deleted),
        ("searches", "Search requests served", m.searches),
        ("overlap_queries", "Overlap queries served", m.overlap_queries),
        ("conflicts_rejected", "Shift writes rejected for overlapping", m.conflicts_rejected),
        ("mirror_failures", "Search mirror writes that failed after a store commit", m.mirror_failures),
    ];
    let mut body = String::new();
    for (name, help, value) in counters {
        body.push_str(&format!(
            "# HELP shiftboard_{name} {help}\n# TYPE shiftboard_{name} counter\nshiftboard_{name} {value}\n"
        ));
    }
    body.push_str(&format!(
        "# HELP shiftboard_uptime_seconds Uptime seconds\n# TYPE shiftboard_uptime_seconds gauge\nshiftboard_uptime_seconds {}\n",
        m.uptime_seconds
    ));
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
