#[cfg(test)]
mod tests {
    use axum::http::{header, Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::tests::{app, body_json, body_text, get_request, json_request, test_state};

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let state = test_state().await;
        let response = app(&state).oneshot(get_request("/healthz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_readyz_endpoint() {
        let state = test_state().await;
        let response = app(&state).oneshot(get_request("/readyz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ready");
    }

    #[tokio::test]
    async fn test_readyz_when_db_closed() {
        let state = test_state().await;
        state.db.close().await;
        let response = app(&state).oneshot(get_request("/readyz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let state = test_state().await;
        let response = app(&state).oneshot(get_request("/version")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "shiftboard");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_metrics_follow_writes() {
        let state = test_state().await;
        app(&state)
            .oneshot(json_request(Method::POST, "/api/shifts", json!({ "car": { "id": 1 }, "start": 1, "end": 2 })))
            .await
            .unwrap();

        let response = app(&state).oneshot(get_request("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["shifts_created"], 1);
        assert_eq!(body["mirror_failures"], 0);

        let response = app(&state).oneshot(get_request("/metrics/prometheus")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        let text = body_text(response).await;
        assert!(text.contains("# TYPE shiftboard_shifts_created counter"));
        assert!(text.contains("shiftboard_shifts_created 1\n"));
        assert!(text.contains("shiftboard_uptime_seconds"));
    }
}
