#[cfg(test)]
mod tests {
    use crate::alerts::AlertStore;
    use crate::api::create_router;
    use crate::supervisor::WorkerSupervisor;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use common::AlertEvent;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn seeded_store(count: usize) -> AlertStore {
        let store = AlertStore::new(100);
        for n in 1..=count {
            store
                .add(AlertEvent::new(
                    &format!("cam{:02}", n),
                    &format!("Cámara {}", n),
                    format!("evento {}", n),
                ))
                .await;
        }
        store
    }

    async fn get_json(router: axum::Router, uri: &str) -> Value {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn first_detail(body: &Value) -> &str {
        body["alerts"][0]["details"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_status_reports_counts() {
        let router = create_router(seeded_store(3).await, WorkerSupervisor::new());
        let body = get_json(router, "/").await;

        assert_eq!(body["status"], "IP Monitor Server running");
        assert_eq!(body["cameras_loaded"], false);
        assert_eq!(body["active_workers"], 0);
        assert_eq!(body["workers_initialized"], 0);
        assert_eq!(body["alert_capacity"], 100);
        assert_eq!(body["alerts_stored"], 3);
    }

    #[tokio::test]
    async fn test_alerts_default_limit_is_twenty() {
        let router = create_router(seeded_store(30).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas").await;

        assert_eq!(body["count"], 20);
        assert_eq!(body["alerts"].as_array().unwrap().len(), 20);
        // 最新在前
        assert_eq!(first_detail(&body), "evento 30");
    }

    #[tokio::test]
    async fn test_alerts_limit_zero_uses_default() {
        let router = create_router(seeded_store(30).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas?limit=0").await;

        assert_eq!(body["count"], 20);
    }

    #[tokio::test]
    async fn test_alerts_negative_limit_uses_default() {
        let router = create_router(seeded_store(30).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas?limit=-5").await;

        assert_eq!(body["count"], 20);
    }

    #[tokio::test]
    async fn test_alerts_malformed_limit_uses_default() {
        let router = create_router(seeded_store(30).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas?limit=abc").await;

        assert_eq!(body["count"], 20);
    }

    #[tokio::test]
    async fn test_alerts_explicit_limit_newest_first() {
        let router = create_router(seeded_store(30).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas?limit=5").await;

        assert_eq!(body["count"], 5);
        let details: Vec<&str> = body["alerts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|alert| alert["details"].as_str().unwrap())
            .collect();
        assert_eq!(
            details,
            vec!["evento 30", "evento 29", "evento 28", "evento 27", "evento 26"]
        );
    }

    #[tokio::test]
    async fn test_alerts_limit_above_stored_returns_everything() {
        let router = create_router(seeded_store(4).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas?limit=100").await;

        assert_eq!(body["count"], 4);
    }

    #[tokio::test]
    async fn test_alerts_all_returns_everything() {
        let router = create_router(seeded_store(30).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas/all").await;

        assert_eq!(body["count"], 30);
        assert_eq!(first_detail(&body), "evento 30");
    }

    #[tokio::test]
    async fn test_alert_payload_shape() {
        let router = create_router(seeded_store(1).await, WorkerSupervisor::new());
        let body = get_json(router, "/api/alertas").await;

        let alert = body["alerts"][0].as_object().unwrap();
        assert!(alert.contains_key("timestamp"));
        assert!(alert.contains_key("camera_id"));
        assert!(alert.contains_key("camera_name"));
        assert!(alert.contains_key("details"));
        assert_eq!(alert.len(), 4);
    }
}
