use crate::alerts::AlertStore;
use crate::supervisor::WorkerSupervisor;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(alerts: AlertStore, supervisor: WorkerSupervisor) -> Router {
    Router::new()
        // 服务状态
        .route("/", get(super::handlers::get_status))
        // 报警查询
        .route("/api/alertas", get(super::handlers::get_recent_alerts))
        .route("/api/alertas/all", get(super::handlers::get_all_alerts))
        .with_state((alerts, supervisor))
        // CORS中间件
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
