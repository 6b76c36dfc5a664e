use crate::alerts::AlertStore;
use crate::supervisor::WorkerSupervisor;
use axum::extract::{Query, State};
use axum::Json;
use common::AlertEvent;
use serde::{Deserialize, Serialize};

type AppState = (AlertStore, WorkerSupervisor);

/// /api/alertas 不带limit时的默认条数
pub const DEFAULT_ALERT_LIMIT: usize = 20;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub cameras_loaded: bool,
    pub active_workers: usize,
    pub workers_initialized: usize,
    pub alert_capacity: usize,
    pub alerts_stored: usize,
}

#[derive(Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<AlertEvent>,
    pub count: usize,
}

#[derive(Deserialize)]
pub struct AlertsQuery {
    pub limit: Option<String>,
}

/// 服务状态摘要
pub async fn get_status(State((alerts, supervisor)): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "IP Monitor Server running".to_string(),
        cameras_loaded: supervisor.total_initialized() > 0,
        active_workers: supervisor.live_workers(),
        workers_initialized: supervisor.total_initialized(),
        alert_capacity: alerts.capacity(),
        alerts_stored: alerts.len().await,
    })
}

/// 最近的报警，最新在前
pub async fn get_recent_alerts(
    Query(query): Query<AlertsQuery>,
    State((alerts, _)): State<AppState>,
) -> Json<AlertsResponse> {
    let limit = resolve_limit(query.limit.as_deref());
    let items = alerts.recent(limit).await;
    let count = items.len();
    Json(AlertsResponse { alerts: items, count })
}

/// 全部缓存的报警，最新在前
pub async fn get_all_alerts(State((alerts, _)): State<AppState>) -> Json<AlertsResponse> {
    let items = alerts.all(None).await;
    let count = items.len();
    Json(AlertsResponse { alerts: items, count })
}

/// 非正数或无法解析的limit一律退回默认值
fn resolve_limit(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|limit| *limit > 0)
        .map(|limit| limit as usize)
        .unwrap_or(DEFAULT_ALERT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::resolve_limit;
    use super::DEFAULT_ALERT_LIMIT;

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(None), DEFAULT_ALERT_LIMIT);
        assert_eq!(resolve_limit(Some("0")), DEFAULT_ALERT_LIMIT);
        assert_eq!(resolve_limit(Some("-3")), DEFAULT_ALERT_LIMIT);
        assert_eq!(resolve_limit(Some("abc")), DEFAULT_ALERT_LIMIT);
        assert_eq!(resolve_limit(Some("15")), 15);
        assert_eq!(resolve_limit(Some(" 7 ")), 7);
    }
}
