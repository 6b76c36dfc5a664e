// 模拟MJPEG摄像头HTTP服务
//
// GET /       -> 服务信息
// GET /stream -> multipart/x-mixed-replace JPEG流

use crate::config::SimulatorConfig;
use crate::frame_gen::FrameGenerator;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use common::mjpeg;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

#[derive(Serialize)]
struct InfoResponse {
    status: String,
    stream_path: String,
    width: u32,
    height: u32,
    fps: u32,
    server_time: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StreamQuery {
    fps: Option<u32>,
}

pub fn create_router(config: SimulatorConfig) -> Router {
    Router::new()
        .route("/", get(get_info))
        .route("/stream", get(get_stream))
        .with_state(config)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn get_info(State(config): State<SimulatorConfig>) -> Json<InfoResponse> {
    Json(InfoResponse {
        status: "Camera simulator running".to_string(),
        stream_path: "/stream".to_string(),
        width: config.width,
        height: config.height,
        fps: config.fps,
        server_time: Utc::now(),
    })
}

async fn get_stream(
    State(config): State<SimulatorConfig>,
    Query(query): Query<StreamQuery>,
) -> Response {
    let fps = query.fps.unwrap_or(config.fps).clamp(1, 60);
    let frame_gap = Duration::from_secs(1) / fps;

    info!(
        "📤 Client connected, streaming {}x{} @ {} fps",
        config.width, config.height, fps
    );

    let mut generator = FrameGenerator::new(config.width, config.height);
    let body_stream = async_stream::stream! {
        let mut ticker = tokio::time::interval(frame_gap);
        loop {
            ticker.tick().await;
            match generator.next_jpeg() {
                Ok(jpeg) => {
                    yield Ok::<_, Infallible>(mjpeg::encode_part(mjpeg::DEFAULT_BOUNDARY, &jpeg));
                }
                Err(e) => {
                    debug!("Frame encode failed, closing stream: {}", e);
                    break;
                }
            }
        }
    };

    Response::builder()
        .header(
            header::CONTENT_TYPE,
            mjpeg::content_type(mjpeg::DEFAULT_BOUNDARY),
        )
        .body(Body::from_stream(body_stream))
        .unwrap_or_else(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())
}
