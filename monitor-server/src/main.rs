mod alerts;
mod api;
mod config;
mod detector;
mod stream;
mod supervisor;
mod worker;


use crate::alerts::AlertStore;
use crate::stream::{HttpMjpegSource, StreamSource};
use crate::supervisor::WorkerSupervisor;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("🚀 IP monitor server starting...");

    // 加载配置
    let config = config::Config::load()?;
    info!("✓ Configuration loaded");

    // 摄像头配置不可用时降级为零工作器运行
    let cameras = match config::load_cameras(&config.cameras_file) {
        Ok(cameras) => cameras,
        Err(e) => {
            error!("Camera config unavailable: {}. Running with no workers", e);
            Vec::new()
        }
    };

    // 创建共享状态
    let alerts = AlertStore::new(config.alert_capacity);
    let detector = detector::build_detector(config.detector);
    let source: Arc<dyn StreamSource> = Arc::new(HttpMjpegSource::new()?);
    let supervisor = WorkerSupervisor::new();
    info!("✓ Alert store ready (capacity {})", alerts.capacity());
    info!("✓ Detector backend: {}", detector.name());

    // 启动摄像头工作器
    supervisor.start_workers(
        &cameras,
        source,
        detector,
        alerts.clone(),
        config.worker_settings(),
    );

    // 启动HTTP查询接口
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("✅ IP monitor server ready on {}", addr);

    let router = api::create_router(alerts, supervisor.clone());
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(supervisor))
        .await?;

    Ok(())
}

/// Ctrl-C后广播停止信号；工作器自行退出，不在此等待
async fn shutdown_signal(supervisor: WorkerSupervisor) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping camera workers");
    supervisor.shutdown();
}
