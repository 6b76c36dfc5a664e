mod config;
mod frame_gen;
mod stream;


use anyhow::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志 - 使用环境变量 RUST_LOG 控制级别
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("🎥 Camera simulator starting...");

    let config = config::SimulatorConfig::load()?;
    info!("✓ Configuration loaded");
    info!("  Resolution: {}x{}", config.width, config.height);
    info!("  FPS: {}", config.fps);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✅ Camera simulator ready!");
    info!("   Stream: http://{}/stream", addr);
    info!("   Press Ctrl+C to stop");

    axum::serve(listener, stream::create_router(config)).await?;

    Ok(())
}
