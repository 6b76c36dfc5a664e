use anyhow::Result;

/// 模拟摄像头配置
///
/// 所有参数都可以通过环境变量覆盖
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub host: String,
    pub port: u16,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl SimulatorConfig {
    pub fn load() -> Result<Self> {
        Ok(Self {
            host: env_or("SIM_HOST", "0.0.0.0"),
            port: env_parse("SIM_PORT", 9100),
            fps: env_parse("SIM_FPS", 5u32).max(1),
            width: env_parse("SIM_WIDTH", 640),
            height: env_parse("SIM_HEIGHT", 480),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
