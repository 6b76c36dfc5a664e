use crate::alerts::DEFAULT_CAPACITY;
use crate::detector::DetectorKind;
use crate::worker::WorkerSettings;
use anyhow::Result;
use common::{CameraConfig, MonitorError};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cameras_file: String,
    pub alert_capacity: usize,
    pub detector: DetectorKind,
    pub processing_interval: Duration,
    pub short_retry: Duration,
    pub long_retry: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        let detector = match env_or("DETECTOR", "motion").parse::<DetectorKind>() {
            Ok(kind) => kind,
            Err(e) => {
                // 原样运行但不做任何检测
                warn!("{}. Detection disabled", e);
                DetectorKind::Disabled
            }
        };

        // 可解析但非法的浮点值（负数、NaN）退回默认间隔
        let interval_secs = env_parse("PROCESSING_INTERVAL_SECS", 1.0);
        let processing_interval = Duration::try_from_secs_f64(interval_secs).unwrap_or_else(|e| {
            warn!("Invalid PROCESSING_INTERVAL_SECS {}: {}. Using 1s", interval_secs, e);
            Duration::from_secs(1)
        });

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 8000),
            cameras_file: env_or("CAMERAS_FILE", "cameras.json"),
            alert_capacity: env_parse("ALERT_CAPACITY", DEFAULT_CAPACITY),
            detector,
            processing_interval,
            short_retry: Duration::from_secs(env_parse("SHORT_RETRY_SECS", 10)),
            long_retry: Duration::from_secs(env_parse("LONG_RETRY_SECS", 30)),
        })
    }

    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            processing_interval: self.processing_interval,
            short_retry: self.short_retry,
            long_retry: self.long_retry,
        }
    }
}

/// 读取摄像头配置文件（JSON数组，字段 id / nombre / url）
pub fn load_cameras(path: impl AsRef<Path>) -> common::Result<Vec<CameraConfig>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
    let cameras: Vec<CameraConfig> = serde_json::from_str(&raw)?;
    info!("✓ {} camera(s) configured from {}", cameras.len(), path.display());
    Ok(cameras)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_cameras_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "cam01", "nombre": "Entrada", "url": "http://localhost:9100/stream"}},
                {{"id": "cam02", "nombre": "Sin URL"}}
            ]"#
        )
        .unwrap();

        let cameras = load_cameras(file.path()).unwrap();
        assert_eq!(cameras.len(), 2);
        assert_eq!(cameras[0].name, "Entrada");
        assert!(cameras[0].stream_url().is_some());
        assert!(cameras[1].stream_url().is_none());
    }

    #[test]
    fn test_load_cameras_missing_file() {
        let err = load_cameras("/nonexistent/cameras.json").err().unwrap();
        assert!(matches!(err, MonitorError::ConfigError(_)));
    }

    #[test]
    fn test_load_cameras_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not json").unwrap();

        let err = load_cameras(file.path()).err().unwrap();
        assert!(matches!(err, MonitorError::SerdeError(_)));
    }

    #[test]
    fn test_env_parse_falls_back_on_missing_var() {
        assert_eq!(env_parse("IP_MONITOR_NO_SUCH_VAR", 42u16), 42);
    }

    #[test]
    fn test_invalid_interval_falls_back_to_default() {
        // 负数和NaN都能通过f64解析，不允许它们进入Duration构造
        for bad in ["-1", "NaN"] {
            std::env::set_var("PROCESSING_INTERVAL_SECS", bad);
            let config = Config::load().unwrap();
            assert_eq!(config.processing_interval, Duration::from_secs(1));
        }
        std::env::remove_var("PROCESSING_INTERVAL_SECS");
    }
}
