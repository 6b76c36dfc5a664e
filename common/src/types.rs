use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 摄像头配置
///
/// 从JSON配置文件中读取，配置字段为 `id` / `nombre` / `url`。
/// 没有URL的摄像头不会启动工作器。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl CameraConfig {
    /// 返回可用的流地址，空白地址视为缺失
    pub fn stream_url(&self) -> Option<&str> {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => Some(url),
            _ => None,
        }
    }
}

/// 报警事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub timestamp: DateTime<Utc>,
    pub camera_id: String,
    pub camera_name: String,
    pub details: String,
}

impl AlertEvent {
    pub fn new(camera_id: &str, camera_name: &str, details: String) -> Self {
        Self {
            timestamp: Utc::now(),
            camera_id: camera_id.to_string(),
            camera_name: camera_name.to_string(),
            details,
        }
    }
}

/// 检测结果细节
///
/// `region` 为 `[x, y, width, height]`；运动检测没有置信度。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionDetail {
    pub region: [u32; 4],
    pub confidence: Option<f32>,
}

impl DetectionDetail {
    pub fn motion(region: [u32; 4]) -> Self {
        Self { region, confidence: None }
    }

    pub fn object(region: [u32; 4], confidence: f32) -> Self {
        Self { region, confidence: Some(confidence) }
    }
}

/// 工作器状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Disconnected,
    Connecting,
    Streaming,
    Stopping,
    Stopped,
}

impl WorkerState {
    /// 工作器任务是否仍然存活
    pub fn is_live(&self) -> bool {
        *self != WorkerState::Stopped
    }
}

/// 单帧JPEG图像
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Bytes,
}

impl Frame {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
