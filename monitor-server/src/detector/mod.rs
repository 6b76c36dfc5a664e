// 帧分析后端
//
// 检测策略在启动时选定一次并注入到所有工作器。
// 后端只实现 `Detector::analyze`，如何处理结果由工作器决定。

mod motion;


pub use motion::MotionDetector;

use async_trait::async_trait;
use common::{DetectionDetail, Frame, MonitorError, Result};
use std::str::FromStr;
use std::sync::Arc;

/// 单帧的分析结果
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub detected: bool,
    pub details: Vec<DetectionDetail>,
}

impl Detection {
    /// 未检出
    pub fn none() -> Self {
        Self::default()
    }

    /// 检出，附带细节
    pub fn with_details(details: Vec<DetectionDetail>) -> Self {
        Self { detected: true, details }
    }
}

/// 帧分析策略
#[async_trait]
pub trait Detector: Send + Sync {
    /// 分析一帧；`camera_id` 用于区分各摄像头的内部状态
    async fn analyze(&self, frame: &Frame, camera_id: &str) -> Result<Detection>;

    /// 后端名称，用于启动日志
    fn name(&self) -> &'static str;
}

/// 配置可选的检测后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Motion,
    Disabled,
}

impl FromStr for DetectorKind {
    type Err = MonitorError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "motion" => Ok(DetectorKind::Motion),
            "disabled" | "none" => Ok(DetectorKind::Disabled),
            other => Err(MonitorError::ConfigError(format!(
                "unknown detector backend: {}",
                other
            ))),
        }
    }
}

/// 按配置构建检测后端
pub fn build_detector(kind: DetectorKind) -> Arc<dyn Detector> {
    match kind {
        DetectorKind::Motion => Arc::new(MotionDetector::new()),
        DetectorKind::Disabled => Arc::new(DisabledDetector),
    }
}

/// 空后端：从不产生检出
pub struct DisabledDetector;

#[async_trait]
impl Detector for DisabledDetector {
    async fn analyze(&self, _frame: &Frame, _camera_id: &str) -> Result<Detection> {
        Ok(Detection::none())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
