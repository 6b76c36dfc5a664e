use super::{Detection, Detector};
use async_trait::async_trait;
use common::{DetectionDetail, Frame, MonitorError, Result};
use dashmap::DashMap;
use image::imageops::FilterType;
use image::GrayImage;
use tracing::trace;

/// 判定像素发生变化的灰度差阈值
const PIXEL_DELTA_THRESHOLD: u8 = 30;

/// 全分辨率下触发检出的最小变化面积（像素）
const MIN_MOTION_AREA: u32 = 700;

/// 分析用的缩放宽度，缩放同时抑制传感器噪点
const ANALYSIS_WIDTH: u32 = 320;

/// 帧差运动检测
///
/// 把当前帧与同一摄像头的上一帧做灰度差，变化面积达到阈值
/// 即判定为运动。每个摄像头的上一帧独立缓存，首帧不检出。
pub struct MotionDetector {
    previous: DashMap<String, GrayImage>,
}

struct ChangedRegion {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    changed: u32,
}

impl MotionDetector {
    pub fn new() -> Self {
        Self {
            previous: DashMap::new(),
        }
    }

    /// 缓存的上一帧数量（等于见过帧的摄像头数）
    #[allow(dead_code)]
    pub fn tracked_cameras(&self) -> usize {
        self.previous.len()
    }
}

impl Default for MotionDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Detector for MotionDetector {
    async fn analyze(&self, frame: &Frame, camera_id: &str) -> Result<Detection> {
        let decoded = image::load_from_memory(&frame.data)
            .map_err(|e| MonitorError::DetectorError(format!("frame decode failed: {}", e)))?;
        let full_width = decoded.width();
        let full_height = decoded.height();
        if full_width == 0 || full_height == 0 {
            return Err(MonitorError::DetectorError("empty frame".to_string()));
        }

        let gray = decoded.to_luma8();
        let gray = if gray.width() > ANALYSIS_WIDTH {
            let height = (gray.height() * ANALYSIS_WIDTH / gray.width()).max(1);
            image::imageops::resize(&gray, ANALYSIS_WIDTH, height, FilterType::Triangle)
        } else {
            gray
        };

        // 换入当前帧，取出上一帧
        let previous = match self.previous.insert(camera_id.to_string(), gray.clone()) {
            Some(previous) => previous,
            None => return Ok(Detection::none()),
        };
        if previous.dimensions() != gray.dimensions() {
            // 分辨率变化，基准失效
            return Ok(Detection::none());
        }

        let scale_x = full_width as f32 / gray.width() as f32;
        let scale_y = full_height as f32 / gray.height() as f32;
        let min_area = ((MIN_MOTION_AREA as f32) / (scale_x * scale_y)).max(1.0) as u32;

        let region = match diff(&previous, &gray) {
            Some(region) if region.changed >= min_area => region,
            _ => return Ok(Detection::none()),
        };

        trace!(
            "Motion on {}: {} px changed (min {})",
            camera_id, region.changed, min_area
        );

        let detail = DetectionDetail::motion([
            (region.min_x as f32 * scale_x) as u32,
            (region.min_y as f32 * scale_y) as u32,
            ((region.max_x - region.min_x + 1) as f32 * scale_x) as u32,
            ((region.max_y - region.min_y + 1) as f32 * scale_y) as u32,
        ]);
        Ok(Detection::with_details(vec![detail]))
    }

    fn name(&self) -> &'static str {
        "motion"
    }
}

/// 统计两帧之间超过阈值的像素及其包围盒
fn diff(previous: &GrayImage, current: &GrayImage) -> Option<ChangedRegion> {
    let mut region: Option<ChangedRegion> = None;
    for (x, y, pixel) in current.enumerate_pixels() {
        let delta = pixel.0[0].abs_diff(previous.get_pixel(x, y).0[0]);
        if delta < PIXEL_DELTA_THRESHOLD {
            continue;
        }
        match region.as_mut() {
            Some(region) => {
                region.min_x = region.min_x.min(x);
                region.min_y = region.min_y.min(y);
                region.max_x = region.max_x.max(x);
                region.max_y = region.max_y.max(y);
                region.changed += 1;
            }
            None => {
                region = Some(ChangedRegion {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    changed: 1,
                });
            }
        }
    }
    region
}
