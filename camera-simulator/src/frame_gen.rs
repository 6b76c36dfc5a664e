// 测试帧生成器
//
// 渲染带移动亮块的渐变图像并编码为JPEG，
// 供运动检测端到端验证使用（亮块逐帧移动会触发检测）

use bytes::Bytes;
use common::{MonitorError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use tracing::debug;

/// JPEG编码质量
const JPEG_QUALITY: u8 = 75;

/// 帧生成器
///
/// 每次调用 `next_jpeg` 产出下一帧，亮块在画面中水平往返移动
pub struct FrameGenerator {
    width: u32,
    height: u32,
    frame_index: u64,
}

impl FrameGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(64),
            height: height.max(64),
            frame_index: 0,
        }
    }

    /// 生成下一帧并编码为JPEG
    pub fn next_jpeg(&mut self) -> Result<Bytes> {
        let mut image = RgbImage::new(self.width, self.height);

        // 渐变背景
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let shade = (x * 32 / self.width + y * 32 / self.height) as u8;
            *pixel = Rgb([shade, shade, 40 + shade]);
        }

        // 往返移动的亮块
        let block = self.width / 8;
        let travel = (self.width - block) as u64;
        let step = (block / 4).max(1) as u64;
        let cycle = (self.frame_index * step) % (travel * 2);
        let x0 = if cycle <= travel {
            cycle as u32
        } else {
            (travel * 2 - cycle) as u32
        };
        let y0 = (self.height / 2).saturating_sub(block / 2);

        for y in y0..(y0 + block).min(self.height) {
            for x in x0..(x0 + block).min(self.width) {
                image.put_pixel(x, y, Rgb([240, 220, 80]));
            }
        }

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
            .encode_image(&image)
            .map_err(|e| MonitorError::ImageError(e.to_string()))?;

        self.frame_index += 1;
        if self.frame_index % 100 == 0 {
            debug!("📤 Generated {} frames", self.frame_index);
        }

        Ok(Bytes::from(jpeg))
    }

    #[allow(dead_code)]
    pub fn frames_generated(&self) -> u64 {
        self.frame_index
    }
}
