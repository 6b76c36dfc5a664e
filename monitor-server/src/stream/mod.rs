// 视频流接入
//
// 工作器只依赖这两个契约：`StreamSource` 按URL建立连接，
// `FrameStream` 逐帧读取。丢弃 `FrameStream` 即释放底层连接。
// 其他传输方式通过新的 `StreamSource` 实现接入。

mod http_mjpeg;

pub use http_mjpeg::HttpMjpegSource;

use async_trait::async_trait;
use common::{Frame, Result};

/// 按URL打开视频流
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn FrameStream>>;
}

/// 已建立的帧流
#[async_trait]
pub trait FrameStream: Send {
    /// 读取下一帧；连接断开或流结束时返回错误
    async fn next_frame(&mut self) -> Result<Frame>;
}
