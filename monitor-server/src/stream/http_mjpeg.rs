use super::{FrameStream, StreamSource};
use async_trait::async_trait;
use bytes::Bytes;
use common::mjpeg::{self, MjpegStreamParser};
use common::{Frame, MonitorError, Result};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP上的MJPEG（multipart/x-mixed-replace）视频流
///
/// 所有工作器共享同一个HTTP客户端。
pub struct HttpMjpegSource {
    client: reqwest::Client,
}

impl HttpMjpegSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| MonitorError::StreamConnect(format!("HTTP client init failed: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StreamSource for HttpMjpegSource {
    async fn open(&self, url: &str) -> Result<Box<dyn FrameStream>> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(MonitorError::StreamConnect(format!(
                "unsupported stream url: {}",
                url
            )));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MonitorError::StreamConnect(e.to_string()))?
            .error_for_status()
            .map_err(|e| MonitorError::StreamConnect(e.to_string()))?;

        let boundary = {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            mjpeg::boundary_from_content_type(content_type).ok_or_else(|| {
                MonitorError::StreamConnect(format!(
                    "not an MJPEG stream (content-type {:?})",
                    content_type
                ))
            })?
        };

        debug!("MJPEG stream opened: {} (boundary {})", url, boundary);

        Ok(Box::new(HttpMjpegStream {
            parser: MjpegStreamParser::new(&boundary),
            chunks: response.bytes_stream().boxed(),
        }))
    }
}

struct HttpMjpegStream {
    parser: MjpegStreamParser,
    chunks: BoxStream<'static, reqwest::Result<Bytes>>,
}

#[async_trait]
impl FrameStream for HttpMjpegStream {
    async fn next_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(jpeg) = self.parser.next_frame() {
                return Ok(Frame::new(jpeg));
            }
            if self.parser.buffered() > mjpeg::MAX_PART_BYTES {
                return Err(MonitorError::StreamRead(
                    "part exceeds buffer limit".to_string(),
                ));
            }
            match self.chunks.next().await {
                Some(Ok(chunk)) => self.parser.push(&chunk),
                Some(Err(e)) => return Err(MonitorError::StreamRead(e.to_string())),
                None => return Err(MonitorError::StreamClosed("stream ended".to_string())),
            }
        }
    }
}
