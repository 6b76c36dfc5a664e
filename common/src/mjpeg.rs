// MJPEG over HTTP (multipart/x-mixed-replace) 帧封装与解析
//
// 服务端用 MjpegStreamParser 从字节流中恢复JPEG帧，
// 模拟器用 encode_part 生成流式响应体。

use bytes::{Buf, Bytes, BytesMut};

/// 模拟器使用的默认部分边界
pub const DEFAULT_BOUNDARY: &str = "frame";

/// 单个部分的最大字节数，超过视为流损坏
pub const MAX_PART_BYTES: usize = 8 * 1024 * 1024;

/// 流式响应的Content-Type头
pub fn content_type(boundary: &str) -> String {
    format!("multipart/x-mixed-replace; boundary={}", boundary)
}

/// 从Content-Type头中提取部分边界
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let mut parts = content_type.split(';');
    let kind = parts.next()?.trim();
    if !kind.eq_ignore_ascii_case("multipart/x-mixed-replace") {
        return None;
    }
    for param in parts {
        if let Some((name, value)) = param.split_once('=') {
            if name.trim().eq_ignore_ascii_case("boundary") {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// 将一帧JPEG封装成带边界和头部的部分
pub fn encode_part(boundary: &str, jpeg: &[u8]) -> Bytes {
    let mut part = BytesMut::with_capacity(jpeg.len() + boundary.len() + 64);
    part.extend_from_slice(b"--");
    part.extend_from_slice(boundary.as_bytes());
    part.extend_from_slice(b"\r\nContent-Type: image/jpeg\r\nContent-Length: ");
    part.extend_from_slice(jpeg.len().to_string().as_bytes());
    part.extend_from_slice(b"\r\n\r\n");
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    part.freeze()
}

/// 增量式MJPEG解析器
///
/// 任意大小的网络分块通过 [`push`](Self::push) 送入，
/// [`next_frame`](Self::next_frame) 在凑齐一个完整部分后取出JPEG正文。
/// 优先使用部分头中的Content-Length；缺失时扫描到下一个边界。
pub struct MjpegStreamParser {
    buf: BytesMut,
    delimiter: Vec<u8>,
}

impl MjpegStreamParser {
    pub fn new(boundary: &str) -> Self {
        Self {
            buf: BytesMut::new(),
            delimiter: format!("--{}", boundary).into_bytes(),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// 当前缓冲的字节数
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// 取出下一帧完整的JPEG正文，数据不足时返回None
    pub fn next_frame(&mut self) -> Option<Bytes> {
        loop {
            let delim_pos = find(&self.buf, &self.delimiter)?;
            let headers_start = delim_pos + self.delimiter.len();
            let headers_len = find(&self.buf[headers_start..], b"\r\n\r\n")?;
            let body_start = headers_start + headers_len + 4;

            let declared = parse_content_length(&self.buf[headers_start..headers_start + headers_len]);
            let body_end = match declared {
                Some(len) => {
                    let end = body_start + len;
                    if self.buf.len() < end {
                        // 等待更多数据
                        return None;
                    }
                    end
                }
                None => body_start + find(&self.buf[body_start..], &self.delimiter)?,
            };

            self.buf.advance(body_start);
            let mut frame = self.buf.split_to(body_end - body_start).freeze();
            if declared.is_none() {
                // 扫描模式下正文以CRLF结尾
                while frame.ends_with(b"\r") || frame.ends_with(b"\n") {
                    frame.truncate(frame.len() - 1);
                }
            }
            if frame.is_empty() {
                continue;
            }
            return Some(frame);
        }
    }
}

fn parse_content_length(headers: &[u8]) -> Option<usize> {
    let text = std::str::from_utf8(headers).ok()?;
    for line in text.lines() {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().ok();
            }
        }
    }
    None
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
