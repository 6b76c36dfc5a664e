#[cfg(test)]
mod tests {
    use crate::mjpeg::*;

    const JPEG: &[u8] = b"\xff\xd8fakejpegdata\xff\xd9";

    #[test]
    fn test_content_type_round_trip() {
        let header = content_type(DEFAULT_BOUNDARY);
        assert_eq!(boundary_from_content_type(&header), Some(DEFAULT_BOUNDARY.to_string()));
    }

    #[test]
    fn test_boundary_with_quotes() {
        let header = r#"multipart/x-mixed-replace; boundary="myframe""#;
        assert_eq!(boundary_from_content_type(header), Some("myframe".to_string()));
    }

    #[test]
    fn test_boundary_rejects_other_mime() {
        assert_eq!(boundary_from_content_type("text/html; boundary=frame"), None);
        assert_eq!(boundary_from_content_type("multipart/x-mixed-replace"), None);
    }

    #[test]
    fn test_encode_then_parse_single_part() {
        let part = encode_part("frame", JPEG);
        let mut parser = MjpegStreamParser::new("frame");

        parser.push(&part);
        let frame = parser.next_frame().unwrap();
        assert_eq!(&frame[..], JPEG);
        assert!(parser.next_frame().is_none());
    }

    #[test]
    fn test_parse_across_small_chunks() {
        let part = encode_part("frame", JPEG);
        let mut parser = MjpegStreamParser::new("frame");

        // 3字节分块，边界跨越分块边沿
        let mut recovered = None;
        for chunk in part.chunks(3) {
            parser.push(chunk);
            if let Some(frame) = parser.next_frame() {
                recovered = Some(frame);
            }
        }
        assert_eq!(&recovered.unwrap()[..], JPEG);
    }

    #[test]
    fn test_parse_multiple_parts_in_order() {
        let first = encode_part("frame", b"first-frame");
        let second = encode_part("frame", b"second-frame");
        let mut parser = MjpegStreamParser::new("frame");

        parser.push(&first);
        parser.push(&second);

        assert_eq!(&parser.next_frame().unwrap()[..], b"first-frame");
        assert_eq!(&parser.next_frame().unwrap()[..], b"second-frame");
        assert!(parser.next_frame().is_none());
    }

    #[test]
    fn test_parse_without_content_length() {
        // 有些摄像头不发送Content-Length，只能扫描到下一个边界
        let mut raw = Vec::new();
        raw.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
        raw.extend_from_slice(JPEG);
        raw.extend_from_slice(b"\r\n--frame\r\nContent-Type: image/jpeg\r\n\r\n");
        raw.extend_from_slice(b"tail");

        let mut parser = MjpegStreamParser::new("frame");
        parser.push(&raw);

        let frame = parser.next_frame().unwrap();
        assert_eq!(&frame[..], JPEG);
        // 第二部分还没有结束边界
        assert!(parser.next_frame().is_none());
    }

    #[test]
    fn test_incomplete_part_waits_for_more_data() {
        let part = encode_part("frame", JPEG);
        let mut parser = MjpegStreamParser::new("frame");

        let (head, tail) = part.split_at(part.len() - 5);
        parser.push(head);
        assert!(parser.next_frame().is_none());

        parser.push(tail);
        assert_eq!(&parser.next_frame().unwrap()[..], JPEG);
    }

    #[test]
    fn test_preamble_before_first_boundary_skipped() {
        let mut raw = Vec::from(&b"HTTP preamble junk"[..]);
        raw.extend_from_slice(&encode_part("frame", JPEG));

        let mut parser = MjpegStreamParser::new("frame");
        parser.push(&raw);
        assert_eq!(&parser.next_frame().unwrap()[..], JPEG);
    }

    #[test]
    fn test_buffered_reflects_consumption() {
        let part = encode_part("frame", JPEG);
        let mut parser = MjpegStreamParser::new("frame");

        parser.push(&part);
        assert_eq!(parser.buffered(), part.len());
        parser.next_frame().unwrap();
        assert!(parser.buffered() < part.len());
    }
}
