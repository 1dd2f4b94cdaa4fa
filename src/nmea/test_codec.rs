use crate::nmea::LineCodec;

use bytes::BytesMut;

use tokio_util::codec::Decoder;

#[test]
fn test_decode_lines() {
    let mut codec = LineCodec::new();
    let mut buf = BytesMut::from("$GNRMC,one\r\n$GNRMC,two\r\n");

    assert_eq!(
        Some("$GNRMC,one".to_string()),
        codec.decode(&mut buf).unwrap()
    );
    assert_eq!(
        Some("$GNRMC,two".to_string()),
        codec.decode(&mut buf).unwrap()
    );
    assert_eq!(None, codec.decode(&mut buf).unwrap());
}

#[test]
fn test_decode_incomplete_line() {
    let mut codec = LineCodec::new();
    let mut buf = BytesMut::from("$GNRMC,12");

    assert_eq!(None, codec.decode(&mut buf).unwrap());

    buf.extend_from_slice(b"34\r\n");

    assert_eq!(
        Some("$GNRMC,1234".to_string()),
        codec.decode(&mut buf).unwrap()
    );
}

#[test]
fn test_decode_bare_newline() {
    let mut codec = LineCodec::new();
    let mut buf = BytesMut::from("$GNRMC,bare\n");

    assert_eq!(
        Some("$GNRMC,bare".to_string()),
        codec.decode(&mut buf).unwrap()
    );
}

#[test]
fn test_decode_invalid_utf8() {
    let mut codec = LineCodec::new();
    let mut buf = BytesMut::from(&b"\xff\xfe$GNRMC,ok\r\n"[..]);

    let line = codec.decode(&mut buf).unwrap().unwrap();

    assert!(line.ends_with("$GNRMC,ok"));
}

#[test]
fn test_decode_discards_oversize_line() {
    let mut codec = LineCodec::new();
    let long = "x".repeat(200);
    let mut buf = BytesMut::from(long.as_str());

    assert!(codec.decode(&mut buf).is_err());

    buf.extend_from_slice(b"\n$GNRMC,ok\r\n");

    assert_eq!(
        Some("$GNRMC,ok".to_string()),
        codec.decode(&mut buf).unwrap()
    );
}
