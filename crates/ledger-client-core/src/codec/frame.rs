// Path: crates/ledger-client-core/src/codec/frame.rs
//! Stream framing: `1 flag byte + 4-byte big-endian length + payload`. The
//! flag's high bit distinguishes a trailer frame (status) from a data frame
//! (message payload). Used both for the unary transport's single logical
//! response and the server-stream transport's sequence of inbound messages.

use crate::error::CodecError;
use std::collections::HashMap;

const TRAILER_FLAG: u8 = 0x80;
const HEADER_LEN: usize = 5;

/// One parsed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A data frame carrying one message's bytes.
    Data(Vec<u8>),
    /// The terminal trailer frame, carrying `name: value\r\n` pairs.
    Trailer(HashMap<String, String>),
}

/// Wraps `payload` as a single data frame: flag `0x00`, big-endian length prefix.
pub fn encode_data_frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.push(0x00);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// Parses the ASCII `name: value\r\n` pairs carried by a trailer frame's payload.
pub fn parse_trailer_payload(payload: &[u8]) -> HashMap<String, String> {
    let text = String::from_utf8_lossy(payload);
    let mut map = HashMap::new();
    for line in text.split("\r\n") {
        if let Some((name, value)) = line.split_once(':') {
            map.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    map
}

/// Incrementally buffers incoming bytes and emits complete frames as they
/// arrive, so a streaming transport can feed it arbitrarily-sized chunks
/// from the network without re-parsing from scratch each time.
#[derive(Debug, Default)]
pub struct FrameParser {
    buf: Vec<u8>,
}

impl FrameParser {
    /// Creates an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends newly-received bytes to the internal buffer.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pops and returns every complete frame currently buffered, leaving any
    /// partial trailing frame in the buffer for the next `feed`.
    pub fn drain_frames(&mut self) -> Result<Vec<Frame>, CodecError> {
        let mut frames = Vec::new();
        let mut consumed = 0;

        loop {
            let remaining = &self.buf[consumed..];
            if remaining.len() < HEADER_LEN {
                break;
            }
            let flag = remaining[0];
            let len = u32::from_be_bytes([remaining[1], remaining[2], remaining[3], remaining[4]])
                as usize;
            if remaining.len() < HEADER_LEN + len {
                break;
            }
            let payload = remaining[HEADER_LEN..HEADER_LEN + len].to_vec();
            consumed += HEADER_LEN + len;

            match flag & TRAILER_FLAG {
                0 => frames.push(Frame::Data(payload)),
                _ => frames.push(Frame::Trailer(parse_trailer_payload(&payload))),
            }
        }

        self.buf.drain(0..consumed);
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_then_trailer_frame_fed_in_two_chunks() {
        let mut parser = FrameParser::new();
        let data = encode_data_frame(b"hello");
        let mut trailer_payload = Vec::new();
        trailer_payload.extend_from_slice(b"grpc-status: 0\r\n");
        let mut trailer = Vec::new();
        trailer.push(TRAILER_FLAG);
        trailer.extend_from_slice(&(trailer_payload.len() as u32).to_be_bytes());
        trailer.extend_from_slice(&trailer_payload);

        // Feed half the data frame, expect nothing yet.
        parser.feed(&data[..3]);
        assert!(parser.drain_frames().unwrap().is_empty());

        // Feed the rest plus the whole trailer.
        parser.feed(&data[3..]);
        parser.feed(&trailer);
        let frames = parser.drain_frames().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], Frame::Data(b"hello".to_vec()));
        match &frames[1] {
            Frame::Trailer(map) => assert_eq!(map.get("grpc-status").map(String::as_str), Some("0")),
            other => panic!("expected trailer, got {other:?}"),
        }
    }

    #[test]
    fn leaves_partial_trailing_frame_buffered() {
        let mut parser = FrameParser::new();
        let data = encode_data_frame(b"abcdef");
        parser.feed(&data[..data.len() - 2]);
        assert!(parser.drain_frames().unwrap().is_empty());
        parser.feed(&data[data.len() - 2..]);
        assert_eq!(parser.drain_frames().unwrap(), vec![Frame::Data(b"abcdef".to_vec())]);
    }
}
