// Path: crates/ledger-client-core/src/transport/stream.rs
//! Same wire framing as the unary transport, but consumes a sequence of
//! inbound frames until a trailer, invoking a handler once per data frame
//! using grpc-web-style data/trailer framing.

use crate::codec::{encode_data_frame, Frame, FrameParser};
use crate::error::TransportError;
use futures_util::StreamExt;
use reqwest::Client;

/// The terminal status of a completed stream.
#[derive(Debug, Clone, Default)]
pub struct StreamStatus {
    /// The trailer's `grpc-status` (0 is success).
    pub grpc_status: u32,
    /// The trailer's optional `grpc-message`.
    pub grpc_message: Option<String>,
}

/// Opens a server-streaming grpc-web call and invokes `on_frame` once per
/// decoded data frame, returning the terminal status once the trailer frame
/// (or header trailers) is observed.
pub async fn server_stream<F>(
    client: &Client,
    base_url: &str,
    method_path: &str,
    request_bytes: &[u8],
    mut on_frame: F,
) -> Result<StreamStatus, TransportError>
where
    F: FnMut(Vec<u8>),
{
    let url = format!("{}{}", base_url.trim_end_matches('/'), method_path);
    let body = encode_data_frame(request_bytes);

    let response = client
        .post(&url)
        .header("content-type", "application/grpc-web+proto")
        .header("x-grpc-web", "1")
        .header("te", "trailers")
        .header("grpc-accept-encoding", "identity")
        .body(body)
        .send()
        .await
        .map_err(|e| TransportError::Fault(e.to_string()))?;

    let http_status = response.status().as_u16();
    let header_grpc_status = response
        .headers()
        .get("grpc-status")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u32>().ok());
    let header_grpc_message = response
        .headers()
        .get("grpc-message")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if !(200..300).contains(&http_status) && header_grpc_status.is_none() {
        return Err(TransportError::HttpError {
            status: http_status,
            body: None,
        });
    }

    let mut parser = FrameParser::new();
    let mut status = StreamStatus {
        grpc_status: header_grpc_status.unwrap_or(0),
        grpc_message: header_grpc_message,
    };

    let mut byte_stream = response.bytes_stream();
    while let Some(chunk) = byte_stream.next().await {
        let chunk = chunk.map_err(|e| TransportError::Fault(e.to_string()))?;
        parser.feed(&chunk);
        for frame in parser.drain_frames()? {
            match frame {
                Frame::Data(bytes) => on_frame(bytes),
                Frame::Trailer(map) => {
                    if let Some(code) = map.get("grpc-status").and_then(|s| s.parse().ok()) {
                        status.grpc_status = code;
                    }
                    if let Some(message) = map.get("grpc-message") {
                        status.grpc_message = Some(message.clone());
                    }
                }
            }
        }
    }

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn trailer_frame(pairs: &[(&str, &str)]) -> Vec<u8> {
        let mut payload = String::new();
        for (k, v) in pairs {
            payload.push_str(k);
            payload.push_str(": ");
            payload.push_str(v);
            payload.push_str("\r\n");
        }
        let mut out = vec![0x80u8];
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(payload.as_bytes());
        out
    }

    #[tokio::test]
    async fn invokes_handler_once_per_data_frame_and_returns_terminal_status() {
        let server = MockServer::start().await;
        let mut body = encode_data_frame(b"msg-one");
        body.extend_from_slice(&encode_data_frame(b"msg-two"));
        body.extend_from_slice(&trailer_frame(&[("grpc-status", "0")]));

        Mock::given(method("POST"))
            .and(path("/sub"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let mut received = Vec::new();
        let status = server_stream(&reqwest::Client::new(), &server.uri(), "/sub", b"req", |bytes| {
            received.push(bytes);
        })
        .await
        .unwrap();

        assert_eq!(received, vec![b"msg-one".to_vec(), b"msg-two".to_vec()]);
        assert_eq!(status.grpc_status, 0);
    }

    #[tokio::test]
    async fn non_zero_trailer_status_is_reported_without_erroring() {
        let server = MockServer::start().await;
        let mut body = encode_data_frame(b"only-message");
        body.extend_from_slice(&trailer_frame(&[("grpc-status", "1"), ("grpc-message", "cancelled")]));

        Mock::given(method("POST"))
            .and(path("/sub"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let mut received = Vec::new();
        let status = server_stream(&reqwest::Client::new(), &server.uri(), "/sub", b"req", |bytes| {
            received.push(bytes);
        })
        .await
        .unwrap();

        assert_eq!(received, vec![b"only-message".to_vec()]);
        assert_eq!(status.grpc_status, 1);
        assert_eq!(status.grpc_message.as_deref(), Some("cancelled"));
    }

    #[tokio::test]
    async fn non_2xx_without_grpc_header_fails_before_any_frame_is_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sub"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut received: Vec<Vec<u8>> = Vec::new();
        let err = server_stream(&reqwest::Client::new(), &server.uri(), "/sub", b"req", |bytes| {
            received.push(bytes);
        })
        .await
        .unwrap_err();

        assert!(matches!(err, TransportError::HttpError { status: 500, .. }));
        assert!(received.is_empty());
    }
}
