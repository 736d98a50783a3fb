// Path: crates/ledger-client-core/src/transport/unary.rs
//! One-shot request/response over HTTP/1.1 with grpc-web-style binary
//! framing: deadline, retries, exponential backoff with jitter, and
//! statistics.

use super::backoff::retry_delay;
use crate::codec::{encode_data_frame, Frame, FrameParser};
use crate::error::TransportError;
use crate::model::GrpcStatistics;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Pulls whatever gRPC/HTTP status codes an error carries, for statistics.
fn observed_codes(err: &TransportError) -> (u32, u32) {
    match err {
        TransportError::GrpcStatus { code, .. } => (*code, 0),
        TransportError::HttpError { status, .. } => (0, *status as u32),
        _ => (0, 0),
    }
}

/// Tunables for the unary transport's retry behavior.
#[derive(Debug, Clone, Copy)]
pub struct TransportConfig {
    /// The base delay for the first retry; doubled per attempt up to a shift of 6.
    pub base_backoff: Duration,
    /// The backoff ceiling before jitter is applied.
    pub max_backoff: Duration,
    /// Maximum number of retries after the first attempt (default 2).
    pub max_retries: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(8),
            max_retries: 2,
        }
    }
}

/// Issues one-shot grpc-web-framed requests with retry, backoff, and a
/// shared statistics sink.
#[derive(Debug, Clone)]
pub struct UnaryTransport {
    client: Client,
    config: TransportConfig,
}

impl UnaryTransport {
    /// Builds a transport over an existing `reqwest::Client` (shared process-wide)
    /// with the given retry configuration.
    pub fn new(client: Client, config: TransportConfig) -> Self {
        Self { client, config }
    }

    /// POSTs `request_bytes` (wrapped in one data frame) to
    /// `{base_url}{method_path}`, retrying until success, a
    /// non-retryable decode failure, or `max_retries` is exhausted.
    pub async fn call(
        &self,
        base_url: &str,
        method_path: &str,
        request_bytes: &[u8],
        deadline: Option<Instant>,
        stats: &GrpcStatistics,
    ) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), method_path);
        let mut last_err: Option<TransportError> = None;

        for attempt in 0..=self.config.max_retries {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(TransportError::DeadlineExceeded);
                }
            }

            stats.record_request();
            let started = Instant::now();
            let outcome = self.attempt(&url, request_bytes).await;
            let latency_ns = started.elapsed().as_nanos() as u64;

            match outcome {
                Ok((body, grpc_status, http_status)) => {
                    // `attempt` only returns `Ok` once grpc-status is zero.
                    stats.record_attempt(latency_ns, grpc_status, http_status);
                    return Ok(body);
                }
                Err(err) => {
                    if attempt < self.config.max_retries {
                        stats.record_retry();
                        last_err = Some(err);
                        tokio::time::sleep(retry_delay(
                            attempt,
                            self.config.base_backoff,
                            self.config.max_backoff,
                        ))
                        .await;
                        continue;
                    }
                    let (grpc_status, http_status) = observed_codes(&err);
                    stats.record_attempt(latency_ns, grpc_status, http_status);
                    stats.record_failure();
                    return Err(err);
                }
            }
        }

        // Unreachable in practice: the loop above always returns by the
        // last iteration, but `last_err` covers the degenerate max_retries=0
        // single-attempt-failed case defensively.
        Err(last_err.unwrap_or_else(|| TransportError::Fault("no attempts made".into())))
    }

    #[cfg(test)]
    pub(crate) fn with_fast_retries(client: Client) -> Self {
        Self::new(
            client,
            TransportConfig {
                base_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(5),
                max_retries: 2,
            },
        )
    }

    async fn attempt(
        &self,
        url: &str,
        request_bytes: &[u8],
    ) -> Result<(Vec<u8>, u32, u32), TransportError> {
        let body = encode_data_frame(request_bytes);

        let response = self
            .client
            .post(url)
            .header("content-type", "application/grpc-web+proto")
            .header("x-grpc-web", "1")
            .header("te", "trailers")
            .header("grpc-accept-encoding", "identity")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Fault(e.to_string()))?;

        let http_status = response.status().as_u16();

        // Trailers-in-headers: some servers/proxies fold the trailer into
        // the response headers instead of a trailing frame.
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

        let raw = response
            .bytes()
            .await
            .map_err(|e| TransportError::Fault(e.to_string()))?;

        if !(200..300).contains(&http_status) && header_grpc_status.is_none() {
            return Err(TransportError::HttpError {
                status: http_status,
                body: Some(String::from_utf8_lossy(&raw).into_owned()),
            });
        }

        let mut parser = FrameParser::new();
        parser.feed(&raw);
        let frames = parser.drain_frames()?;

        let mut data = Vec::new();
        let mut grpc_status = header_grpc_status.unwrap_or(0);
        let mut grpc_message = header_grpc_message;
        for frame in frames {
            match frame {
                Frame::Data(bytes) => data.extend_from_slice(&bytes),
                Frame::Trailer(map) => {
                    if let Some(status) = map.get("grpc-status").and_then(|s| s.parse().ok()) {
                        grpc_status = status;
                    }
                    if let Some(message) = map.get("grpc-message") {
                        grpc_message = Some(message.clone());
                    }
                }
            }
        }

        if grpc_status != 0 {
            return Err(TransportError::GrpcStatus {
                code: grpc_status,
                message: grpc_message,
            });
        }

        Ok((data, grpc_status, http_status as u32))
    }
}
