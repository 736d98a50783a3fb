// Path: crates/ledger-client-core/src/submitter/submit.rs
//! Tiered submission orchestration: a streaming-RPC-shaped unary tier tries
//! the node pool first, falling back to a plain REST tier, each with its
//! own attempt budget tracked independently — see `SubmitStats`.

use super::node_pool::NodePool;
use crate::codec::Reader;
use crate::envelope::TransactionEnvelope;
use crate::error::{DecodeError, SubmitError, TransportError};
use crate::model::{EntityId, GrpcStatistics, TransactionId, TransactionResponse};
use crate::query::common::decode_transaction_id;
use crate::transport::{RestFetcher, UnaryTransport};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use std::sync::atomic::{AtomicU32, Ordering};

/// Decodes a `hash` field that may arrive as hex (optionally `0x`-prefixed)
/// or base64, per spec's "hex-or-base64" tolerance for this one field. Each
/// encoding is tried outright rather than cross-inferred from other fields.
fn decode_hash(raw: &str) -> Option<Vec<u8>> {
    let trimmed = raw.strip_prefix("0x").unwrap_or(raw);
    if !trimmed.is_empty() && trimmed.len() % 2 == 0 && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        if let Ok(bytes) = hex::decode(trimmed) {
            return Some(bytes);
        }
    }
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(raw).ok()
}

/// Maps a raw precheck response code to its label. The Ledger's code space
/// is large and versioned independently of this client; anything this
/// client doesn't recognize still round-trips as a stable, greppable label
/// rather than being dropped.
fn precheck_label(code: i64) -> String {
    match code {
        0 => "OK".to_string(),
        21 => "SUCCESS".to_string(),
        22 => "DUPLICATE_TRANSACTION".to_string(),
        10 => "INSUFFICIENT_PAYER_BALANCE".to_string(),
        1 => "INVALID_TRANSACTION".to_string(),
        9 => "INVALID_SIGNATURE".to_string(),
        27 => "BUSY".to_string(),
        other => format!("UNRECOGNIZED_{other}"),
    }
}

/// Recovers `transaction_id` from the already-submitted outer bytes: the
/// node's precheck payload never carries one (`decode_precheck` only reads
/// `code`/`cost`), so this is the only source. Decodes the envelope's outer
/// body and reads its leading `TransactionID`-shaped field (field 1, shared
/// across every operation's body schema). Returns `None` if the outer
/// bytes, the recovered body, or the embedded field fail to decode.
fn transaction_id_from_outer(outer_bytes: &[u8]) -> Option<TransactionId> {
    let body = TransactionEnvelope::body_bytes_from_outer(outer_bytes)?;
    let mut reader = Reader::new(&body);
    while let Some(field) = reader.next().ok()? {
        if field.number == 1 {
            return decode_transaction_id(&field.value).ok();
        }
    }
    None
}

/// Decodes a node's precheck acknowledgement: `field 1 = precheck code`,
/// `field 2 = cost`. Per-operation response message shapes beyond this are
/// out of scope; the Submitter only needs enough to report
/// success/failure and surface the raw status label.
fn decode_precheck(bytes: &[u8]) -> Result<(i64, Option<u64>), DecodeError> {
    let mut reader = Reader::new(bytes);
    let mut code = 0i64;
    let mut cost = None;
    while let Some(field) = reader.next()? {
        match field.number {
            1 => code = field.value.as_int64()?,
            2 => cost = Some(field.value.as_uint64()?),
            _ => {}
        }
    }
    Ok((code, cost))
}

/// Per-tier attempt budgets for the Consensus Submitter: RPC and REST
/// fallback keep independent retry budgets rather than sharing one counter,
/// exposed via [`SubmitStats`] so callers can tell which tier actually
/// succeeded.
#[derive(Debug, Clone, Copy)]
pub struct SubmitConfig {
    /// Number of distinct nodes to try over the RPC tier before falling
    /// back to REST (default 3).
    pub rpc_max_attempts: u32,
    /// Number of REST fallback attempts, each against the configured REST
    /// submit URL (default 1; REST submission has no node pool to round-robin).
    pub rest_max_attempts: u32,
    /// The unary RPC method path appended to a node's base URL.
    pub rpc_method_path: String,
    /// The REST submit endpoint, relative to the REST base URL.
    pub rest_path: String,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            rpc_max_attempts: 3,
            rest_max_attempts: 1,
            rpc_method_path: "/proto.CryptoService/submitTransaction".to_string(),
            rest_path: "/api/v1/transactions".to_string(),
        }
    }
}

/// Counts per-tier attempts across the lifetime of a `Submitter`, kept
/// separate from [`GrpcStatistics`] since a tier's attempt count is a
/// submission-level concept, not a transport-level one.
#[derive(Debug, Default)]
pub struct SubmitStats {
    rpc_attempts: AtomicU32,
    rest_attempts: AtomicU32,
}

impl SubmitStats {
    /// Total RPC-tier attempts issued across all `submit` calls.
    pub fn rpc_attempts(&self) -> u32 {
        self.rpc_attempts.load(Ordering::Relaxed)
    }

    /// Total REST-tier attempts issued across all `submit` calls.
    pub fn rest_attempts(&self) -> u32 {
        self.rest_attempts.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RestSubmitRequest<'a> {
    #[serde(with = "base64_bytes")]
    transaction: &'a [u8],
    #[serde(skip_serializing_if = "Option::is_none")]
    node_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestSubmitResponse {
    #[serde(default)]
    node_id: Option<String>,
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    hash: Option<String>,
}

/// The shape of a non-2xx REST submit body: `status`/`error` name the
/// precheck-like label, `message`/`errorMessage`/`detail` carry the
/// human-readable reason. All fields optional since a server may send any
/// subset, or none at all.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RestSubmitErrorResponse {
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default)]
    node_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl RestSubmitErrorResponse {
    fn status_label(&self) -> Option<String> {
        self.status.clone().or_else(|| self.error.clone())
    }

    fn reason(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_message.clone())
            .or_else(|| self.detail.clone())
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &&[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

/// Orchestrates submission of an already-signed, already-encoded outer
/// transaction message across the RPC tier (node pool, grpc-web framing)
/// then the REST fallback tier.
pub struct Submitter {
    node_pool: NodePool,
    transport: UnaryTransport,
    rest: RestFetcher,
    rest_base_url: String,
    config: SubmitConfig,
    stats: GrpcStatistics,
    submit_stats: SubmitStats,
}

impl Submitter {
    /// Builds a submitter over a node pool, the shared unary transport, and
    /// a REST fetcher pointed at `rest_base_url` for the fallback tier.
    pub fn new(
        node_pool: NodePool,
        transport: UnaryTransport,
        rest: RestFetcher,
        rest_base_url: impl Into<String>,
        config: SubmitConfig,
    ) -> Self {
        Self {
            node_pool,
            transport,
            rest,
            rest_base_url: rest_base_url.into(),
            config,
            stats: GrpcStatistics::default(),
            submit_stats: SubmitStats::default(),
        }
    }

    /// Transport-level statistics accumulated by the RPC tier.
    pub fn transport_stats(&self) -> &GrpcStatistics {
        &self.stats
    }

    /// Per-tier attempt counters.
    pub fn submit_stats(&self) -> &SubmitStats {
        &self.submit_stats
    }

    /// Submits `outer_bytes` (the envelope's `encode_outer()` output),
    /// trying the RPC tier across up to `rpc_max_attempts` distinct nodes,
    /// then falling back to the REST tier for up to `rest_max_attempts`.
    pub async fn submit(
        &self,
        outer_bytes: &[u8],
        deadline: Option<Instant>,
    ) -> Result<TransactionResponse, SubmitError> {
        match self.submit_rpc(outer_bytes, deadline).await {
            Ok(response) => return Ok(response),
            Err(SubmitError::NoNodesConfigured) if self.node_pool.is_empty() => {
                // No node pool at all: REST is the only tier available.
            }
            Err(err) if self.config.rest_max_attempts == 0 => return Err(err),
            Err(_) => {}
        }
        self.submit_rest(outer_bytes, deadline).await
    }

    async fn submit_rpc(
        &self,
        outer_bytes: &[u8],
        deadline: Option<Instant>,
    ) -> Result<TransactionResponse, SubmitError> {
        if self.node_pool.is_empty() {
            return Err(SubmitError::NoNodesConfigured);
        }

        let mut last_err = None;
        for _ in 0..self.config.rpc_max_attempts {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(SubmitError::Transport(TransportError::DeadlineExceeded));
                }
            }

            let (idx, node) = self.node_pool.pick_eligible()?;
            self.submit_stats.rpc_attempts.fetch_add(1, Ordering::Relaxed);
            let base_url = node.grpc_endpoint.as_deref().unwrap_or(&node.address);

            let outcome = self
                .transport
                .call(
                    base_url,
                    &self.config.rpc_method_path,
                    outer_bytes,
                    deadline,
                    &self.stats,
                )
                .await;

            match outcome {
                Ok(body) => {
                    let (code, _cost) = decode_precheck(&body)?;
                    self.node_pool.record_success(idx);
                    return Ok(self.response_from_precheck(Some(node.account_id), code, outer_bytes));
                }
                Err(err) => {
                    tracing::debug!(
                        target: "ledger_client::submitter",
                        node = %base_url,
                        error = %err,
                        "rpc submit attempt failed, trying next node"
                    );
                    self.node_pool.record_failure(idx);
                    last_err = Some(err);
                }
            }
        }

        Err(last_err
            .map(SubmitError::Transport)
            .unwrap_or(SubmitError::NoHealthyNodes))
    }

    async fn submit_rest(
        &self,
        outer_bytes: &[u8],
        deadline: Option<Instant>,
    ) -> Result<TransactionResponse, SubmitError> {
        if self.config.rest_max_attempts == 0 {
            return Err(SubmitError::NoNodesConfigured);
        }

        let url = format!(
            "{}{}",
            self.rest_base_url.trim_end_matches('/'),
            self.config.rest_path
        );
        let node_id = self
            .node_pool
            .snapshot()
            .first()
            .map(|n| n.account_id.to_string());
        let request = RestSubmitRequest {
            transaction: outer_bytes,
            node_id,
        };

        let mut last_err = None;
        for _ in 0..self.config.rest_max_attempts {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(SubmitError::Transport(TransportError::DeadlineExceeded));
                }
            }
            self.submit_stats.rest_attempts.fetch_add(1, Ordering::Relaxed);

            match self.rest.post_json(&url, &request).await {
                Ok((status, raw)) if (200..300).contains(&status) => {
                    let parsed: RestSubmitResponse = serde_json::from_slice(&raw).map_err(|e| {
                        SubmitError::Decode(DecodeError::InvalidMessage(e.to_string()))
                    })?;
                    return Ok(self.response_from_rest(parsed, status as u32));
                }
                Ok((status, raw)) => {
                    tracing::debug!(
                        target: "ledger_client::submitter",
                        status,
                        "rest submit attempt returned a non-success status"
                    );
                    // A non-2xx body that parses as a structured error is the
                    // Ledger's own precheck rejection, not a transport fault:
                    // surface it as a normalized, unsuccessful response rather
                    // than retrying or raising a transport error.
                    if let Ok(parsed) = serde_json::from_slice::<RestSubmitErrorResponse>(&raw) {
                        if parsed.status_label().is_some() || parsed.reason().is_some() {
                            return Ok(self.response_from_rest_error(parsed, status as u32));
                        }
                    }
                    last_err = Some(TransportError::HttpError {
                        status,
                        body: Some(String::from_utf8_lossy(&raw).into_owned()),
                    });
                }
                Err(err) => {
                    tracing::debug!(target: "ledger_client::submitter", error = %err, "rest submit attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(SubmitError::Transport(
            last_err.unwrap_or(TransportError::Fault("no REST attempts made".into())),
        ))
    }

    fn response_from_precheck(
        &self,
        node_id: Option<EntityId>,
        code: i64,
        outer_bytes: &[u8],
    ) -> TransactionResponse {
        let label = precheck_label(code);
        // Success is determined by the shared success-set, not just `code ==
        // 0`: spec's success set is `{OK, SUCCESS, OK_ENTITY_UPDATED, ...}`,
        // the same set `status_from_code` uses for receipts/records.
        let success = matches!(crate::model::status_from_code(&label), crate::model::ReceiptStatus::Success);
        TransactionResponse {
            // The precheck payload itself never carries a transaction id;
            // recover it from the bytes we submitted instead.
            transaction_id: transaction_id_from_outer(outer_bytes),
            node_id,
            status_label: label,
            status_code: code as u32,
            hash: None,
            error_message: if success { None } else { Some(format!("precheck failed: {code}")) },
            success,
        }
    }

    fn response_from_rest(&self, parsed: RestSubmitResponse, http_status: u32) -> TransactionResponse {
        let label = parsed.status.clone().unwrap_or_else(|| "OK".to_string());
        let success = label == "OK" || label == "SUCCESS";
        TransactionResponse {
            transaction_id: parsed.transaction_id.as_deref().and_then(|s| s.parse::<TransactionId>().ok()),
            node_id: parsed.node_id.as_deref().and_then(|s| s.parse::<EntityId>().ok()),
            status_label: label,
            status_code: http_status,
            hash: parsed.hash.as_deref().and_then(decode_hash),
            error_message: None,
            success,
        }
    }

    fn response_from_rest_error(&self, parsed: RestSubmitErrorResponse, http_status: u32) -> TransactionResponse {
        let label = parsed.status_label().unwrap_or_else(|| "ERROR".to_string());
        TransactionResponse {
            transaction_id: parsed
                .transaction_id
                .as_deref()
                .and_then(|s| s.parse::<TransactionId>().ok()),
            node_id: parsed.node_id.as_deref().and_then(|s| s.parse::<EntityId>().ok()),
            status_label: label,
            status_code: http_status,
            hash: None,
            error_message: parsed.reason(),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precheck_label_maps_known_and_unknown_codes() {
        assert_eq!(precheck_label(0), "OK");
        assert_eq!(precheck_label(22), "DUPLICATE_TRANSACTION");
        assert_eq!(precheck_label(999), "UNRECOGNIZED_999");
    }

    #[test]
    fn decode_precheck_reads_code_and_cost() {
        use crate::codec::FieldWriter;
        let mut w = FieldWriter::new();
        w.write_int64(1, 22);
        w.write_uint64(2, 500_000);
        let bytes = w.into_bytes();
        let (code, cost) = decode_precheck(&bytes).unwrap();
        assert_eq!(code, 22);
        assert_eq!(cost, Some(500_000));
    }

    fn outer_bytes_with_transaction_id(payer: EntityId, valid_start: crate::model::Timestamp) -> Vec<u8> {
        use crate::codec::FieldWriter;
        use crate::query::common::write_transaction_id;

        let mut body = FieldWriter::new();
        write_transaction_id(
            &mut body,
            1,
            TransactionId::new(payer, valid_start),
        );
        body.write_uint64(2, 7); // some unrelated operation-specific field

        let mut signed_transaction = FieldWriter::new();
        signed_transaction.write_message(1, &body.into_bytes());
        signed_transaction.write_message(2, &FieldWriter::new().into_bytes());

        let mut outer = FieldWriter::new();
        outer.write_message(1, &signed_transaction.into_bytes());
        outer.into_bytes()
    }

    #[test]
    fn response_from_precheck_recovers_transaction_id_from_the_submitted_bytes() {
        let payer = EntityId::num(100);
        let valid_start = crate::model::Timestamp::new(1_700_000_000, 7);
        let outer = outer_bytes_with_transaction_id(payer, valid_start);

        let submitter = Submitter::new(
            NodePool::new(vec![], Default::default()),
            UnaryTransport::new(reqwest::Client::new(), Default::default()),
            RestFetcher::new(reqwest::Client::new()),
            "https://rest.ledger.example.com",
            SubmitConfig::default(),
        );
        let response = submitter.response_from_precheck(Some(EntityId::num(3)), 0, &outer);
        assert_eq!(response.transaction_id, Some(TransactionId::new(payer, valid_start)));
        assert!(response.success);
    }

    #[test]
    fn response_from_precheck_leaves_transaction_id_unset_when_outer_bytes_dont_decode() {
        let submitter = Submitter::new(
            NodePool::new(vec![], Default::default()),
            UnaryTransport::new(reqwest::Client::new(), Default::default()),
            RestFetcher::new(reqwest::Client::new()),
            "https://rest.ledger.example.com",
            SubmitConfig::default(),
        );
        let response = submitter.response_from_precheck(None, 0, b"not-a-valid-outer-message");
        assert_eq!(response.transaction_id, None);
    }

    #[test]
    fn decode_hash_accepts_0x_prefixed_hex() {
        assert_eq!(decode_hash("0xdeadbeef"), Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn decode_hash_accepts_bare_hex() {
        assert_eq!(decode_hash("deadbeef"), Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn decode_hash_falls_back_to_base64_for_non_hex_text() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"not-hex!!");
        assert_eq!(decode_hash(&encoded), Some(b"not-hex!!".to_vec()));
    }

    #[test]
    fn rest_submit_error_response_prefers_status_over_error_and_message_over_detail() {
        let parsed: RestSubmitErrorResponse = serde_json::from_str(
            r#"{"status":"INSUFFICIENT_PAYER_BALANCE","error":"ignored","message":"payer signature invalid","detail":"ignored too"}"#,
        )
        .unwrap();
        assert_eq!(parsed.status_label().as_deref(), Some("INSUFFICIENT_PAYER_BALANCE"));
        assert_eq!(parsed.reason().as_deref(), Some("payer signature invalid"));
    }

    #[tokio::test]
    async fn submit_rest_normalizes_a_structured_4xx_error_into_an_unsuccessful_response() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/transactions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "transactionId": "0.0.100-1700000001-1",
                "status": "INSUFFICIENT_PAYER_BALANCE",
                "message": "payer signature invalid",
            })))
            .mount(&server)
            .await;

        let submitter = Submitter::new(
            NodePool::new(vec![], Default::default()),
            UnaryTransport::new(reqwest::Client::new(), Default::default()),
            RestFetcher::new(reqwest::Client::new()),
            server.uri(),
            SubmitConfig::default(),
        );

        let response = submitter.submit(b"outer-bytes", None).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.status_code, 400);
        assert_eq!(response.status_label, "INSUFFICIENT_PAYER_BALANCE");
        assert_eq!(response.error_message.as_deref(), Some("payer signature invalid"));
        assert_eq!(
            response.transaction_id.map(|id| id.to_string()),
            Some("0.0.100-1700000001-1".to_string())
        );
    }

    #[tokio::test]
    async fn submit_rest_succeeds_when_rpc_tier_has_no_nodes_configured() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/transactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "transactionId": "0.0.500-1700000000-42",
                "status": "OK",
                "nodeId": "0.0.3",
            })))
            .mount(&server)
            .await;

        let submitter = Submitter::new(
            NodePool::new(vec![], Default::default()),
            UnaryTransport::new(reqwest::Client::new(), Default::default()),
            RestFetcher::new(reqwest::Client::new()),
            server.uri(),
            SubmitConfig::default(),
        );

        let response = submitter.submit(b"outer-bytes", None).await.unwrap();
        assert!(response.success);
        assert_eq!(response.status_label, "OK");
        assert_eq!(submitter.submit_stats().rest_attempts(), 1);
        assert_eq!(submitter.submit_stats().rpc_attempts(), 0);
    }
}
