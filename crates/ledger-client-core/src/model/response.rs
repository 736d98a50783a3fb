// Path: crates/ledger-client-core/src/model/response.rs
//! Submission and query outcome types: `TransactionResponse`,
//! `TransactionReceipt`, `TransactionRecord`.

use super::ids::{EntityId, TransactionId};
use super::timestamp::Timestamp;

/// Precheck/response codes that count as success. The Ledger's
/// response-code space is much larger; everything outside this set maps to
/// `failed`, and `UNKNOWN` alone maps to `unknown` (see [`status_from_code`]).
const SUCCESS_CODES: &[&str] = &["OK", "SUCCESS", "OK_ENTITY_UPDATED"];

/// The not-yet-available marker used by the Receipt Poller to decide whether
/// to keep polling.
pub const UNKNOWN_CODE: &str = "UNKNOWN";

/// A receipt or record's terminal-or-not status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// The transaction reached a successful terminal outcome.
    Success,
    /// The transaction has not yet reached consensus; polling may continue.
    Unknown,
    /// The transaction reached a non-successful terminal outcome.
    Failed,
}

impl ReceiptStatus {
    /// Only `Unknown` permits further polling.
    pub fn is_pollable(self) -> bool {
        matches!(self, ReceiptStatus::Unknown)
    }
}

/// Maps a raw Ledger response/precheck code string to its
/// [`ReceiptStatus`] bucket.
pub fn status_from_code(code: &str) -> ReceiptStatus {
    if code == UNKNOWN_CODE {
        ReceiptStatus::Unknown
    } else if SUCCESS_CODES.contains(&code) {
        ReceiptStatus::Success
    } else {
        ReceiptStatus::Failed
    }
}

/// The immediate outcome of a submit call: either a node's precheck
/// response (RPC tier) or the REST fallback's JSON acknowledgement.
#[derive(Debug, Clone)]
pub struct TransactionResponse {
    /// The transaction id, when known (falls back to a pre-submission decode
    /// of the envelope's outer body if the precheck payload itself didn't parse).
    pub transaction_id: Option<TransactionId>,
    /// The node that accepted (or rejected) the submission.
    pub node_id: Option<EntityId>,
    /// The human-readable status label (e.g. `"OK"`, `"INSUFFICIENT_PAYER_BALANCE"`).
    pub status_label: String,
    /// The transport-level status code: the gRPC/HTTP status observed for this attempt.
    pub status_code: u32,
    /// The submitted transaction's hash, when returned.
    pub hash: Option<Vec<u8>>,
    /// A descriptive error message, present on non-success outcomes.
    pub error_message: Option<String>,
    /// `true` iff `status_label` is in the success set.
    pub success: bool,
}

/// The minimal outcome record of a transaction: status and identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// The bucketed terminal-or-not status.
    pub status: ReceiptStatus,
    /// The raw status label as returned by the Ledger.
    pub status_label: String,
    /// The transaction this receipt describes.
    pub transaction_id: TransactionId,
}

/// A transfer entry in a record's transfer list: account plus signed tinybar delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEntry {
    /// The account whose balance changed.
    pub account_id: EntityId,
    /// The signed tinybar delta (negative is a debit).
    pub amount: i64,
}

/// The full outcome of a transaction: receipt plus transfers, fees, memo,
/// and optional children/duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// The receipt this record elaborates on.
    pub receipt: TransactionReceipt,
    /// The consensus timestamp assigned to this transaction.
    pub consensus_timestamp: Timestamp,
    /// The net balance changes this transaction caused.
    pub transfer_list: Vec<TransferEntry>,
    /// The memo attached at submission time.
    pub memo: String,
    /// The fee charged to the payer, in tinybars.
    pub charged_fee: i64,
    /// Records for the same `(payer, valid_start)` submitted more than once.
    pub duplicates: Vec<TransactionRecord>,
    /// Records for transactions the Ledger spawned as a side effect of this one.
    pub children: Vec<TransactionRecord>,
}
