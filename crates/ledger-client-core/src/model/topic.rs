// Path: crates/ledger-client-core/src/model/topic.rs
//! Topic message, delivered by both the consensus submit path's receipts
//! and the Mirror topic subscription.

use super::timestamp::Timestamp;

/// One message on a topic. Sequence numbers are monotonic per topic; gaps
/// are not expected within a single subscription session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessage {
    /// The topic-local monotonic sequence number.
    pub sequence_number: u64,
    /// The message payload.
    pub message_bytes: Vec<u8>,
    /// The consensus timestamp assigned to this message, when known.
    pub consensus_timestamp: Option<Timestamp>,
}
