// Path: crates/ledger-client-core/src/query/topic_info.rs
//! `ConsensusGetTopicInfo`, outer field 50 — added in the ambient
//! expansion alongside the token allowances query to round out the
//! consensus-topic query family.

use super::common::{decode_timestamp, require_uint64, unwrap_response, wrap_query, write_entity_id, QueryHeader};
use crate::codec::{FieldWriter, Reader};
use crate::error::DecodeError;
use crate::model::{EntityId, Timestamp, TopicMessage};

const OUTER_FIELD: u32 = 50;

/// The decoded topic info answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicInfo {
    /// The queried topic.
    pub topic_id: EntityId,
    /// Free-form memo attached to the topic.
    pub memo: String,
    /// Running hash of all messages submitted to the topic so far.
    pub running_hash: Vec<u8>,
    /// Count of messages submitted to the topic so far.
    pub sequence_number: u64,
    /// When the topic's next auto-renewal charge is due.
    pub expiration_time: Timestamp,
}

/// Builds the wire bytes for a topic info query.
pub fn encode_topic_info_query(header: &QueryHeader, topic_id: EntityId) -> Vec<u8> {
    wrap_query(OUTER_FIELD, header, |inner| {
        write_entity_id(inner, 2, topic_id);
    })
}

/// Decodes a topic info answer.
pub fn decode_topic_info_response(bytes: &[u8]) -> Result<TopicInfo, DecodeError> {
    let mut topic_fields = None;
    for field in unwrap_response(bytes, OUTER_FIELD)? {
        if field.number == 2 {
            topic_fields = Some(field.value.as_message()?.collect_all()?);
        }
    }
    let topic_fields = topic_fields.ok_or(DecodeError::MissingField("topic_info"))?;

    let mut topic_id = None;
    let mut memo = String::new();
    let mut running_hash = Vec::new();
    let mut sequence_number = 0u64;
    let mut expiration_time = Timestamp::new(0, 0);

    for field in topic_fields {
        match field.number {
            1 => memo = field.value.as_string()?,
            2 => running_hash = field.value.as_bytes()?.to_vec(),
            3 => sequence_number = require_uint64(&field.value, "sequence_number")?,
            4 => expiration_time = decode_timestamp(&field.value)?,
            7 => topic_id = Some(super::common::decode_entity_id(&field.value)?),
            _ => {}
        }
    }

    Ok(TopicInfo {
        topic_id: topic_id.ok_or(DecodeError::MissingField("topic_id"))?,
        memo,
        running_hash,
        sequence_number,
        expiration_time,
    })
}

/// Builds a `ConsensusTopicQuery { topic_id, consensus_start_time,
/// consensus_end_time, limit }` for the Mirror node's `subscribeTopic`
/// server-streaming RPC (see `mirror::subscription`). Unlike the queries
/// above, this message is not wrapped in the Query/Response oneof envelope:
/// it is its own top-level streaming request.
pub fn encode_topic_subscribe_query(
    topic_id: EntityId,
    consensus_start_time: Option<Timestamp>,
    consensus_end_time: Option<Timestamp>,
    limit: Option<u64>,
) -> Vec<u8> {
    let mut w = FieldWriter::new();
    write_entity_id(&mut w, 1, topic_id);
    if let Some(start) = consensus_start_time {
        super::common::write_timestamp(&mut w, 2, start);
    }
    if let Some(end) = consensus_end_time {
        super::common::write_timestamp(&mut w, 3, end);
    }
    if let Some(limit) = limit {
        w.write_uint64(4, limit);
    }
    w.into_bytes()
}

/// Decodes one `ConsensusTopicResponse` frame from the `subscribeTopic`
/// stream into a [`TopicMessage`]: `consensus_timestamp` (1), `message` (2),
/// `running_hash` (3, unused here), `sequence_number` (4).
pub fn decode_topic_message_frame(bytes: &[u8]) -> Result<TopicMessage, DecodeError> {
    let mut reader = Reader::new(bytes);
    let mut consensus_timestamp = None;
    let mut message_bytes = Vec::new();
    let mut sequence_number = 0u64;
    while let Some(field) = reader.next()? {
        match field.number {
            1 => consensus_timestamp = Some(decode_timestamp(&field.value)?),
            2 => message_bytes = field.value.as_bytes()?.to_vec(),
            4 => sequence_number = require_uint64(&field.value, "sequence_number")?,
            _ => {}
        }
    }
    Ok(TopicMessage {
        sequence_number,
        message_bytes,
        consensus_timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_subscribe_query_roundtrips_through_the_generic_reader() {
        let bytes = encode_topic_subscribe_query(
            EntityId::num(1001),
            Some(Timestamp::new(1_700_000_000, 0)),
            None,
            Some(50),
        );
        let mut reader = Reader::new(&bytes);
        let mut seen_topic = false;
        let mut seen_start = false;
        let mut seen_limit = false;
        while let Some(field) = reader.next().unwrap() {
            match field.number {
                1 => {
                    assert_eq!(super::super::common::decode_entity_id(&field.value).unwrap(), EntityId::num(1001));
                    seen_topic = true;
                }
                2 => {
                    assert_eq!(decode_timestamp(&field.value).unwrap(), Timestamp::new(1_700_000_000, 0));
                    seen_start = true;
                }
                4 => {
                    assert_eq!(require_uint64(&field.value, "limit").unwrap(), 50);
                    seen_limit = true;
                }
                _ => {}
            }
        }
        assert!(seen_topic && seen_start && seen_limit);
    }

    #[test]
    fn decode_topic_message_frame_reads_sequence_and_payload() {
        let mut w = FieldWriter::new();
        super::super::common::write_timestamp(&mut w, 1, Timestamp::new(1_700_000_000, 1));
        w.write_bytes(2, b"hello topic");
        w.write_uint64(4, 7);
        let msg = decode_topic_message_frame(&w.into_bytes()).unwrap();
        assert_eq!(msg.sequence_number, 7);
        assert_eq!(msg.message_bytes, b"hello topic");
        assert_eq!(msg.consensus_timestamp, Some(Timestamp::new(1_700_000_000, 1)));
    }
}
