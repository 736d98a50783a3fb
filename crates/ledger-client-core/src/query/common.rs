// Path: crates/ledger-client-core/src/query/common.rs
//! Shared wrapping for the Query/Response oneof envelope: every concrete
//! query is an embedded message at a specific outer field number, and every
//! concrete response mirrors it at the same field number in the Response
//! message.

use crate::codec::{Field, FieldWriter, Reader, Value};
use crate::error::DecodeError;

/// An (optional, usually zero-cost) query header: payment transaction bytes
/// plus the desired response type. The payment transaction body schema is
/// out of this crate's scope; callers that need paid queries
/// supply pre-encoded payment bytes from outside this crate.
#[derive(Debug, Clone, Default)]
pub struct QueryHeader {
    /// A pre-signed, pre-encoded transfer transaction covering the query's
    /// cost, when required by the queried operation.
    pub payment: Option<Vec<u8>>,
    /// Requests cost-only answers (`COST_ANSWER`) instead of a full answer
    /// (`ANSWER_ONLY`) when `true`.
    pub cost_answer_only: bool,
}

impl QueryHeader {
    fn write_into(&self, writer: &mut FieldWriter) {
        if let Some(payment) = &self.payment {
            writer.write_message(1, payment);
        }
        writer.write_uint64(2, if self.cost_answer_only { 1 } else { 0 });
    }
}

/// Wraps an already-encoded inner query message at `outer_field`, the
/// standard shape of every concrete query builder in this module.
pub fn wrap_query(outer_field: u32, header: &QueryHeader, inner_fields: impl FnOnce(&mut FieldWriter)) -> Vec<u8> {
    let mut inner = FieldWriter::new();
    let mut header_writer = FieldWriter::new();
    header.write_into(&mut header_writer);
    inner.write_message(1, &header_writer.into_bytes());
    inner_fields(&mut inner);

    let mut outer = FieldWriter::new();
    outer.write_message(outer_field, &inner.into_bytes());
    outer.into_bytes()
}

/// Locates `outer_field`'s embedded response message inside a decoded
/// Response envelope. Forward-compatible: any other field present in the
/// envelope (including response variants this client doesn't know about
/// yet) is silently skipped.
pub fn unwrap_response(bytes: &[u8], outer_field: u32) -> Result<Vec<Field>, DecodeError> {
    let mut reader = Reader::new(bytes);
    while let Some(field) = reader.next()? {
        if field.number == outer_field {
            return field.value.as_message()?.collect_all().map_err(DecodeError::from);
        }
    }
    Err(DecodeError::MissingField("response"))
}

/// Convenience: reads a field's value as `u64`, mapping a codec failure to
/// the field-specific overflow variant.
pub fn require_uint64(value: &Value, field: &'static str) -> Result<u64, DecodeError> {
    value.as_uint64().map_err(|_| DecodeError::ValueOverflow(field))
}

/// Convenience: reads a field's value as `i64`.
pub fn require_int64(value: &Value, field: &'static str) -> Result<i64, DecodeError> {
    value.as_int64().map_err(|_| DecodeError::ValueOverflow(field))
}

/// Decodes an embedded `EntityId`-shaped submessage: `(shard, realm, num)`
/// at fields 1, 2, 3.
pub fn decode_entity_id(value: &Value) -> Result<crate::model::EntityId, DecodeError> {
    use crate::model::EntityId;
    let mut shard = 0u64;
    let mut realm = 0u64;
    let mut num = 0u64;
    for field in value.as_message()?.collect_all()? {
        match field.number {
            1 => shard = require_uint64(&field.value, "entity_id.shard")?,
            2 => realm = require_uint64(&field.value, "entity_id.realm")?,
            3 => num = require_uint64(&field.value, "entity_id.num")?,
            _ => {}
        }
    }
    Ok(EntityId::new(shard, realm, num))
}

/// Encodes an `EntityId` into a submessage at `field_number`.
pub fn write_entity_id(writer: &mut FieldWriter, field_number: u32, id: crate::model::EntityId) {
    let mut w = FieldWriter::new();
    w.write_uint64(1, id.shard);
    w.write_uint64(2, id.realm);
    w.write_uint64(3, id.num);
    writer.write_message(field_number, &w.into_bytes());
}

/// Decodes an embedded `Timestamp`-shaped submessage: `(seconds, nanos)` at
/// fields 1, 2.
pub fn decode_timestamp(value: &Value) -> Result<crate::model::Timestamp, DecodeError> {
    use crate::model::Timestamp;
    let mut seconds = 0i64;
    let mut nanos = 0i64;
    for field in value.as_message()?.collect_all()? {
        match field.number {
            1 => seconds = require_int64(&field.value, "timestamp.seconds")?,
            2 => nanos = require_int64(&field.value, "timestamp.nanos")?,
            _ => {}
        }
    }
    Ok(Timestamp::new(seconds, nanos))
}

/// Encodes a `Timestamp` into a submessage at `field_number`.
pub fn write_timestamp(writer: &mut FieldWriter, field_number: u32, ts: crate::model::Timestamp) {
    let mut w = FieldWriter::new();
    w.write_int64(1, ts.seconds);
    w.write_int64(2, ts.nanos);
    writer.write_message(field_number, &w.into_bytes());
}

/// Decodes an embedded `TransactionId`-shaped submessage:
/// `(payer_account, valid_start, nonce, scheduled)` at fields 1, 2, 4, 3.
pub fn decode_transaction_id(value: &Value) -> Result<crate::model::TransactionId, DecodeError> {
    use crate::model::TransactionId;
    let mut payer_account = None;
    let mut valid_start = None;
    let mut scheduled = false;
    let mut nonce = None;
    for field in value.as_message()?.collect_all()? {
        match field.number {
            1 => payer_account = Some(decode_entity_id(&field.value)?),
            2 => valid_start = Some(decode_timestamp(&field.value)?),
            3 => scheduled = field.value.as_bool()?,
            4 => nonce = Some(require_int64(&field.value, "transaction_id.nonce")? as i32),
            _ => {}
        }
    }
    Ok(TransactionId {
        payer_account: payer_account.ok_or(DecodeError::MissingField("transaction_id.payer_account"))?,
        valid_start: valid_start.ok_or(DecodeError::MissingField("transaction_id.valid_start"))?,
        nonce,
        scheduled,
    })
}

/// Encodes a `TransactionId` into a submessage at `field_number`.
pub fn write_transaction_id(writer: &mut FieldWriter, field_number: u32, id: crate::model::TransactionId) {
    let mut w = FieldWriter::new();
    write_entity_id(&mut w, 1, id.payer_account);
    write_timestamp(&mut w, 2, id.valid_start);
    w.write_bool(3, id.scheduled);
    if let Some(nonce) = id.nonce {
        w.write_int64(4, nonce as i64);
    }
    writer.write_message(field_number, &w.into_bytes());
}
