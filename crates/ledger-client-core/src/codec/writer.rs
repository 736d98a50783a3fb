// Path: crates/ledger-client-core/src/codec/writer.rs
//! Field encoding: each field is `(tag, payload)` where `tag = (field_number
//! << 3) | wire_type`, written as an unsigned varint.

use super::varint::{write_varint, zigzag_encode};

/// Wire type `0`: varint (unsigned or zig-zag signed integer).
pub const WIRE_VARINT: u8 = 0;
/// Wire type `2`: length-delimited (strings, bytes, embedded messages).
pub const WIRE_LEN: u8 = 2;

fn write_tag(out: &mut Vec<u8>, field_number: u32, wire_type: u8) {
    let tag = ((field_number as u64) << 3) | wire_type as u64;
    write_varint(out, tag);
}

/// Accumulates encoded fields for one message. Field order is insertion
/// order: signature pairs and other repeated fields must preserve
/// insertion order in the wire form.
#[derive(Debug, Default, Clone)]
pub struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes an unsigned integer field. Use for fields known to be non-negative.
    pub fn write_uint64(&mut self, field_number: u32, value: u64) {
        write_tag(&mut self.buf, field_number, WIRE_VARINT);
        write_varint(&mut self.buf, value);
    }

    /// Writes a signed integer field using two's-complement varint encoding
    /// (the encoder's choice, per field semantics, matching the Ledger's own
    /// non-zig-zag signed integer fields such as shard/realm/num components).
    pub fn write_int64(&mut self, field_number: u32, value: i64) {
        write_tag(&mut self.buf, field_number, WIRE_VARINT);
        write_varint(&mut self.buf, value as u64);
    }

    /// Writes a signed integer field using zig-zag encoding, for fields whose
    /// semantics favor compactness of small negative magnitudes (e.g. tinybar
    /// transfer amounts).
    pub fn write_sint64(&mut self, field_number: u32, value: i64) {
        write_tag(&mut self.buf, field_number, WIRE_VARINT);
        write_varint(&mut self.buf, zigzag_encode(value));
    }

    /// Writes a boolean as a `0`/`1` varint.
    pub fn write_bool(&mut self, field_number: u32, value: bool) {
        self.write_uint64(field_number, value as u64);
    }

    /// Writes a length-delimited raw byte field.
    pub fn write_bytes(&mut self, field_number: u32, bytes: &[u8]) {
        write_tag(&mut self.buf, field_number, WIRE_LEN);
        write_varint(&mut self.buf, bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a UTF-8 string field.
    pub fn write_string(&mut self, field_number: u32, s: &str) {
        self.write_bytes(field_number, s.as_bytes());
    }

    /// Writes an embedded message field from pre-encoded bytes.
    pub fn write_message(&mut self, field_number: u32, encoded: &[u8]) {
        self.write_bytes(field_number, encoded);
    }

    /// Consumes the writer, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrows the accumulated bytes without consuming the writer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Implemented by every transaction-body / message type that knows how to
/// lay itself out field-by-field. Kept separate from
/// `envelope::TransactionBodyEncoder` so the same trait covers both
/// top-level bodies and embedded submessages (transfer lists, signature
/// pairs, query headers, ...).
pub trait WireEncode {
    /// Writes this value's fields into `writer`.
    fn write_fields(&self, writer: &mut FieldWriter);

    /// Convenience: encodes this value alone into a fresh byte buffer.
    fn encode(&self) -> Vec<u8> {
        let mut w = FieldWriter::new();
        self.write_fields(&mut w);
        w.into_bytes()
    }
}
