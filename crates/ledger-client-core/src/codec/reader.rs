// Path: crates/ledger-client-core/src/codec/reader.rs
//! Generic field reader. Given the current position, yields the next
//! `(field_number, wire_type, value)` triple or signals end-of-stream.
//! Decoders built on top of this skip unrecognized field numbers by simply
//! not matching them in their `while let Some(field) = reader.next()?` loop
//! — forward compatibility falls out of the generic shape rather than
//! needing an explicit skip step, since every value is fully consumed as
//! either a varint or a length-delimited blob.

use super::varint::{read_varint, zigzag_decode};
use super::writer::{WIRE_LEN, WIRE_VARINT};
use crate::error::CodecError;

/// One decoded field: its number, wire type, and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The field number the tag encoded.
    pub number: u32,
    /// The wire type the tag encoded (`0` varint, `2` length-delimited).
    pub wire_type: u8,
    /// The decoded payload.
    pub value: Value,
}

/// A field's decoded payload, before the caller interprets it as a specific
/// logical type (signed/unsigned integer, string, embedded message, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Raw varint value, interpretation (unsigned / two's-complement signed /
    /// zig-zag signed / bool) is up to the caller.
    Varint(u64),
    /// Raw length-delimited bytes.
    Bytes(Vec<u8>),
}

impl Value {
    /// Interprets a varint value as unsigned.
    pub fn as_uint64(&self) -> Result<u64, CodecError> {
        match self {
            Value::Varint(v) => Ok(*v),
            Value::Bytes(_) => Err(CodecError::UnsupportedWireType(WIRE_LEN)),
        }
    }

    /// Interprets a varint value as two's-complement signed.
    pub fn as_int64(&self) -> Result<i64, CodecError> {
        self.as_uint64().map(|v| v as i64)
    }

    /// Interprets a varint value as zig-zag signed.
    pub fn as_sint64(&self) -> Result<i64, CodecError> {
        self.as_uint64().map(zigzag_decode)
    }

    /// Interprets a varint value as a bool (`0` is false, anything else true).
    pub fn as_bool(&self) -> Result<bool, CodecError> {
        self.as_uint64().map(|v| v != 0)
    }

    /// Borrows length-delimited bytes.
    pub fn as_bytes(&self) -> Result<&[u8], CodecError> {
        match self {
            Value::Bytes(b) => Ok(b),
            Value::Varint(_) => Err(CodecError::UnsupportedWireType(WIRE_VARINT)),
        }
    }

    /// Interprets length-delimited bytes as a UTF-8 string.
    pub fn as_string(&self) -> Result<String, CodecError> {
        let bytes = self.as_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    /// Opens a sub-[`Reader`] over length-delimited bytes, for embedded messages.
    pub fn as_message(&self) -> Result<Reader<'_>, CodecError> {
        Ok(Reader::new(self.as_bytes()?))
    }
}

/// Reads `(field_number, wire_type, value)` triples from a byte slice.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Wraps `buf` for field-by-field reading from the start.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset into the underlying buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reads the next field, or `None` at end of input.
    pub fn next(&mut self) -> Result<Option<Field>, CodecError> {
        if self.pos >= self.buf.len() {
            return Ok(None);
        }

        let tag = read_varint(self.buf, &mut self.pos)?;
        let field_number = (tag >> 3) as u32;
        let wire_type = (tag & 0x7) as u8;

        let value = match wire_type {
            WIRE_VARINT => {
                let v = read_varint(self.buf, &mut self.pos)?;
                Value::Varint(v)
            }
            WIRE_LEN => {
                let len = read_varint(self.buf, &mut self.pos)? as usize;
                let end = self
                    .pos
                    .checked_add(len)
                    .filter(|&end| end <= self.buf.len())
                    .ok_or(CodecError::UnexpectedEnd)?;
                let bytes = self.buf[self.pos..end].to_vec();
                self.pos = end;
                Value::Bytes(bytes)
            }
            other => return Err(CodecError::UnsupportedWireType(other)),
        };

        Ok(Some(Field {
            number: field_number,
            wire_type,
            value,
        }))
    }

    /// Collects every field in the message, useful for decoders that need
    /// to look ahead or gather repeated fields before validating.
    pub fn collect_all(mut self) -> Result<Vec<Field>, CodecError> {
        let mut out = Vec::new();
        while let Some(field) = self.next()? {
            out.push(field);
        }
        Ok(out)
    }
}
