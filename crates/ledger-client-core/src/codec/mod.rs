// Path: crates/ledger-client-core/src/codec/mod.rs
//! The Wire Codec: field encoding (tag/varint/length-delimited) and stream
//! framing (data/trailer frames), layered so the same `Reader`/`FieldWriter`
//! pair backs both request bodies and response messages.

mod frame;
mod reader;
mod varint;
mod writer;

pub use frame::{encode_data_frame, parse_trailer_payload, Frame, FrameParser};
pub use reader::{Field, Reader, Value};
pub use varint::{read_varint, write_varint, zigzag_decode, zigzag_encode};
pub use writer::{FieldWriter, WireEncode, WIRE_LEN, WIRE_VARINT};
