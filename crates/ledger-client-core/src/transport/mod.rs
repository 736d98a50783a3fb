// Path: crates/ledger-client-core/src/transport/mod.rs
//! Transport surfaces: unary grpc-web RPC, server-streaming grpc-web RPC,
//! and a plain JSON REST fetcher, plus the shared backoff helper.

mod backoff;
mod rest;
mod stream;
mod unary;

pub use backoff::{double_capped, full_jitter, retry_delay};
pub use rest::{RestFetcher, DEFAULT_BODY_CAP};
pub use stream::{server_stream, StreamStatus};
pub use unary::{TransportConfig, UnaryTransport};
