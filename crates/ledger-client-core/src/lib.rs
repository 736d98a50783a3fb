// Path: crates/ledger-client-core/src/lib.rs
//! Submission, query, and streaming engine for a distributed-ledger
//! client SDK: wire codec, transaction envelope, node-pool submission with
//! tiered fallback, receipt polling, query encoders/decoders, and a Mirror
//! read/stream client.
//!
//! Out of this crate's scope: the signature primitive, ABI/RLP codecs for
//! smart-contract-call payloads, per-operation transaction body schemas
//! (account/token/file/schedule/contract bodies), and config *loading*
//! mechanisms beyond environment variables and an explicit JSON document.
//! Each plugs in at a narrow seam — [`envelope::Signer`],
//! [`envelope::TransactionBodyEncoder`], [`config::NetworkConfig`] — rather
//! than being reimplemented here.

pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod mirror;
pub mod model;
pub mod query;
pub mod receipt;
pub mod submitter;
pub mod task;
pub mod transport;

pub use envelope::{Signer, SignaturePair, TransactionBodyEncoder, TransactionEnvelope};
pub use ledger_client_macros::TransactionBody;

#[cfg(test)]
mod test_support {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Installs a test-scoped `tracing` subscriber exactly once per process,
    /// matching the kernel's pattern of keeping the library itself free of
    /// any global subscriber installation (that choice belongs to the
    /// binary/application embedding this crate).
    pub fn init_test_tracing() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }
}

#[cfg(test)]
pub(crate) use test_support::init_test_tracing;
