// Path: crates/ledger-client-core/src/model/node.rs
//! Node endpoint state, mutated only by the Submitter's health accounting
//! (see `submitter::node_pool`).

use super::ids::EntityId;
use std::time::Instant;

/// A single consensus node's address and health bookkeeping.
#[derive(Debug, Clone)]
pub struct NodeEndpoint {
    /// The node's network address, e.g. `host:port`.
    pub address: String,
    /// The Ledger account id that owns this node.
    pub account_id: EntityId,
    /// Whether this node is currently eligible for selection.
    pub healthy: bool,
    /// An optional dedicated gRPC-style endpoint, when different from `address`.
    pub grpc_endpoint: Option<String>,
    /// Count of consecutive failures since the last success.
    pub consecutive_failures: u32,
    /// When set, the node is excluded from selection until this instant passes.
    pub cooldown_until: Option<Instant>,
}

impl NodeEndpoint {
    /// Constructs a healthy node with no failure history.
    pub fn new(address: impl Into<String>, account_id: EntityId) -> Self {
        Self {
            address: address.into(),
            account_id,
            healthy: true,
            grpc_endpoint: None,
            consecutive_failures: 0,
            cooldown_until: None,
        }
    }
}
