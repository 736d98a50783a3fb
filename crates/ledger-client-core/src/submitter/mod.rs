// Path: crates/ledger-client-core/src/submitter/mod.rs
//! The Consensus Submitter: node selection/health tracking plus tiered
//! submission (RPC over the node pool, REST fallback).

mod node_pool;
mod submit;

pub use node_pool::{HealthConfig, NodePool};
pub use submit::{SubmitConfig, SubmitStats, Submitter};
