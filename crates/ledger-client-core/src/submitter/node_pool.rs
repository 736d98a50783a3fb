// Path: crates/ledger-client-core/src/submitter/node_pool.rs
//! Node selection and health tracking. Kept as a small struct guarded by a
//! single mutex rather than inlined into the Submitter, exposing only
//! `pick_eligible` / `record_success` / `record_failure` as its mutation
//! surface.

use crate::error::SubmitError;
use crate::model::NodeEndpoint;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Health-accounting tunables.
#[derive(Debug, Clone, Copy)]
pub struct HealthConfig {
    /// Consecutive failures before a node is quarantined (default 3).
    pub failure_threshold: u32,
    /// How long a quarantined node is excluded from selection (default 5s).
    /// A value of `Duration::ZERO` disables quarantine.
    pub cooldown: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown: Duration::from_secs(5),
        }
    }
}

struct Inner {
    nodes: Vec<NodeEndpoint>,
    next_index: usize,
}

/// A round-robin pool of node endpoints with health-gated eligibility.
pub struct NodePool {
    inner: Mutex<Inner>,
    config: HealthConfig,
}

impl NodePool {
    /// Builds a pool from an initial node list.
    pub fn new(nodes: Vec<NodeEndpoint>, config: HealthConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                nodes,
                next_index: 0,
            }),
            config,
        }
    }

    /// Number of nodes in the pool, regardless of health.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("node pool mutex poisoned").nodes.len()
    }

    /// True if the pool has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selects the next eligible node, advancing the round-robin index one
    /// past it. A node is eligible if healthy, or if its cooldown has
    /// elapsed (in which case it is promoted to healthy with a cleared
    /// failure counter as a side effect of this call).
    ///
    /// Returns the node's pool index (for later `record_success`/
    /// `record_failure` calls) and a clone of its current state.
    pub fn pick_eligible(&self) -> Result<(usize, NodeEndpoint), SubmitError> {
        let mut guard = self.inner.lock().expect("node pool mutex poisoned");
        let len = guard.nodes.len();
        if len == 0 {
            return Err(SubmitError::NoNodesConfigured);
        }

        let now = Instant::now();
        let start = guard.next_index % len;

        for offset in 0..len {
            let idx = (start + offset) % len;
            let eligible = {
                let node = &guard.nodes[idx];
                node.healthy || node.cooldown_until.map(|until| now >= until).unwrap_or(false)
            };
            if eligible {
                let node = &mut guard.nodes[idx];
                if !node.healthy {
                    tracing::debug!(target: "ledger_client::submitter", node = %node.address, "cooldown elapsed, promoting node back to healthy");
                    node.healthy = true;
                    node.consecutive_failures = 0;
                    node.cooldown_until = None;
                }
                let picked = node.clone();
                guard.next_index = (idx + 1) % len;
                return Ok((idx, picked));
            }
        }

        Err(SubmitError::NoHealthyNodes)
    }

    /// Clears failure state and cooldown on a successful call.
    pub fn record_success(&self, idx: usize) {
        let mut guard = self.inner.lock().expect("node pool mutex poisoned");
        if let Some(node) = guard.nodes.get_mut(idx) {
            node.consecutive_failures = 0;
            node.cooldown_until = None;
            node.healthy = true;
        }
    }

    /// Increments the failure counter; quarantines the node once the
    /// threshold is reached.
    pub fn record_failure(&self, idx: usize) {
        let mut guard = self.inner.lock().expect("node pool mutex poisoned");
        if let Some(node) = guard.nodes.get_mut(idx) {
            node.consecutive_failures += 1;
            if node.consecutive_failures >= self.config.failure_threshold {
                node.healthy = false;
                if !self.config.cooldown.is_zero() {
                    node.cooldown_until = Some(Instant::now() + self.config.cooldown);
                }
                tracing::warn!(
                    target: "ledger_client::submitter",
                    node = %node.address,
                    failures = node.consecutive_failures,
                    cooldown_secs = self.config.cooldown.as_secs(),
                    "quarantining node after repeated failures"
                );
            }
        }
    }

    /// Returns a clone of every node's current state, for diagnostics.
    pub fn snapshot(&self) -> Vec<NodeEndpoint> {
        self.inner.lock().expect("node pool mutex poisoned").nodes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityId;

    fn pool(n: usize) -> NodePool {
        let nodes = (0..n)
            .map(|i| NodeEndpoint::new(format!("node{i}:443"), EntityId::num(i as u64 + 3)))
            .collect();
        NodePool::new(
            nodes,
            HealthConfig {
                failure_threshold: 3,
                cooldown: Duration::from_secs(5),
            },
        )
    }

    #[test]
    fn round_robins_across_calls() {
        let pool = pool(3);
        let (idx0, _) = pool.pick_eligible().unwrap();
        let (idx1, _) = pool.pick_eligible().unwrap();
        let (idx2, _) = pool.pick_eligible().unwrap();
        assert_eq!([idx0, idx1, idx2], [0, 1, 2]);
        let (idx3, _) = pool.pick_eligible().unwrap();
        assert_eq!(idx3, 0);
    }

    #[test]
    fn three_failures_quarantine_the_node() {
        let pool = pool(3);
        let (idx, _) = pool.pick_eligible().unwrap();
        for _ in 0..3 {
            pool.record_failure(idx);
        }
        let snapshot = pool.snapshot();
        assert!(!snapshot[idx].healthy);
        assert!(snapshot[idx].cooldown_until.is_some());
    }

    #[test]
    fn quarantined_node_is_skipped_until_cooldown_elapses() {
        let pool = pool(1);
        let (idx, _) = pool.pick_eligible().unwrap();
        for _ in 0..3 {
            pool.record_failure(idx);
        }
        assert!(matches!(pool.pick_eligible(), Err(SubmitError::NoHealthyNodes)));
    }

    #[test]
    fn empty_pool_fails_with_no_nodes_configured() {
        let pool = NodePool::new(vec![], HealthConfig::default());
        assert!(matches!(pool.pick_eligible(), Err(SubmitError::NoNodesConfigured)));
    }
}
