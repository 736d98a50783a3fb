// Path: crates/ledger-client-core/src/config/seeds.rs
//! Built-in network seed node tables. Addresses below are
//! deliberately fictional placeholders in the Ledger's documented address
//! shape (`host:port` plus an owning account), not a guess at real
//! production infrastructure — a real deployment supplies its own table or
//! overrides via a custom network.

use crate::model::{EntityId, NodeEndpoint};

/// One of the built-in network identities `NETWORK` may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedNetwork {
    /// The production network.
    Mainnet,
    /// The long-lived public test network.
    Testnet,
    /// The short-lived preview network tracking upcoming releases.
    Previewnet,
}

impl NamedNetwork {
    /// Parses a `NETWORK` environment value (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Some(Self::Mainnet),
            "testnet" => Some(Self::Testnet),
            "previewnet" => Some(Self::Previewnet),
            _ => None,
        }
    }

    /// The default Mirror REST base URL for this network.
    pub fn default_mirror_url(self) -> &'static str {
        match self {
            Self::Mainnet => "https://mainnet.mirror.ledger.example.com",
            Self::Testnet => "https://testnet.mirror.ledger.example.com",
            Self::Previewnet => "https://previewnet.mirror.ledger.example.com",
        }
    }

    /// The built-in node seed list for this network.
    pub fn seed_nodes(self) -> Vec<NodeEndpoint> {
        match self {
            Self::Mainnet => vec![
                seed("node-01.mainnet.ledger.example.com:443", 3),
                seed("node-02.mainnet.ledger.example.com:443", 4),
                seed("node-03.mainnet.ledger.example.com:443", 5),
                seed("node-04.mainnet.ledger.example.com:443", 6),
            ],
            Self::Testnet => vec![
                seed("node-01.testnet.ledger.example.com:443", 3),
                seed("node-02.testnet.ledger.example.com:443", 4),
                seed("node-03.testnet.ledger.example.com:443", 5),
                seed("node-04.testnet.ledger.example.com:443", 6),
            ],
            Self::Previewnet => vec![
                seed("node-01.previewnet.ledger.example.com:443", 3),
                seed("node-02.previewnet.ledger.example.com:443", 4),
                seed("node-03.previewnet.ledger.example.com:443", 5),
                seed("node-04.previewnet.ledger.example.com:443", 6),
            ],
        }
    }
}

fn seed(address: &str, account_num: u64) -> NodeEndpoint {
    NodeEndpoint::new(address, EntityId::num(account_num))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_network_names_case_insensitively() {
        assert_eq!(NamedNetwork::parse("MainNet"), Some(NamedNetwork::Mainnet));
        assert_eq!(NamedNetwork::parse("testnet"), Some(NamedNetwork::Testnet));
        assert_eq!(NamedNetwork::parse("bogus"), None);
    }

    #[test]
    fn every_named_network_has_exactly_four_seed_nodes() {
        for network in [NamedNetwork::Mainnet, NamedNetwork::Testnet, NamedNetwork::Previewnet] {
            assert_eq!(network.seed_nodes().len(), 4);
        }
    }

    #[test]
    fn seed_nodes_have_distinct_addresses_and_account_ids() {
        for network in [NamedNetwork::Mainnet, NamedNetwork::Testnet, NamedNetwork::Previewnet] {
            let nodes = network.seed_nodes();
            let mut addresses: Vec<&str> = nodes.iter().map(|n| n.address.as_str()).collect();
            addresses.sort();
            addresses.dedup();
            assert_eq!(addresses.len(), nodes.len());

            let mut account_ids: Vec<EntityId> = nodes.iter().map(|n| n.account_id).collect();
            account_ids.sort();
            account_ids.dedup();
            assert_eq!(account_ids.len(), nodes.len());
        }
    }
}
