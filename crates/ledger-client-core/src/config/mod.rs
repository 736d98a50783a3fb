// Path: crates/ledger-client-core/src/config/mod.rs
//! Client configuration: network selection (built-in seeds or a custom
//! node list), Mirror REST base URL, operator credentials, and debug
//! toggles — resolved from environment variables or an explicit JSON
//! config document. Config *loading mechanisms* beyond these two
//! sources (files, remote config services) are an external collaborator's
//! concern, matching the kernel's own config layer boundary.

mod operator;
mod seeds;

pub use operator::{parse_operator_key, KeyEncoding, OperatorKey};
pub use seeds::NamedNetwork;

use crate::error::ConfigError;
use crate::model::{EntityId, NodeEndpoint};
use serde::Deserialize;
use std::env;

/// A resolved client configuration: everything needed to construct a
/// `Client` without further environment lookups.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// The consensus node pool to submit transactions against.
    pub nodes: Vec<NodeEndpoint>,
    /// The Mirror REST/RPC base URL.
    pub mirror_url: String,
    /// The operator account paying for transactions, when configured.
    pub operator_account_id: Option<EntityId>,
    /// The operator's raw key bytes, when configured.
    pub operator_key: Option<OperatorKey>,
    /// Whether verbose request/response payload logging is enabled.
    pub debug_payloads: bool,
}

/// The JSON shape accepted for an explicit config document (as opposed to
/// environment-variable resolution), e.g. for a custom network.
#[derive(Debug, Deserialize)]
struct ConfigDocument {
    network: Option<String>,
    #[serde(default)]
    nodes: Vec<ConfigDocumentNode>,
    mirror_url: Option<String>,
    operator_account_id: Option<String>,
    operator_key: Option<String>,
    #[serde(default)]
    debug_payloads: bool,
}

#[derive(Debug, Deserialize)]
struct ConfigDocumentNode {
    address: String,
    account_id: String,
}

/// Truthy parsing for boolean-flavored environment variables: `1`, `true`,
/// `yes`, `on`, case-insensitively; anything else (including absence) is
/// `false`.
fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl NetworkConfig {
    /// Resolves configuration from environment variables:
    /// - `NETWORK`: `mainnet` | `testnet` | `previewnet` (default `testnet`
    ///   when unset); ignored if `LEDGER_NODES` is set.
    /// - `LEDGER_NODES`: a comma-separated `address=shard.realm.num` custom
    ///   node list, overriding the named network's built-in seeds.
    /// - `MIRROR_URL`: overrides the named network's default Mirror URL.
    /// - `MIRROR_NETWORK`: alternate spelling consulted when `MIRROR_URL` is unset.
    /// - `OPERATOR_ID` / `OPERATOR_KEY`: optional operator credentials.
    /// - `GRPC_DEBUG_PAYLOADS`: truthy flag enabling verbose logging.
    pub fn from_env() -> Result<Self, ConfigError> {
        let custom_nodes = env::var("LEDGER_NODES").ok();
        let network_name = env::var("NETWORK").unwrap_or_else(|_| "testnet".to_string());

        let (nodes, default_mirror_url) = if let Some(raw) = custom_nodes {
            (parse_custom_nodes(&raw)?, None)
        } else {
            let network = NamedNetwork::parse(&network_name)
                .ok_or_else(|| ConfigError::UnknownNetwork(network_name.clone()))?;
            (network.seed_nodes(), Some(network.default_mirror_url().to_string()))
        };

        let mirror_url = env::var("MIRROR_URL")
            .or_else(|_| env::var("MIRROR_NETWORK"))
            .ok()
            .or(default_mirror_url)
            .ok_or(ConfigError::MissingEnvVar("MIRROR_URL"))?;

        let operator_account_id = env::var("OPERATOR_ID")
            .ok()
            .map(|s| s.parse::<EntityId>().map_err(|_| ConfigError::UnrecognizedKeyEncoding))
            .transpose()?;
        let operator_key = env::var("OPERATOR_KEY")
            .ok()
            .map(|raw| parse_operator_key(&raw))
            .transpose()?;

        Ok(NetworkConfig {
            nodes,
            mirror_url,
            operator_account_id,
            operator_key,
            debug_payloads: env_flag("GRPC_DEBUG_PAYLOADS"),
        })
    }

    /// Resolves configuration from an explicit JSON document, for callers
    /// that load config from somewhere other than the process environment.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDocument =
            serde_json::from_str(raw).map_err(|e| ConfigError::InvalidDocument(e.to_string()))?;

        let nodes = if !doc.nodes.is_empty() {
            doc.nodes
                .into_iter()
                .map(|n| {
                    let account_id = n
                        .account_id
                        .parse::<EntityId>()
                        .map_err(|_| ConfigError::InvalidDocument(format!("bad account id {}", n.account_id)))?;
                    Ok(NodeEndpoint::new(n.address, account_id))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?
        } else if let Some(network_name) = &doc.network {
            let network = NamedNetwork::parse(network_name)
                .ok_or_else(|| ConfigError::UnknownNetwork(network_name.clone()))?;
            network.seed_nodes()
        } else {
            return Err(ConfigError::EmptyCustomNetwork);
        };

        if nodes.is_empty() {
            return Err(ConfigError::EmptyCustomNetwork);
        }

        let mirror_url = doc
            .mirror_url
            .or_else(|| doc.network.as_deref().and_then(NamedNetwork::parse).map(|n| n.default_mirror_url().to_string()))
            .ok_or(ConfigError::MissingEnvVar("mirror_url"))?;

        let operator_account_id = doc
            .operator_account_id
            .as_deref()
            .map(|s| s.parse::<EntityId>().map_err(|_| ConfigError::UnrecognizedKeyEncoding))
            .transpose()?;
        let operator_key = doc
            .operator_key
            .as_deref()
            .map(parse_operator_key)
            .transpose()?;

        Ok(NetworkConfig {
            nodes,
            mirror_url,
            operator_account_id,
            operator_key,
            debug_payloads: doc.debug_payloads,
        })
    }
}

fn parse_custom_nodes(raw: &str) -> Result<Vec<NodeEndpoint>, ConfigError> {
    let mut nodes = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (address, account) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidDocument(format!("malformed node entry: {entry}")))?;
        let account_id = account
            .parse::<EntityId>()
            .map_err(|_| ConfigError::InvalidDocument(format!("bad account id: {account}")))?;
        nodes.push(NodeEndpoint::new(address, account_id));
    }
    if nodes.is_empty() {
        return Err(ConfigError::EmptyCustomNetwork);
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_document_with_explicit_nodes_resolves() {
        let doc = r#"{
            "nodes": [{"address": "node1.example.com:443", "account_id": "0.0.3"}],
            "mirror_url": "https://mirror.example.com",
            "operator_account_id": "0.0.1001",
            "operator_key": "deadbeef"
        }"#;
        let config = NetworkConfig::from_json(doc).unwrap();
        assert_eq!(config.nodes.len(), 1);
        assert_eq!(config.mirror_url, "https://mirror.example.com");
        assert_eq!(config.operator_account_id, Some(EntityId::num(1001)));
        assert!(config.operator_key.is_some());
    }

    #[test]
    fn json_document_with_named_network_falls_back_to_seeds() {
        let doc = r#"{"network": "testnet"}"#;
        let config = NetworkConfig::from_json(doc).unwrap();
        assert!(!config.nodes.is_empty());
        assert!(config.mirror_url.contains("testnet"));
    }

    #[test]
    fn empty_custom_node_list_is_rejected() {
        let doc = r#"{"nodes": []}"#;
        assert!(matches!(
            NetworkConfig::from_json(doc),
            Err(ConfigError::EmptyCustomNetwork)
        ));
    }

    #[test]
    fn custom_node_list_parses_address_equals_account_pairs() {
        let nodes = parse_custom_nodes("node1:443=0.0.3, node2:443=0.0.4").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].account_id, EntityId::num(3));
        assert_eq!(nodes[1].account_id, EntityId::num(4));
    }
}
