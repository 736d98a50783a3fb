// Path: crates/ledger-client-core/src/mirror/rest.rs
//! The Mirror REST client: account/transaction/topic-message lookups with
//! opaque-cursor pagination.

use crate::error::MirrorError;
use crate::model::{EntityId, Tinybar, Timestamp, TopicMessage};
use crate::transport::RestFetcher;
use serde::Deserialize;

/// One page of results plus an opaque continuation cursor.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The page's items, in the order the server returned them.
    pub items: Vec<T>,
    /// The absolute URL to fetch the next page, when more results remain.
    pub next: Option<String>,
}

/// The subset of account fields the Mirror REST client surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorAccount {
    /// The account id.
    pub account_id: EntityId,
    /// Current hbar-equivalent balance, in tinybars.
    pub balance: Tinybar,
}

#[derive(Debug, Deserialize)]
struct RawLinks {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBalance {
    balance: i64,
}

#[derive(Debug, Deserialize)]
struct RawAccountResponse {
    account: String,
    balance: RawBalance,
}

#[derive(Debug, Deserialize)]
struct RawTopicMessage {
    sequence_number: u64,
    message: String,
    #[serde(default)]
    consensus_timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTopicMessagesResponse {
    messages: Vec<RawTopicMessage>,
    #[serde(default)]
    links: RawLinks,
}

/// Thin REST client over the Mirror node's JSON API, resolving `links.next`
/// continuation paths against its configured base URL.
#[derive(Debug, Clone)]
pub struct MirrorRestClient {
    rest: RestFetcher,
    base_url: String,
}

impl MirrorRestClient {
    /// Builds a client pointed at `base_url` (e.g.
    /// `https://testnet.mirror.ledger.example.com`).
    pub fn new(rest: RestFetcher, base_url: impl Into<String>) -> Self {
        Self {
            rest,
            base_url: base_url.into(),
        }
    }

    /// Resolves a `links.next` value (typically a path, sometimes already
    /// absolute) against the configured base URL.
    pub fn resolve_next(&self, link: &str) -> Result<String, MirrorError> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| MirrorError::InvalidCursor(e.to_string()))?;
        let joined = base
            .join(link)
            .map_err(|e| MirrorError::InvalidCursor(e.to_string()))?;
        Ok(joined.to_string())
    }

    /// Fetches the given account's current balance.
    pub async fn get_account(&self, account_id: EntityId) -> Result<MirrorAccount, MirrorError> {
        let url = format!("{}/api/v1/accounts/{}", self.base_url.trim_end_matches('/'), account_id);
        let raw = self.rest.get(&url).await?;
        let parsed: RawAccountResponse =
            serde_json::from_slice(&raw).map_err(|e| MirrorError::InvalidResponse(e.to_string()))?;
        let account_id = parsed
            .account
            .parse::<EntityId>()
            .map_err(|e| MirrorError::InvalidResponse(e.to_string()))?;
        Ok(MirrorAccount {
            account_id,
            balance: Tinybar(parsed.balance.balance),
        })
    }

    /// Fetches one page of a topic's messages, starting fresh (`url: None`)
    /// or continuing from a previously returned `Page::next`.
    pub async fn list_topic_messages(
        &self,
        topic_id: EntityId,
        url: Option<&str>,
    ) -> Result<Page<TopicMessage>, MirrorError> {
        let request_url = match url {
            Some(url) => url.to_string(),
            None => format!(
                "{}/api/v1/topics/{}/messages?limit=100",
                self.base_url.trim_end_matches('/'),
                topic_id
            ),
        };
        self.fetch_messages(&request_url).await
    }

    /// Fetches the first page of messages strictly after `timestamp`, for a
    /// subscription resuming from a known cursor point.
    pub async fn list_topic_messages_after(
        &self,
        topic_id: EntityId,
        timestamp: Timestamp,
    ) -> Result<Page<TopicMessage>, MirrorError> {
        let request_url = format!(
            "{}/api/v1/topics/{}/messages?timestamp=gt:{}&limit=100",
            self.base_url.trim_end_matches('/'),
            topic_id,
            timestamp
        );
        self.fetch_messages(&request_url).await
    }

    async fn fetch_messages(&self, request_url: &str) -> Result<Page<TopicMessage>, MirrorError> {
        let raw = self.rest.get(request_url).await?;
        let parsed: RawTopicMessagesResponse =
            serde_json::from_slice(&raw).map_err(|e| MirrorError::InvalidResponse(e.to_string()))?;

        let items = parsed
            .messages
            .into_iter()
            .map(|m| {
                let message_bytes = base64::engine::general_purpose::STANDARD
                    .decode(&m.message)
                    .unwrap_or_default();
                let consensus_timestamp = m.consensus_timestamp.and_then(|s| s.parse::<Timestamp>().ok());
                TopicMessage {
                    sequence_number: m.sequence_number,
                    message_bytes,
                    consensus_timestamp,
                }
            })
            .collect();

        let next = match parsed.links.next {
            Some(link) => Some(self.resolve_next(&link)?),
            None => None,
        };

        Ok(Page { items, next })
    }
}

use base64::Engine;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_next_joins_relative_path_against_base() {
        let client = MirrorRestClient::new(
            RestFetcher::new(reqwest::Client::new()),
            "https://testnet.mirror.ledger.example.com",
        );
        let resolved = client
            .resolve_next("/api/v1/topics/0.0.1/messages?timestamp=gt:1700000000.0&limit=100")
            .unwrap();
        assert_eq!(
            resolved,
            "https://testnet.mirror.ledger.example.com/api/v1/topics/0.0.1/messages?timestamp=gt:1700000000.0&limit=100"
        );
    }

    #[test]
    fn resolve_next_passes_through_absolute_urls() {
        let client = MirrorRestClient::new(
            RestFetcher::new(reqwest::Client::new()),
            "https://testnet.mirror.ledger.example.com",
        );
        let resolved = client
            .resolve_next("https://other.mirror.ledger.example.com/x")
            .unwrap();
        assert_eq!(resolved, "https://other.mirror.ledger.example.com/x");
    }
}
