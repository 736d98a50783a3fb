// Path: crates/ledger-client-core/src/model/ids.rs
//! Entity identifiers and transaction identifiers.

use super::timestamp::Timestamp;
use std::fmt;
use std::str::FromStr;

/// A `(shard, realm, num)` identifier shared by every Ledger entity
/// (accounts, tokens, topics, files, contracts, schedules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    /// The shard component.
    pub shard: u64,
    /// The realm component.
    pub realm: u64,
    /// The entity number component.
    pub num: u64,
}

impl EntityId {
    /// Builds an id from its three components.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Shorthand for `EntityId::new(0, 0, num)`, the common case.
    pub const fn num(num: u64) -> Self {
        Self::new(0, 0, num)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// Error returned when a `shard.realm.num` string fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entity id: {0}")]
pub struct ParseEntityIdError(pub String);

impl FromStr for EntityId {
    type Err = ParseEntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '.');
        let (Some(shard), Some(realm), Some(num)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseEntityIdError(s.to_string()));
        };
        let parse = |p: &str| p.parse::<u64>().map_err(|_| ParseEntityIdError(s.to_string()));
        Ok(EntityId::new(parse(shard)?, parse(realm)?, parse(num)?))
    }
}

/// `(payer_account, valid_start, nonce, scheduled)`. The payer plus
/// valid-start form a uniqueness key at the Ledger; duplicate submissions of
/// the same pair are deduplicated server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId {
    /// The account paying for this transaction.
    pub payer_account: EntityId,
    /// The timestamp bounding acceptability; the Ledger rejects transactions
    /// whose valid-start drift exceeds its configured window.
    pub valid_start: Timestamp,
    /// Present for transactions submitted as part of a batch.
    pub nonce: Option<i32>,
    /// True if this id names a scheduled transaction.
    pub scheduled: bool,
}

impl TransactionId {
    /// Builds a plain (non-scheduled, no nonce) transaction id.
    pub const fn new(payer_account: EntityId, valid_start: Timestamp) -> Self {
        Self {
            payer_account,
            valid_start,
            nonce: None,
            scheduled: false,
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.payer_account, self.valid_start.seconds, self.valid_start.nanos
        )?;
        if let Some(nonce) = self.nonce {
            write!(f, "-{nonce}")?;
        }
        if self.scheduled {
            write!(f, "?scheduled=true")?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = ParseEntityIdError;

    /// Accepts both dash-separated (`payer-seconds-nanos`) and hyphenated
    /// forms (`payer-seconds-nanos-nonce`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (core, scheduled) = match s.split_once("?scheduled=") {
            Some((core, flag)) => (core, flag == "true"),
            None => (s, false),
        };
        let parts: Vec<&str> = core.splitn(5, '-').collect();
        if parts.len() < 3 {
            return Err(ParseEntityIdError(s.to_string()));
        }
        let payer = format!("{}.{}.{}", parts[0], parts[1], parts[2]);
        // Re-split: the payer itself may already be in dotted shard.realm.num
        // form (`0.0.500-1700000000-42`) or dash form
        // (`0-0-500-1700000000-42`); detect which by counting dots in parts[0].
        let (payer_account, seconds, nanos, nonce) = if parts[0].contains('.') {
            let payer_account: EntityId = parts[0].parse()?;
            let seconds: i64 = parts
                .get(1)
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ParseEntityIdError(s.to_string()))?;
            let nanos: i64 = parts
                .get(2)
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ParseEntityIdError(s.to_string()))?;
            let nonce = parts.get(3).and_then(|p| p.parse().ok());
            (payer_account, seconds, nanos, nonce)
        } else {
            let payer_account = EntityId::new(
                parts[0].parse().map_err(|_| ParseEntityIdError(s.to_string()))?,
                parts[1].parse().map_err(|_| ParseEntityIdError(s.to_string()))?,
                parts[2].parse().map_err(|_| ParseEntityIdError(s.to_string()))?,
            );
            let seconds: i64 = parts
                .get(3)
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ParseEntityIdError(s.to_string()))?;
            let nanos: i64 = parts
                .get(4)
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ParseEntityIdError(s.to_string()))?;
            (payer_account, seconds, nanos, None)
        };
        let _ = payer;
        Ok(TransactionId {
            payer_account,
            valid_start: Timestamp::new(seconds, nanos),
            nonce,
            scheduled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_roundtrip() {
        let id = EntityId::new(0, 0, 500);
        assert_eq!(id.to_string(), "0.0.500");
        assert_eq!("0.0.500".parse::<EntityId>().unwrap(), id);
    }

    #[test]
    fn transaction_id_dotted_payer_roundtrip() {
        let tx_id = TransactionId::new(EntityId::num(500), Timestamp::new(1_700_000_000, 42));
        assert_eq!(tx_id.to_string(), "0.0.500-1700000000-42");
        let parsed: TransactionId = "0.0.500-1700000000-42".parse().unwrap();
        assert_eq!(parsed, tx_id);
    }
}
