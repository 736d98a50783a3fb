// Path: crates/ledger-client-core/src/query/balance.rs
//! `CryptoGetAccountBalance`, outer field 7.

use super::common::{decode_entity_id, require_uint64, unwrap_response, wrap_query, write_entity_id, QueryHeader};
use crate::error::DecodeError;
use crate::model::{EntityId, Tinybar};

const OUTER_FIELD: u32 = 7;

/// A token's balance as reported inside an account balance answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    /// The token this balance is denominated in.
    pub token_id: EntityId,
    /// The raw (undecimaled) balance.
    pub balance: u64,
}

/// The decoded account balance answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalanceResponse {
    /// The account the balance was queried for.
    pub account_id: EntityId,
    /// The account's hbar-equivalent balance, in tinybars.
    pub balance: Tinybar,
    /// Balances of tokens the account is associated with.
    pub token_balances: Vec<TokenBalance>,
}

/// Builds the wire bytes for a balance query against `account_id`.
pub fn encode_balance_query(header: &QueryHeader, account_id: EntityId) -> Vec<u8> {
    wrap_query(OUTER_FIELD, header, |inner| {
        write_entity_id(inner, 2, account_id);
    })
}

/// Decodes a balance answer from a full Response envelope.
pub fn decode_balance_response(bytes: &[u8]) -> Result<AccountBalanceResponse, DecodeError> {
    let mut account_id = None;
    let mut balance = 0i64;
    let mut token_balances = Vec::new();

    for field in unwrap_response(bytes, OUTER_FIELD)? {
        match field.number {
            2 => account_id = Some(decode_entity_id(&field.value)?),
            3 => balance = require_uint64(&field.value, "balance")? as i64,
            8 => {
                let mut token_id = None;
                let mut token_balance = 0u64;
                for inner in field.value.as_message()?.collect_all()? {
                    match inner.number {
                        1 => token_id = Some(decode_entity_id(&inner.value)?),
                        2 => token_balance = require_uint64(&inner.value, "token_balance")?,
                        _ => {}
                    }
                }
                if let Some(token_id) = token_id {
                    token_balances.push(TokenBalance {
                        token_id,
                        balance: token_balance,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(AccountBalanceResponse {
        account_id: account_id.ok_or(DecodeError::MissingField("account_id"))?,
        balance: Tinybar(balance),
        token_balances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldWriter;

    fn encode_answer(account_id: EntityId, balance: u64) -> Vec<u8> {
        let mut id_writer = FieldWriter::new();
        id_writer.write_uint64(1, account_id.shard);
        id_writer.write_uint64(2, account_id.realm);
        id_writer.write_uint64(3, account_id.num);

        let mut inner = FieldWriter::new();
        inner.write_message(2, &id_writer.into_bytes());
        inner.write_uint64(3, balance);

        let mut outer = FieldWriter::new();
        outer.write_message(OUTER_FIELD, &inner.into_bytes());
        outer.into_bytes()
    }

    #[test]
    fn decodes_account_id_and_balance() {
        let account_id = EntityId::num(1001);
        let bytes = encode_answer(account_id, 5_000_000_000);
        let decoded = decode_balance_response(&bytes).unwrap();
        assert_eq!(decoded.account_id, account_id);
        assert_eq!(decoded.balance, Tinybar(5_000_000_000));
        assert!(decoded.token_balances.is_empty());
    }

    #[test]
    fn missing_response_field_is_an_error() {
        let bytes = Vec::new();
        assert!(matches!(
            decode_balance_response(&bytes),
            Err(DecodeError::MissingField("response"))
        ));
    }
}
