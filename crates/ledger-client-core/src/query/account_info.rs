// Path: crates/ledger-client-core/src/query/account_info.rs
//! `CryptoGetInfo`, outer field 9, and its extended sibling
//! `GetAccountDetails`, outer field 58 (added in the ambient expansion since
//! the original distillation only itemized the plain info query).

use super::common::{decode_entity_id, decode_timestamp, require_int64, require_uint64, unwrap_response, wrap_query, write_entity_id, QueryHeader};
use crate::error::DecodeError;
use crate::model::{EntityId, Tinybar, Timestamp};

const INFO_OUTER_FIELD: u32 = 9;
const DETAILS_OUTER_FIELD: u32 = 58;

/// Account-level metadata common to both the plain info query and the
/// extended details query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The queried account.
    pub account_id: EntityId,
    /// The account's current hbar-equivalent balance.
    pub balance: Tinybar,
    /// Free-form memo attached to the account.
    pub memo: String,
    /// When the account's next auto-renewal charge is due.
    pub expiration_time: Timestamp,
    /// Auto-renewal period, in seconds.
    pub auto_renew_period_seconds: i64,
    /// Count of NFTs currently owned by this account.
    pub owned_nfts: i64,
    /// `true` if the account requires incoming transfers to be signed by it.
    pub receiver_sig_required: bool,
    /// `true` if the account has been marked deleted but not yet expired.
    pub deleted: bool,
}

/// The extended-details answer: [`AccountInfo`] plus per-token allowance
/// and association counts the plain info query omits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    /// The shared account fields.
    pub info: AccountInfo,
    /// Number of tokens this account is associated with.
    pub token_relationship_count: u32,
}

fn decode_info_fields(fields: Vec<crate::codec::Field>) -> Result<AccountInfo, DecodeError> {
    let mut account_id = None;
    let mut balance = 0i64;
    let mut memo = String::new();
    let mut expiration_time = Timestamp::new(0, 0);
    let mut auto_renew_period_seconds = 0i64;
    let mut owned_nfts = 0i64;
    let mut receiver_sig_required = false;
    let mut deleted = false;

    for field in fields {
        match field.number {
            1 => account_id = Some(decode_entity_id(&field.value)?),
            2 => memo = field.value.as_string()?,
            3 => balance = require_uint64(&field.value, "balance")? as i64,
            5 => expiration_time = decode_timestamp(&field.value)?,
            6 => auto_renew_period_seconds = require_int64(&field.value, "auto_renew_period_seconds")?,
            9 => owned_nfts = require_int64(&field.value, "owned_nfts")?,
            10 => receiver_sig_required = field.value.as_bool()?,
            11 => deleted = field.value.as_bool()?,
            _ => {}
        }
    }

    Ok(AccountInfo {
        account_id: account_id.ok_or(DecodeError::MissingField("account_id"))?,
        balance: Tinybar(balance),
        memo,
        expiration_time,
        auto_renew_period_seconds,
        owned_nfts,
        receiver_sig_required,
        deleted,
    })
}

/// Builds the wire bytes for an account info query.
pub fn encode_account_info_query(header: &QueryHeader, account_id: EntityId) -> Vec<u8> {
    wrap_query(INFO_OUTER_FIELD, header, |inner| {
        write_entity_id(inner, 2, account_id);
    })
}

/// Decodes an account info answer.
pub fn decode_account_info_response(bytes: &[u8]) -> Result<AccountInfo, DecodeError> {
    let mut info_bytes = None;
    for field in unwrap_response(bytes, INFO_OUTER_FIELD)? {
        if field.number == 2 {
            info_bytes = Some(field.value.as_message()?.collect_all()?);
        }
    }
    decode_info_fields(info_bytes.ok_or(DecodeError::MissingField("account_info"))?)
}

/// Builds the wire bytes for an account details query.
pub fn encode_account_details_query(header: &QueryHeader, account_id: EntityId) -> Vec<u8> {
    wrap_query(DETAILS_OUTER_FIELD, header, |inner| {
        write_entity_id(inner, 2, account_id);
    })
}

/// Decodes an account details answer.
pub fn decode_account_details_response(bytes: &[u8]) -> Result<AccountDetails, DecodeError> {
    let mut info_bytes = None;
    let mut token_relationship_count = 0u32;
    for field in unwrap_response(bytes, DETAILS_OUTER_FIELD)? {
        match field.number {
            2 => info_bytes = Some(field.value.as_message()?.collect_all()?),
            3 => token_relationship_count = require_uint64(&field.value, "token_relationship_count")? as u32,
            _ => {}
        }
    }
    let info = decode_info_fields(info_bytes.ok_or(DecodeError::MissingField("account_details"))?)?;
    Ok(AccountDetails {
        info,
        token_relationship_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldWriter;

    fn encode_info_message(account_id: EntityId, memo: &str) -> Vec<u8> {
        let mut id_writer = FieldWriter::new();
        id_writer.write_uint64(1, account_id.shard);
        id_writer.write_uint64(2, account_id.realm);
        id_writer.write_uint64(3, account_id.num);

        let mut info = FieldWriter::new();
        info.write_message(1, &id_writer.into_bytes());
        info.write_string(2, memo);
        info.write_uint64(3, 42);
        info.into_bytes()
    }

    #[test]
    fn decodes_account_info() {
        let account_id = EntityId::num(2002);
        let info_bytes = encode_info_message(account_id, "hello");
        let mut outer_inner = FieldWriter::new();
        outer_inner.write_message(2, &info_bytes);
        let mut outer = FieldWriter::new();
        outer.write_message(INFO_OUTER_FIELD, &outer_inner.into_bytes());

        let decoded = decode_account_info_response(&outer.into_bytes()).unwrap();
        assert_eq!(decoded.account_id, account_id);
        assert_eq!(decoded.memo, "hello");
        assert_eq!(decoded.balance, Tinybar(42));
    }
}
