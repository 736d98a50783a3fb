// Path: crates/ledger-client-core/src/query/token.rs
//! `TokenGetInfo`, outer field 52, and `CryptoGetTokenAllowances`, outer
//! field 59 (the latter added in the ambient expansion to round out the
//! token query family the distillation only partially itemized).

use super::common::{decode_entity_id, require_uint64, unwrap_response, wrap_query, write_entity_id, QueryHeader};
use crate::error::DecodeError;
use crate::model::EntityId;

const TOKEN_INFO_OUTER_FIELD: u32 = 52;
const TOKEN_ALLOWANCES_OUTER_FIELD: u32 = 59;

/// The decoded token info answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// The queried token.
    pub token_id: EntityId,
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Number of decimal places the token's raw amount is divided by.
    pub decimals: u32,
    /// Circulating supply, in the token's smallest unit.
    pub total_supply: u64,
    /// The account that holds un-distributed supply.
    pub treasury_account_id: EntityId,
    /// `true` once the token has been marked deleted.
    pub deleted: bool,
}

/// One allowance an account has granted a spender over a specific token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAllowance {
    /// The token the allowance is denominated in.
    pub token_id: EntityId,
    /// The account granting the allowance.
    pub owner: EntityId,
    /// The account permitted to spend it.
    pub spender: EntityId,
    /// The remaining approved amount.
    pub amount: u64,
}

/// Builds the wire bytes for a token info query.
pub fn encode_token_info_query(header: &QueryHeader, token_id: EntityId) -> Vec<u8> {
    wrap_query(TOKEN_INFO_OUTER_FIELD, header, |inner| {
        write_entity_id(inner, 2, token_id);
    })
}

/// Decodes a token info answer.
pub fn decode_token_info_response(bytes: &[u8]) -> Result<TokenInfo, DecodeError> {
    let mut info_fields = None;
    for field in unwrap_response(bytes, TOKEN_INFO_OUTER_FIELD)? {
        if field.number == 2 {
            info_fields = Some(field.value.as_message()?.collect_all()?);
        }
    }
    let info_fields = info_fields.ok_or(DecodeError::MissingField("token_info"))?;

    let mut token_id = None;
    let mut name = String::new();
    let mut symbol = String::new();
    let mut decimals = 0u32;
    let mut total_supply = 0u64;
    let mut treasury_account_id = None;
    let mut deleted = false;

    for field in info_fields {
        match field.number {
            1 => token_id = Some(decode_entity_id(&field.value)?),
            2 => name = field.value.as_string()?,
            3 => symbol = field.value.as_string()?,
            4 => decimals = require_uint64(&field.value, "decimals")? as u32,
            5 => total_supply = require_uint64(&field.value, "total_supply")?,
            6 => treasury_account_id = Some(decode_entity_id(&field.value)?),
            13 => deleted = field.value.as_bool()?,
            _ => {}
        }
    }

    Ok(TokenInfo {
        token_id: token_id.ok_or(DecodeError::MissingField("token_id"))?,
        name,
        symbol,
        decimals,
        total_supply,
        treasury_account_id: treasury_account_id.ok_or(DecodeError::MissingField("treasury_account_id"))?,
        deleted,
    })
}

/// Builds the wire bytes for a token allowances query over `owner`.
pub fn encode_token_allowances_query(header: &QueryHeader, owner: EntityId) -> Vec<u8> {
    wrap_query(TOKEN_ALLOWANCES_OUTER_FIELD, header, |inner| {
        write_entity_id(inner, 2, owner);
    })
}

/// Decodes a token allowances answer into its list of granted allowances.
pub fn decode_token_allowances_response(bytes: &[u8]) -> Result<Vec<TokenAllowance>, DecodeError> {
    let mut allowances = Vec::new();
    for field in unwrap_response(bytes, TOKEN_ALLOWANCES_OUTER_FIELD)? {
        if field.number != 2 {
            continue;
        }
        let mut token_id = None;
        let mut owner = None;
        let mut spender = None;
        let mut amount = 0u64;
        for inner in field.value.as_message()?.collect_all()? {
            match inner.number {
                1 => token_id = Some(decode_entity_id(&inner.value)?),
                2 => owner = Some(decode_entity_id(&inner.value)?),
                3 => spender = Some(decode_entity_id(&inner.value)?),
                4 => amount = require_uint64(&inner.value, "allowance.amount")?,
                _ => {}
            }
        }
        if let (Some(token_id), Some(owner), Some(spender)) = (token_id, owner, spender) {
            allowances.push(TokenAllowance {
                token_id,
                owner,
                spender,
                amount,
            });
        }
    }
    Ok(allowances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FieldWriter;

    #[test]
    fn decodes_token_info() {
        let token_id = EntityId::num(900);
        let treasury = EntityId::num(3);

        let mut id_writer = FieldWriter::new();
        id_writer.write_uint64(1, token_id.shard);
        id_writer.write_uint64(2, token_id.realm);
        id_writer.write_uint64(3, token_id.num);

        let mut treasury_writer = FieldWriter::new();
        treasury_writer.write_uint64(1, treasury.shard);
        treasury_writer.write_uint64(2, treasury.realm);
        treasury_writer.write_uint64(3, treasury.num);

        let mut info = FieldWriter::new();
        info.write_message(1, &id_writer.into_bytes());
        info.write_string(2, "Example Token");
        info.write_string(3, "EX");
        info.write_uint64(4, 2);
        info.write_uint64(5, 1_000_000);
        info.write_message(6, &treasury_writer.into_bytes());

        let mut outer_inner = FieldWriter::new();
        outer_inner.write_message(2, &info.into_bytes());
        let mut outer = FieldWriter::new();
        outer.write_message(TOKEN_INFO_OUTER_FIELD, &outer_inner.into_bytes());

        let decoded = decode_token_info_response(&outer.into_bytes()).unwrap();
        assert_eq!(decoded.token_id, token_id);
        assert_eq!(decoded.symbol, "EX");
        assert_eq!(decoded.total_supply, 1_000_000);
        assert_eq!(decoded.treasury_account_id, treasury);
    }
}
